use log::debug;
use anyhow::Context;
use picontrol_logic::{Coordinate, Coordinator, SyncError, prelude::Result};
use reqwest::{RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    server::{
        DEFAULT_BASE_URL, DETECTION_STATUS_PATH, HOTSPOT_INFO_PATH, REQUEST_TIMEOUT,
        UPDATE_HOTSPOT_PATH, VIDEO_FEED_PATH,
    },
    wire::{self, DetectionReply, HotspotReply, StatusReply},
};

/// HTTP client for the rig, implements [Coordinator] for hotspot syncing and carries the
/// login / registration / servo calls.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
}

fn map_request_error(err: reqwest::Error) -> SyncError {
    if err.is_decode() {
        SyncError::MalformedResponse(err.to_string())
    } else {
        SyncError::NetworkUnreachable(err.to_string())
    }
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the address configured at compile time
    pub fn with_default_url() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Address of the camera stream, this is handed to something that can play it
    pub fn video_feed_url(&self) -> String {
        self.url(VIDEO_FEED_PATH)
    }

    /// Send a request and read the whole body
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<(StatusCode, Vec<u8>), SyncError> {
        let resp = req.send().await.map_err(map_request_error)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(map_request_error)?;
        debug!("Server answered {status} ({} bytes)", body.len());
        Ok((status, body.to_vec()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(StatusCode, T), SyncError> {
        let (status, body) = self.send(self.client.get(self.url(path))).await?;
        wire::decode(status, &body).map(|reply| (status, reply))
    }

    pub(crate) async fn post(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<(StatusCode, Vec<u8>), SyncError> {
        let encoded = serde_json::to_vec(body)
            .map_err(|why| SyncError::MalformedResponse(format!("Couldn't encode request: {why}")))?;
        let req = self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(encoded);
        self.send(req).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<(StatusCode, T), SyncError> {
        let (status, body) = self.post(path, body).await?;
        wire::decode(status, &body).map(|reply| (status, reply))
    }
}

impl Coordinator for RemoteClient {
    async fn publish_hotspot(&self, position: Coordinate) -> Result<(), SyncError> {
        let (status, reply) = self
            .post_json::<StatusReply>(UPDATE_HOTSPOT_PATH, &position)
            .await?;
        reply.into_result(status)
    }

    async fn hotspot_info(&self) -> Result<Coordinate, SyncError> {
        let (status, reply) = self.get_json::<HotspotReply>(HOTSPOT_INFO_PATH).await?;
        reply.into_result(status)
    }

    async fn detection_status(&self) -> Result<bool, SyncError> {
        let (status, reply) = self
            .get_json::<DetectionReply>(DETECTION_STATUS_PATH)
            .await?;
        if status.is_success() {
            Ok(reply.detected)
        } else {
            Err(SyncError::RemoteRejected(format!("HTTP {status}")))
        }
    }
}
