use picontrol_logic::{Coordinate, SyncError};
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};

/// Status values the rig uses to report success, older firmware answers in Turkish
const SUCCESS_STATUSES: [&str; 2] = ["success", "başarılı"];

/// Decode a response body, a body we can't read on an error status is a rejection rather
/// than a malformed response.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, SyncError> {
    serde_json::from_slice(body).map_err(|why| {
        if status.is_success() {
            SyncError::MalformedResponse(why.to_string())
        } else {
            SyncError::RemoteRejected(format!("HTTP {status}"))
        }
    })
}

#[derive(Debug, Deserialize)]
/// `{status, error?}`, returned by `/update_hotspot` and `/set_servo`
pub struct StatusReply {
    pub status: Option<String>,
    pub error: Option<String>,
}

impl StatusReply {
    fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| SUCCESS_STATUSES.contains(&s))
    }

    pub fn into_result(self, http: StatusCode) -> Result<(), SyncError> {
        if http.is_success() && self.error.is_none() && self.is_success() {
            return Ok(());
        }
        let reason = self.error.unwrap_or_else(|| match self.status {
            Some(status) => format!("Server answered \"{status}\""),
            None => format!("HTTP {http}"),
        });
        Err(SyncError::RemoteRejected(reason))
    }
}

#[derive(Debug, Deserialize)]
/// `{latitude, longitude}` or `{error}`
pub struct HotspotReply {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub error: Option<String>,
}

impl HotspotReply {
    pub fn into_result(self, http: StatusCode) -> Result<Coordinate, SyncError> {
        if let Some(error) = self.error {
            return Err(SyncError::RemoteRejected(error));
        }
        if !http.is_success() {
            return Err(SyncError::RemoteRejected(format!("HTTP {http}")));
        }
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                let position = Coordinate::new(latitude, longitude);
                if position.is_valid() {
                    Ok(position)
                } else {
                    Err(SyncError::MalformedResponse(format!(
                        "Hotspot position out of range: {latitude}, {longitude}"
                    )))
                }
            }
            _ => Err(SyncError::MalformedResponse(
                "Hotspot info is missing a coordinate".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
/// `{detected}`
pub struct DetectionReply {
    #[serde(alias = "hayalet_detected")]
    pub detected: bool,
}

#[derive(Debug, Deserialize, Default)]
/// `{message}` or `{error}`, returned by `/login`
pub struct MessageReply {
    pub message: Option<String>,
    pub error: Option<String>,
}
