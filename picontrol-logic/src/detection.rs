use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};
use tokio::{
    sync::Mutex,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    coordinator::Coordinator,
    notify::{Alert, Notifier},
    settings::clamp_interval,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Tracks whether the user has already been told about the current detection episode
pub struct AlertLatch {
    shown: bool,
}

impl AlertLatch {
    /// Feed one status reading, returns `true` if it starts a new detection episode and the user
    /// should be alerted.
    pub fn observe(&mut self, detected: bool) -> bool {
        let fire = detected && !self.shown;
        self.shown = detected;
        fire
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

/// Polls the rig's detection status and alerts once per detection episode.
/// Runs regardless of the device's hotspot role.
pub struct DetectionMonitor<C: Coordinator, N: Notifier> {
    coordinator: Arc<C>,
    notifier: N,
    interval: Duration,
    latch: Mutex<AlertLatch>,
    cancel: CancellationToken,
}

impl<C: Coordinator, N: Notifier> DetectionMonitor<C, N> {
    pub fn new(interval: Duration, coordinator: Arc<C>, notifier: N) -> Self {
        Self {
            coordinator,
            notifier,
            interval: clamp_interval(interval),
            latch: Mutex::new(AlertLatch::default()),
            cancel: CancellationToken::new(),
        }
    }

    pub async fn alert_shown(&self) -> bool {
        self.latch.lock().await.is_shown()
    }

    async fn check_status(&self) {
        match self.coordinator.detection_status().await {
            Ok(detected) => {
                let fire = self.latch.lock().await.observe(detected);
                if fire {
                    info!("Detection reported, alerting user");
                    self.notifier.alert(Alert::Detection);
                    self.notifier.send_update();
                }
            }
            Err(why) => {
                warn!("Failed to check detection status: {why}");
            }
        }
    }

    /// Poll until [DetectionMonitor::stop] is called
    pub async fn main_loop(&self) {
        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                _ = interval.tick() => {
                    tokio::select! {
                        biased;

                        _ = self.cancel.cancelled() => break,

                        _ = self.check_status() => {}
                    }
                }
            }
        }

        debug!("Detection monitor stopped");
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}
