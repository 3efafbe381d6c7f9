use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shortest period any poll runs at, tokio's interval panics on zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) fn clamp_interval(period: Duration) -> Duration {
    period.max(MIN_POLL_INTERVAL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Timing used by the hotspot poll and the detection monitor
pub struct SyncSettings {
    /// Time between hotspot polls while acting as a consumer
    pub hotspot_poll_interval: Duration,
    /// Time between detection status polls
    pub detection_poll_interval: Duration,
}

impl SyncSettings {
    pub const DEFAULT_HOTSPOT_POLL: Duration = Duration::from_secs(10);
    pub const DEFAULT_DETECTION_POLL: Duration = Duration::from_secs(2);

    pub fn with_secs(hotspot_secs: u64, detection_secs: u64) -> Self {
        Self {
            hotspot_poll_interval: Duration::from_secs(hotspot_secs),
            detection_poll_interval: Duration::from_secs(detection_secs),
        }
        .clamped()
    }

    /// Same settings with every interval raised to at least [MIN_POLL_INTERVAL]
    pub fn clamped(self) -> Self {
        Self {
            hotspot_poll_interval: clamp_interval(self.hotspot_poll_interval),
            detection_poll_interval: clamp_interval(self.detection_poll_interval),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            hotspot_poll_interval: Self::DEFAULT_HOTSPOT_POLL,
            detection_poll_interval: Self::DEFAULT_DETECTION_POLL,
        }
    }
}
