use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::SyncError, location::Coordinate};

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// The provider's last published position, as cached by a consumer
pub struct HotspotRecord {
    pub position: Coordinate,
    /// When the poll that produced this record completed, local clock
    pub fetched_at: UtcDT,
}

/// The remote endpoint that hotspot providers publish to and consumers poll from.
pub trait Coordinator: Send + Sync {
    /// Publish the local position as the current hotspot position
    fn publish_hotspot(
        &self,
        position: Coordinate,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;
    /// Get the last position the current hotspot provider published
    fn hotspot_info(&self) -> impl Future<Output = Result<Coordinate, SyncError>> + Send;
    /// Check if the rig is currently detecting something
    fn detection_status(&self) -> impl Future<Output = Result<bool, SyncError>> + Send;
}
