use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A one-shot message that should be shown to the user
pub enum Alert {
    /// The user refused location access
    LocationDenied,
    /// Reading the location failed, contains the reason
    LocationFailed(String),
    /// Publishing this device's position as the hotspot failed, contains the reason
    PublishFailed(String),
    /// The rig started detecting something
    Detection,
}

impl Alert {
    pub fn from_location_error(err: &SyncError) -> Self {
        match err {
            SyncError::PermissionDenied => Self::LocationDenied,
            other => Self::LocationFailed(other.to_string()),
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alert::LocationDenied => write!(f, "Location permission denied"),
            Alert::LocationFailed(why) => write!(f, "Couldn't get location: {why}"),
            Alert::PublishFailed(why) => write!(f, "Hotspot update failed: {why}"),
            Alert::Detection => write!(f, "Warning: detection reported by the rig!"),
        }
    }
}

/// Sink for everything the user should see
pub trait Notifier: Send + Sync {
    /// Show a one-shot alert
    fn alert(&self, alert: Alert);
    /// Signal that displayed state changed and should be re-read
    fn send_update(&self) {}
}
