use thiserror::Error;

/// Everything that can go wrong talking to the location source or the remote coordinator.
///
/// None of these are fatal, callers decide if the failure is shown to the user or only logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Location permission was denied")]
    PermissionDenied,

    #[error("Location is unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Could not reach the server: {0}")]
    NetworkUnreachable(String),

    #[error("Server rejected the request: {0}")]
    RemoteRejected(String),

    #[error("Server sent an unexpected response: {0}")]
    MalformedResponse(String),
}
