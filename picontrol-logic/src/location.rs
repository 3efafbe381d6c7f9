use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A "part" of a coordinate, in degrees
pub type CoordinateComponent = f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// A single position reading as gotten from a geolocation source
pub struct Coordinate {
    pub latitude: CoordinateComponent,
    pub longitude: CoordinateComponent,
}

impl Coordinate {
    pub const fn new(latitude: CoordinateComponent, longitude: CoordinateComponent) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their range on the globe
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Outcome of asking the platform for location access
pub enum Permission {
    /// Permission hasn't been asked for yet this session
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Source of the device's current position.
///
/// [LocationService::request_permission] is always awaited to completion before
/// [LocationService::current_coordinate] is attempted.
pub trait LocationService: Send + Sync {
    /// Ask the platform for location access, this may prompt the user
    fn request_permission(&self) -> impl Future<Output = Permission> + Send;
    /// Read the current position, fails with [SyncError::PermissionDenied] or
    /// [SyncError::LocationUnavailable]
    fn current_coordinate(&self) -> impl Future<Output = Result<Coordinate, SyncError>> + Send;
}
