mod coordinator;
mod detection;
mod distance;
mod error;
mod forms;
mod location;
mod notify;
mod settings;
mod sync;

pub use coordinator::{Coordinator, HotspotRecord, UtcDT};
pub use detection::{AlertLatch, DetectionMonitor};
pub use distance::{EARTH_RADIUS_METERS, distance};
pub use error::SyncError;
pub use forms::{Credentials, FormError, MAX_SERVO_ANGLE, SERVO_IDS, ServoCommand};
pub use location::{Coordinate, CoordinateComponent, LocationService, Permission};
pub use notify::{Alert, Notifier};
pub use settings::{MIN_POLL_INTERVAL, SyncSettings};
pub use sync::{PositionSync, Role, SyncSnapshot};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
