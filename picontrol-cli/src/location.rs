use std::path::{Path, PathBuf};

use log::debug;
use picontrol_logic::{Coordinate, LocationService, Permission, SyncError};

#[derive(Debug, Clone, PartialEq)]
/// Where the command line client gets its position from
pub enum LocationSource {
    /// Always the same position
    Fixed(Coordinate),
    /// A JSON file with `latitude` and `longitude`, re-read on every refresh so something
    /// else (a GPS daemon, a script) can keep it current
    File(PathBuf),
    /// No position available, behaves like a denied permission
    Disabled,
}

pub struct CliLocation(LocationSource);

impl CliLocation {
    pub fn new(source: LocationSource) -> Self {
        Self(source)
    }
}

async fn read_location_file(path: &Path) -> Result<Coordinate, SyncError> {
    let raw = tokio::fs::read(path).await.map_err(|why| {
        SyncError::LocationUnavailable(format!("Couldn't read {}: {why}", path.display()))
    })?;
    let coordinate = serde_json::from_slice::<Coordinate>(&raw).map_err(|why| {
        SyncError::LocationUnavailable(format!("Couldn't parse {}: {why}", path.display()))
    })?;
    if coordinate.is_valid() {
        debug!("Read {coordinate} from {}", path.display());
        Ok(coordinate)
    } else {
        Err(SyncError::LocationUnavailable(format!(
            "{} holds an impossible position",
            path.display()
        )))
    }
}

impl LocationService for CliLocation {
    async fn request_permission(&self) -> Permission {
        match self.0 {
            LocationSource::Disabled => Permission::Denied,
            _ => Permission::Granted,
        }
    }

    async fn current_coordinate(&self) -> Result<Coordinate, SyncError> {
        match &self.0 {
            LocationSource::Fixed(coordinate) => Ok(*coordinate),
            LocationSource::File(path) => read_location_file(path).await,
            LocationSource::Disabled => Err(SyncError::PermissionDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "picontrol-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    #[tokio::test]
    async fn test_fixed_source() {
        let loc = CliLocation::new(LocationSource::Fixed(Coordinate::new(1.0, 2.0)));
        assert_eq!(loc.request_permission().await, Permission::Granted);
        assert_eq!(loc.current_coordinate().await, Ok(Coordinate::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn test_disabled_source_denies() {
        let loc = CliLocation::new(LocationSource::Disabled);
        assert_eq!(loc.request_permission().await, Permission::Denied);
        assert_eq!(
            loc.current_coordinate().await,
            Err(SyncError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_file_source_rereads() {
        let path = temp_file("reread", r#"{"latitude": 41.0, "longitude": 29.0}"#);
        let loc = CliLocation::new(LocationSource::File(path.clone()));
        assert_eq!(loc.current_coordinate().await, Ok(Coordinate::new(41.0, 29.0)));

        std::fs::write(&path, r#"{"latitude": 41.5, "longitude": 29.5}"#).unwrap();
        assert_eq!(loc.current_coordinate().await, Ok(Coordinate::new(41.5, 29.5)));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_bad_files_are_unavailable() {
        let garbage = temp_file("garbage", "not json");
        let impossible = temp_file("impossible", r#"{"latitude": 95.0, "longitude": 0.0}"#);
        let missing = std::env::temp_dir().join("picontrol-does-not-exist.json");

        for path in [&garbage, &impossible, &missing] {
            let loc = CliLocation::new(LocationSource::File(path.clone()));
            let res = loc.current_coordinate().await;
            assert!(
                matches!(res, Err(SyncError::LocationUnavailable(_))),
                "{} gave {res:?}",
                path.display()
            );
        }

        std::fs::remove_file(garbage).ok();
        std::fs::remove_file(impossible).ok();
    }
}
