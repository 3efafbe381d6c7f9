use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{Mutex, MutexGuard},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    coordinator::{Coordinator, HotspotRecord},
    distance::distance,
    error::SyncError,
    location::{Coordinate, LocationService, Permission},
    notify::{Alert, Notifier},
    settings::SyncSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// What this device does with its position
pub enum Role {
    /// This device is the hotspot, its position is published for others to measure against
    Provider,
    /// This device measures its distance to the hotspot
    #[default]
    Consumer,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Provider => Role::Consumer,
            Role::Consumer => Role::Provider,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Provider => write!(f, "provider"),
            Role::Consumer => write!(f, "consumer"),
        }
    }
}

/// Handle to a running hotspot poll. Dropping it stops the poll.
struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[derive(Default)]
struct SyncState {
    role: Role,
    permission: Permission,
    coordinate: Option<Coordinate>,
    hotspot: Option<HotspotRecord>,
    distance: Option<f64>,
    poll: Option<PollHandle>,
    started: bool,
}

impl SyncState {
    fn recompute_distance(&mut self) {
        // Providers have no meaningful distance to themselves
        if self.role != Role::Consumer {
            return;
        }
        if let (Some(here), Some(hotspot)) = (self.coordinate, self.hotspot) {
            self.distance = Some(distance(here, hotspot.position));
        }
    }

    fn apply_hotspot(&mut self, record: HotspotRecord) {
        self.hotspot = Some(record);
        self.recompute_distance();
    }

    fn as_snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            role: self.role,
            permission: self.permission,
            coordinate: self.coordinate,
            hotspot: self.hotspot,
            distance: self.distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Read-only view of the synchronizer for display
pub struct SyncSnapshot {
    pub role: Role,
    pub permission: Permission,
    pub coordinate: Option<Coordinate>,
    pub hotspot: Option<HotspotRecord>,
    /// Meters to the hotspot, only ever computed while a consumer
    pub distance: Option<f64>,
}

/// Keeps this device's position in sync with the remote coordinator.
///
/// As a [Role::Provider] the local position is published every time it changes or the role
/// is switched to. As a [Role::Consumer] the hotspot position is polled on an interval and the
/// distance to it recomputed. Role changes go through [PositionSync::set_role], which stops the
/// old branch before starting the new one while holding the state lock.
pub struct PositionSync<L: LocationService, C: Coordinator, N: Notifier> {
    state: Mutex<SyncState>,
    location: L,
    coordinator: Arc<C>,
    notifier: N,
    settings: SyncSettings,
    cancel: CancellationToken,
}

impl<L, C, N> PositionSync<L, C, N>
where
    L: LocationService + 'static,
    C: Coordinator + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        role: Role,
        settings: SyncSettings,
        location: L,
        coordinator: Arc<C>,
        notifier: N,
    ) -> Self {
        Self {
            state: Mutex::new(SyncState {
                role,
                ..Default::default()
            }),
            location,
            coordinator,
            notifier,
            settings: settings.clamped(),
            cancel: CancellationToken::new(),
        }
    }

    /// Activate the branch for the initial role, later calls do nothing
    pub async fn start(self: &Arc<Self>) {
        let mut state = self.state.lock().await;
        if state.started {
            debug!("Already started");
            return;
        }
        state.started = true;
        let publish = self.activate(&mut state);
        drop(state);
        if let Some(position) = publish {
            self.publish(position).await.ok();
        }
    }

    pub async fn role(&self) -> Role {
        self.state.lock().await.role
    }

    pub async fn snapshot(&self) -> SyncSnapshot {
        self.state.lock().await.as_snapshot()
    }

    /// Switch to the given role, does nothing if it's already active
    pub async fn set_role(self: &Arc<Self>, role: Role) {
        let state = self.state.lock().await;
        self.transition(state, role).await;
    }

    /// Switch to whichever role isn't active, returns the new role
    pub async fn toggle_role(self: &Arc<Self>) -> Role {
        let state = self.state.lock().await;
        let role = state.role.toggled();
        self.transition(state, role).await;
        role
    }

    async fn transition(self: &Arc<Self>, mut state: MutexGuard<'_, SyncState>, role: Role) {
        if state.role == role {
            debug!("Already a {role}, ignoring role change");
            return;
        }

        info!("Switching role from {} to {role}", state.role);
        // Drops the handle, cancelling any poll before the new branch starts
        state.poll = None;
        state.role = role;
        let publish = self.activate(&mut state);
        drop(state);

        self.notifier.send_update();

        if let Some(position) = publish {
            self.publish(position).await.ok();
        }
    }

    /// Start the branch for the current role. Returns the position to publish if we are a
    /// provider and know where we are.
    fn activate(self: &Arc<Self>, state: &mut SyncState) -> Option<Coordinate> {
        if self.cancel.is_cancelled() {
            return None;
        }

        match state.role {
            Role::Consumer => {
                // The location may have moved while we were a provider
                state.recompute_distance();
                state.poll = Some(self.spawn_hotspot_poll());
                None
            }
            Role::Provider => {
                state.distance = None;
                if state.coordinate.is_none() {
                    info!("No location yet, hotspot will be published once one is available");
                }
                state.coordinate
            }
        }
    }

    fn spawn_hotspot_poll(self: &Arc<Self>) -> PollHandle {
        let cancel = self.cancel.child_token();
        let task = tokio::spawn(Self::hotspot_poll_loop(
            Arc::downgrade(self),
            cancel.clone(),
            self.settings.hotspot_poll_interval,
        ));
        PollHandle { cancel, task }
    }

    async fn hotspot_poll_loop(sync: Weak<Self>, cancel: CancellationToken, period: Duration) {
        // First poll happens one full period after activation
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                _ = interval.tick() => {
                    let Some(sync) = sync.upgrade() else {
                        break;
                    };

                    tokio::select! {
                        biased;

                        _ = cancel.cancelled() => break,

                        _ = sync.poll_hotspot(&cancel) => {}
                    }
                }
            }
        }

        debug!("Hotspot poll stopped");
    }

    async fn poll_hotspot(&self, cancel: &CancellationToken) {
        match self.coordinator.hotspot_info().await {
            Ok(position) => {
                let mut state = self.state.lock().await;
                if cancel.is_cancelled() || state.role != Role::Consumer {
                    debug!("Discarding hotspot poll from a stopped consumer");
                    return;
                }
                state.apply_hotspot(HotspotRecord {
                    position,
                    fetched_at: Utc::now(),
                });
                drop(state);
                self.notifier.send_update();
            }
            Err(why) => {
                warn!("Couldn't get hotspot info, keeping last known: {why}");
            }
        }
    }

    /// Ask for permission and read the current location.
    ///
    /// On success the distance is recomputed (consumer) or the position published (provider).
    /// Failures alert the user and leave the last known location in place.
    pub async fn refresh_location(&self) -> Result<Coordinate, SyncError> {
        let permission = self.location.request_permission().await;
        self.state.lock().await.permission = permission;

        if permission != Permission::Granted {
            warn!("Location permission not granted ({permission:?})");
            self.notifier.alert(Alert::LocationDenied);
            self.notifier.send_update();
            return Err(SyncError::PermissionDenied);
        }

        let coordinate = match self.location.current_coordinate().await {
            Ok(coordinate) => coordinate,
            Err(why) => {
                error!("Failed to get location: {why}");
                self.notifier.alert(Alert::from_location_error(&why));
                return Err(why);
            }
        };

        let mut state = self.state.lock().await;
        state.coordinate = Some(coordinate);
        state.recompute_distance();
        let publish = (state.role == Role::Provider).then_some(coordinate);
        drop(state);

        self.notifier.send_update();

        if let Some(position) = publish {
            self.publish(position).await.ok();
        }

        Ok(coordinate)
    }

    async fn publish(&self, position: Coordinate) -> Result<(), SyncError> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        match self.coordinator.publish_hotspot(position).await {
            Ok(()) => {
                info!("Published hotspot position {position}");
                Ok(())
            }
            Err(why) => {
                warn!("Failed to publish hotspot position: {why}");
                self.notifier.alert(Alert::PublishFailed(why.to_string()));
                Err(why)
            }
        }
    }

    /// Stop all background work, the synchronizer does nothing after this
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let poll = self.state.lock().await.poll.take();
        if let Some(mut poll) = poll {
            poll.cancel.cancel();
            if let Err(why) = (&mut poll.task).await {
                error!("Hotspot poll task failed: {why:?}");
            }
        }
    }
}
