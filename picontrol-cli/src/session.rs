use std::{ops::ControlFlow, sync::Arc};

use log::{error, info};
use picontrol_logic::{
    DetectionMonitor, Permission, PositionSync, Role, SyncSettings, SyncSnapshot, prelude::*,
};
use picontrol_transport::RemoteClient;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    location::{CliLocation, LocationSource},
    notify::CliNotifier,
};

type Synchronizer = PositionSync<CliLocation, RemoteClient, CliNotifier>;
type Monitor = DetectionMonitor<RemoteClient, CliNotifier>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A line typed into a running session
pub enum SessionCommand {
    Provider,
    Consumer,
    Toggle,
    Locate,
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "provider" | "hotspot" => Some(Self::Provider),
            "consumer" => Some(Self::Consumer),
            "toggle" | "t" => Some(Self::Toggle),
            "locate" | "l" => Some(Self::Locate),
            "status" | "s" | "" => Some(Self::Status),
            "help" | "h" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "\
Commands:
  provider   Make this device the hotspot and publish its location
  consumer   Track the distance to the hotspot
  toggle     Switch between provider and consumer
  locate     Refresh this device's location
  status     Show the current state
  quit       Leave the session";

/// Human readable view of the synchronizer state
pub fn describe(snapshot: &SyncSnapshot) -> String {
    let Some(here) = snapshot.coordinate else {
        return match snapshot.permission {
            Permission::Denied => {
                "Location permission denied, use `locate` to try again".to_string()
            }
            _ => "Location unknown, use `locate` to refresh".to_string(),
        };
    };

    match (snapshot.role, snapshot.distance) {
        (Role::Provider, _) => {
            format!("This device is the hotspot (publishing {here} to the server)")
        }
        (Role::Consumer, Some(distance)) => {
            let mut out = format!("Distance to hotspot: {distance:.2} m\nDevice: {here}");
            if let Some(hotspot) = snapshot.hotspot {
                out.push_str(&format!(
                    "\nHotspot: {} (as of {})",
                    hotspot.position,
                    hotspot.fetched_at.format("%H:%M:%S UTC")
                ));
            }
            out
        }
        (Role::Consumer, None) => "Fetching hotspot info...".to_string(),
    }
}

pub struct SessionOptions {
    pub role: Role,
    pub settings: SyncSettings,
    pub source: LocationSource,
}

struct Session {
    sync: Arc<Synchronizer>,
    monitor: Arc<Monitor>,
    last_render: String,
}

impl Session {
    fn render(&mut self, snapshot: &SyncSnapshot, force: bool) {
        let rendered = describe(snapshot);
        if force || rendered != self.last_render {
            println!("{rendered}");
            self.last_render = rendered;
        }
    }

    async fn handle(&mut self, cmd: SessionCommand) -> ControlFlow<()> {
        match cmd {
            SessionCommand::Provider => self.sync.set_role(Role::Provider).await,
            SessionCommand::Consumer => self.sync.set_role(Role::Consumer).await,
            SessionCommand::Toggle => {
                let role = self.sync.toggle_role().await;
                println!("Now acting as {role}");
            }
            SessionCommand::Locate => {
                // Failures were already shown through the notifier
                if let Ok(here) = self.sync.refresh_location().await {
                    println!("Location: {here}");
                }
            }
            SessionCommand::Status => {
                let snapshot = self.sync.snapshot().await;
                println!("Role: {}", snapshot.role);
                self.render(&snapshot, true);
                if self.monitor.alert_shown().await {
                    println!("Detection active");
                }
            }
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}

/// Run an interactive session until the user quits, stdin closes, or Ctrl-C
pub async fn run(client: RemoteClient, opts: SessionOptions) -> Result {
    let (update_tx, mut update_rx) = mpsc::channel(1);
    let notifier = CliNotifier::new(update_tx);

    println!("Camera stream: {}", client.video_feed_url());

    let client = Arc::new(client);
    let sync = Arc::new(Synchronizer::new(
        opts.role,
        opts.settings,
        CliLocation::new(opts.source),
        client.clone(),
        notifier.clone(),
    ));
    let monitor = Arc::new(Monitor::new(
        opts.settings.detection_poll_interval,
        client,
        notifier,
    ));

    let monitor_task = tokio::spawn({
        let monitor = monitor.clone();
        async move { monitor.main_loop().await }
    });

    // Location is read once on startup, after that only on request
    if let Err(why) = sync.refresh_location().await {
        info!("Starting without a location: {why}");
    }
    sync.start().await;

    let mut session = Session {
        sync: sync.clone(),
        monitor: monitor.clone(),
        last_render: String::new(),
    };

    println!("Acting as {}, type `help` for commands", opts.role);
    session.render(&sync.snapshot().await, true);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Ok(_) = tokio::signal::ctrl_c() => {
                break;
            }

            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => match SessionCommand::parse(&line) {
                        Some(cmd) => {
                            if session.handle(cmd).await.is_break() {
                                break;
                            }
                        }
                        None => println!("Unknown command {:?}, type `help`", line.trim()),
                    },
                    Ok(None) => break,
                    Err(why) => {
                        error!("Failed to read from stdin: {why:?}");
                        break;
                    }
                }
            }

            Some(()) = update_rx.recv() => {
                let snapshot = sync.snapshot().await;
                session.render(&snapshot, false);
            }
        }
    }

    info!("Ending session");
    sync.shutdown().await;
    monitor.stop();
    monitor_task.await.context("Detection monitor failed")?;

    Ok(())
}
