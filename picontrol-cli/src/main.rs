mod location;
mod notify;
mod session;

use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use log::debug;
use picontrol_logic::{Coordinate, Credentials, Role, ServoCommand, SyncSettings, prelude::*};
use picontrol_transport::{DEFAULT_BASE_URL, RemoteClient};

use location::LocationSource;
use session::SessionOptions;

#[derive(Parser)]
#[command(version, about = "Drive a camera/servo rig and share hotspot positions")]
struct Cli {
    /// Base URL of the rig's HTTP server
    #[arg(long, env = "PICONTROL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Latitude of this device, use with --lon
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude of this device, use with --lat
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// JSON file holding `latitude` and `longitude`, re-read on every refresh
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    location_file: Option<PathBuf>,

    /// Start as the hotspot provider instead of a consumer
    #[arg(long)]
    provider: bool,

    /// Seconds between hotspot polls while a consumer
    #[arg(long, default_value_t = SyncSettings::DEFAULT_HOTSPOT_POLL.as_secs())]
    hotspot_interval_secs: u64,

    /// Seconds between detection status polls
    #[arg(long, default_value_t = SyncSettings::DEFAULT_DETECTION_POLL.as_secs())]
    detection_interval_secs: u64,
}

impl RunArgs {
    fn location_source(&self) -> Result<LocationSource> {
        match (self.lat, self.lon, &self.location_file) {
            (Some(lat), Some(lon), _) => {
                let coordinate = Coordinate::new(lat, lon);
                if !coordinate.is_valid() {
                    bail!("{lat}, {lon} is not a position on earth");
                }
                Ok(LocationSource::Fixed(coordinate))
            }
            (_, _, Some(path)) => Ok(LocationSource::File(path.clone())),
            _ => Ok(LocationSource::Disabled),
        }
    }

    fn into_options(self) -> Result<SessionOptions> {
        Ok(SessionOptions {
            source: self.location_source()?,
            role: if self.provider {
                Role::Provider
            } else {
                Role::Consumer
            },
            settings: SyncSettings::with_secs(
                self.hotspot_interval_secs,
                self.detection_interval_secs,
            ),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the rig
    Login { username: String, password: String },
    /// Create an account on the rig
    Register {
        username: String,
        password: String,
        /// The password again
        confirm: String,
    },
    /// Point a servo at an angle
    Servo {
        /// Which servo to move (1 or 2)
        servo: u8,
        /// Angle in degrees, 0 to 180
        #[arg(allow_hyphen_values = true)]
        angle: String,
    },
    /// Print the camera stream URL
    StreamUrl,
    /// Start an interactive session that syncs hotspot positions and watches for detections
    Run(RunArgs),
}

async fn dispatch(client: RemoteClient, command: Commands) -> Result {
    match command {
        Commands::Login { username, password } => {
            let credentials = Credentials::for_login(&username, &password)?;
            let message = client.login(&credentials).await.context("Login failed")?;
            println!("{message}");
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => {
            let credentials = Credentials::for_registration(&username, &password, &confirm)?;
            client
                .register(&credentials)
                .await
                .context("Registration failed")?;
            println!("Registration successful, you can now log in.");
        }
        Commands::Servo { servo, angle } => {
            let command = ServoCommand::parse(servo, &angle)?;
            client
                .set_servo(&command)
                .await
                .context("Couldn't move the servo")?;
            println!("Servo {} set to {}°", command.servo, command.angle);
        }
        Commands::StreamUrl => println!("{}", client.video_feed_url()),
        Commands::Run(args) => session::run(client, args.into_options()?).await?,
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    colog::init();

    let cli = Cli::parse();

    debug!("Using rig at {}", cli.base_url);

    let client = RemoteClient::new(&cli.base_url)?;

    dispatch(client, cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn parse_run(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(["picontrol", "run"].iter().chain(args))
            .expect("Failed to parse");
        match cli.command {
            Commands::Run(args) => args,
            _ => panic!("Not a run command"),
        }
    }

    #[test]
    fn test_run_fixed_location() {
        let opts = parse_run(&["--lat", "51.5007", "--lon", "-0.1246", "--provider"])
            .into_options()
            .expect("Bad options");
        assert_eq!(
            opts.source,
            LocationSource::Fixed(Coordinate::new(51.5007, -0.1246))
        );
        assert_eq!(opts.role, Role::Provider);
        assert_eq!(opts.settings, SyncSettings::default());
    }

    #[test]
    fn test_run_defaults_to_consumer_without_location() {
        let opts = parse_run(&[]).into_options().expect("Bad options");
        assert_eq!(opts.source, LocationSource::Disabled);
        assert_eq!(opts.role, Role::Consumer);
    }

    #[test]
    fn test_run_rejects_impossible_location() {
        assert!(
            parse_run(&["--lat", "91", "--lon", "0"])
                .into_options()
                .is_err()
        );
    }

    #[test]
    fn test_run_lat_needs_lon() {
        assert!(Cli::try_parse_from(["picontrol", "run", "--lat", "1"]).is_err());
        assert!(
            Cli::try_parse_from([
                "picontrol",
                "run",
                "--lat",
                "1",
                "--lon",
                "2",
                "--location-file",
                "here.json"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_servo_accepts_negative_text() {
        let cli = Cli::try_parse_from(["picontrol", "servo", "1", "-5"]).expect("Failed to parse");
        match cli.command {
            Commands::Servo { servo, angle } => {
                assert_eq!(servo, 1);
                assert!(ServoCommand::parse(servo, &angle).is_err());
            }
            _ => panic!("Not a servo command"),
        }
    }
}
