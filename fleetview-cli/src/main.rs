//! FleetView CLI - Command-line interface
//!
//! Drives the FleetView location core from recorded and file-based inputs:
//! replay a device track through the acquisition engine, compute a route to
//! a vehicle, or classify vehicles against a telemetry snapshot.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fleetview::config::ConfigFile;
use fleetview::logging::{init_logging, LoggingGuard};

use commands::config::ConfigCommands;
use commands::locate::LocateArgs;
use commands::route::RouteArgs;
use commands::status::StatusArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "fleetview")]
#[command(version = fleetview::VERSION)]
#[command(about = "Real-time vehicle and user location tools", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.fleetview/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire a position from a recorded device track
    Locate(LocateArgs),

    /// Compute a driving route to the first vehicle in a list
    Route(RouteArgs),

    /// Show where each vehicle is drawn and how current that location is
    Status(StatusArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(fleetview::config::config_file_path);

    match cli.command {
        Commands::Config { command } => commands::config::run(command, &config_path),
        Commands::Locate(args) => {
            let config = ConfigFile::load_from(&config_path)?;
            let _guard = start_logging(&config)?;
            commands::locate::run(args, &config)
        }
        Commands::Route(args) => {
            let config = ConfigFile::load_from(&config_path)?;
            let _guard = start_logging(&config)?;
            commands::route::run(args, &config)
        }
        Commands::Status(args) => {
            let config = ConfigFile::load_from(&config_path)?;
            let _guard = start_logging(&config)?;
            commands::status::run(args, &config)
        }
    }
}

fn start_logging(config: &ConfigFile) -> Result<LoggingGuard, CliError> {
    let guard = init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    tracing::debug!(
        version = fleetview::VERSION,
        log_file = %guard.log_path().display(),
        "FleetView CLI started"
    );
    Ok(guard)
}
