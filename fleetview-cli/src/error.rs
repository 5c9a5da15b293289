//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use fleetview::config::ConfigFileError;
use fleetview::coord::CoordError;
use fleetview::geolocation::ReplayError;
use fleetview::routing::RoutingError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to load a recorded location track
    Replay { path: PathBuf, error: ReplayError },
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Input file is not the expected JSON
    InvalidInput { path: PathBuf, error: serde_json::Error },
    /// Coordinate given on the command line is unusable
    InvalidCoordinate(CoordError),
    /// Failed to create the routing client
    Routing(RoutingError),
    /// Acquisition ended without a position
    Location(String),
    /// Refused to overwrite an existing file
    AlreadyExists(PathBuf),
    /// Failed to render JSON output
    Render(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Replay { .. } => {
                eprintln!();
                eprintln!("A track is a JSON array of steps, for example:");
                eprintln!(
                    r#"  [{{"delay_ms": 200, "latitude": 14.55, "longitude": 121.02, "accuracy": 900}}]"#
                );
            }
            CliError::AlreadyExists(_) => {
                eprintln!();
                eprintln!("Use --force to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Replay { path, error } => {
                write!(f, "Failed to load track '{}': {}", path.display(), error)
            }
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
            CliError::InvalidInput { path, error } => {
                write!(f, "Invalid JSON in '{}': {}", path.display(), error)
            }
            CliError::InvalidCoordinate(e) => write!(f, "Invalid location: {}", e),
            CliError::Routing(e) => write!(f, "Routing unavailable: {}", e),
            CliError::Location(msg) => write!(f, "{}", msg),
            CliError::AlreadyExists(path) => write!(f, "'{}' already exists", path.display()),
            CliError::Render(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Replay { error, .. } => Some(error),
            CliError::FileRead { error, .. } => Some(error),
            CliError::InvalidInput { error, .. } => Some(error),
            CliError::InvalidCoordinate(e) => Some(e),
            CliError::Routing(e) => Some(e),
            CliError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::InvalidCoordinate(e)
    }
}

impl From<RoutingError> for CliError {
    fn from(e: RoutingError) -> Self {
        CliError::Routing(e)
    }
}
