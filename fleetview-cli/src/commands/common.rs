//! Common utilities shared across CLI commands.

use std::path::Path;

use fleetview::vehicle::Vehicle;
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Single-threaded runtime for one command.
pub fn runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Read and parse a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let bytes = std::fs::read(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;
    serde_json::from_slice(&bytes).map_err(|error| CliError::InvalidInput {
        path: path.to_path_buf(),
        error,
    })
}

/// Load a vehicle list as returned by the vehicle service.
pub fn load_vehicles(path: &Path) -> Result<Vec<Vehicle>, CliError> {
    read_json(path)
}
