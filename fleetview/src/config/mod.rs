//! Configuration for FleetView components.
//!
//! User settings live in `~/.fleetview/config.ini`. The file is split into
//! one section per component and every key is optional; missing keys fall
//! back to the defaults in [`defaults`].
//!
//! - [`settings`] - plain data structs, one per `[section]`
//! - [`defaults`] - `DEFAULT_*` constants and `ConfigFile::default()`
//! - [`parser`] - INI to `ConfigFile`, with validation
//! - [`writer`] - `ConfigFile` to commented INI
//! - [`file`] - load/save and path helpers
//!
//! # Example
//!
//! ```ignore
//! use fleetview::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let engine = GeolocationEngine::new(device, config.acquisition_config());
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, GeolocationSettings, LoggingSettings, MapSettings, RoutingSettings};
