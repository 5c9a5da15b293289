//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration file management (init, show, path)
//! - [`locate`] - Replay a device track through the acquisition engine
//! - [`route`] - Route to the first vehicle in a list
//! - [`status`] - Fused vehicle positions and status labels

pub mod common;
pub mod config;
pub mod locate;
pub mod route;
pub mod status;
