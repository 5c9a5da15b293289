//! Route Computation Adapter
//!
//! Computes a driving route from the user's location to the first vehicle
//! in a candidate list and exposes it as a polyline plus a distance and
//! duration summary.
//!
//! # Architecture
//!
//! ```text
//! RouteAdapter ──fetch_route──► RoutingClient (trait)
//!      │                              └── OsrmClient (reqwest, OSRM HTTP API)
//!      └── watch::Sender<RouteOverlay> ──► map layer
//! ```
//!
//! Only the first vehicle is considered. Routing is best-effort: every
//! failure collapses to an empty overlay and is logged, never returned.
//!
//! # Usage
//!
//! ```ignore
//! let client = OsrmClient::new(RoutingConfig::default())?;
//! let adapter = RouteAdapter::new(Arc::new(client));
//! let mut overlay = adapter.subscribe();
//!
//! adapter.update(Some(user), &vehicles);
//! overlay.changed().await?;
//! ```

mod adapter;
mod client;
mod config;
mod error;

pub use adapter::{select_destination, RouteAdapter, RouteInfo, RouteOverlay};
pub use client::{parse_osrm_response, OsrmClient, Route, RoutingClient};
pub use config::{RoutingConfig, DEFAULT_OSRM_BASE_URL, DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS};
pub use error::RoutingError;
