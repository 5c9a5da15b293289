//! Map Composition Layer
//!
//! Decides which map surface the screen shows for the current layout and
//! assembles the data the map draws: vehicle markers with their status,
//! the route overlay, and the upstream center/zoom.
//!
//! # Layout
//!
//! - **Desktop**: a side panel always shows the map, whatever state the
//!   vehicle list is in.
//! - **Mobile**: the user toggles between list and map. The map stays
//!   mounted while hidden; every transition issues a fresh map key, and
//!   each switch to the map asks the renderer to recompute its viewport
//!   once the layout has settled.
//!
//! # Components
//!
//! - [`layout`] - `LayoutMode`, `MobilePanel`, `MapSurface`, `ListState`
//! - [`viewport`] - `MapViewport`, `ViewportRefresher`
//! - [`composer`] - `MapComposer`, `MapViewModel`

mod composer;
mod config;
mod layout;
mod viewport;

pub use composer::{MapComposer, MapViewModel, VehicleMarker};
pub use config::{MapConfig, DEFAULT_MOBILE_BREAKPOINT_PX, DEFAULT_RESIZE_SETTLE_MS, DEFAULT_ZOOM};
pub use layout::{LayoutMode, ListState, MapSurface, MobilePanel};
pub use viewport::{MapViewport, ViewportRefresher};
