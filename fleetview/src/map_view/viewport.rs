//! Viewport pass-through and the renderer recompute hook.

use serde::Serialize;

use crate::coord::Coordinate;

/// Center and zoom as decided upstream.
///
/// Passed through unchanged; an empty viewport is rendered as-is rather
/// than replaced by a made-up default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MapViewport {
    pub center: Option<Coordinate>,
    pub zoom: Option<u8>,
}

impl MapViewport {
    pub fn new(center: Coordinate, zoom: u8) -> Self {
        Self {
            center: Some(center),
            zoom: Some(zoom),
        }
    }

    pub fn is_set(&self) -> bool {
        self.center.is_some() && self.zoom.is_some()
    }
}

/// Hook into the map renderer.
///
/// Called after a hidden map becomes visible so the renderer can re-measure
/// its container.
pub trait ViewportRefresher: Send + Sync + 'static {
    fn recompute_viewport(&self);
}
