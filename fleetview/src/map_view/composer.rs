//! Map composer - layout state, viewport refresh scheduling and view model
//! assembly.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::config::MapConfig;
use super::layout::{LayoutMode, ListState, MapSurface, MobilePanel};
use super::viewport::{MapViewport, ViewportRefresher};
use crate::live_location::{
    classify, DisplayStatus, LiveTelemetrySource, LiveTelemetryState, LiveVehicleMemo, VehicleView,
};
use crate::routing::RouteOverlay;
use crate::vehicle::{Vehicle, VehicleId};

/// Status label for one drawn vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleMarker {
    pub vehicle_id: VehicleId,
    /// Display name from the current vehicle record.
    pub name: String,
    pub status: DisplayStatus,
    pub label: &'static str,
}

/// Everything the map renders for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewModel {
    pub surface: MapSurface,
    pub viewport: MapViewport,

    /// Memoized drawable set; the same `Arc` while no coordinate changed.
    #[serde(serialize_with = "serialize_views")]
    pub vehicles: Arc<[VehicleView]>,

    /// Per-vehicle status, derived fresh on every call.
    pub markers: Vec<VehicleMarker>,

    pub route: RouteOverlay,
}

fn serialize_views<S: serde::Serializer>(
    views: &Arc<[VehicleView]>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(views.iter())
}

/// Layout state and view model assembly for the map.
///
/// Scheduling a viewport refresh spawns a timer task, so mobile toggles
/// must happen inside a tokio runtime.
pub struct MapComposer<V: ViewportRefresher> {
    config: MapConfig,
    refresher: Arc<V>,
    layout: LayoutMode,
    panel: MobilePanel,
    map_key: u64,

    /// Pending viewport refresh, superseded by the next transition.
    pending_refresh: Option<JoinHandle<()>>,

    memo: LiveVehicleMemo,
}

impl<V: ViewportRefresher> MapComposer<V> {
    /// Create a composer in desktop layout with the list panel selected.
    pub fn new(config: MapConfig, refresher: Arc<V>) -> Self {
        Self {
            config,
            refresher,
            layout: LayoutMode::Desktop,
            panel: MobilePanel::List,
            map_key: 0,
            pending_refresh: None,
            memo: LiveVehicleMemo::new(),
        }
    }

    /// Re-evaluate the layout for a new viewport width.
    pub fn set_viewport_width(&mut self, width_px: u32) -> LayoutMode {
        let layout = LayoutMode::for_width(width_px, self.config.mobile_breakpoint_px);
        if layout != self.layout {
            debug!(from = %self.layout, to = %layout, width_px, "Map layout changed");
            self.layout = layout;
        }
        layout
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn panel(&self) -> MobilePanel {
        self.panel
    }

    /// Current map key. Changes on every list/map transition.
    pub fn map_key(&self) -> u64 {
        self.map_key
    }

    /// Switch the mobile layout between list and map.
    ///
    /// Any pending viewport refresh is cancelled; switching to the map
    /// schedules a new one after the settle delay. Ignored on desktop,
    /// where the map panel is always shown.
    pub fn toggle_mobile_view(&mut self) -> MobilePanel {
        if self.layout == LayoutMode::Desktop {
            trace!("Mobile view toggle ignored on desktop layout");
            return self.panel;
        }

        self.panel = self.panel.toggled();
        self.map_key = self.map_key.wrapping_add(1);

        if let Some(pending) = self.pending_refresh.take() {
            pending.abort();
        }
        if self.panel == MobilePanel::Map {
            self.pending_refresh = Some(self.schedule_refresh());
        }

        trace!(panel = ?self.panel, map_key = self.map_key, "Mobile view toggled");
        self.panel
    }

    fn schedule_refresh(&self) -> JoinHandle<()> {
        let refresher = Arc::clone(&self.refresher);
        let settle = self.config.resize_settle;
        let map_key = self.map_key;

        tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            trace!(map_key, "Recomputing map viewport");
            refresher.recompute_viewport();
        })
    }

    /// The surface for the current layout.
    ///
    /// The list state never changes what the map shows: a loading or
    /// failed list sits beside the same map.
    pub fn compose(&self, list: &ListState) -> MapSurface {
        if let ListState::Failed(reason) = list {
            trace!(reason = %reason, "Composing map beside failed list");
        }
        match self.layout {
            LayoutMode::Desktop => MapSurface::DesktopPanel,
            LayoutMode::Mobile => MapSurface::Mobile {
                panel: self.panel,
                map_visible: self.panel == MobilePanel::Map,
                map_key: self.map_key,
            },
        }
    }

    /// Assemble what the map renders.
    pub fn view_model<S>(
        &mut self,
        vehicles: &[Vehicle],
        telemetry: &S,
        viewport: MapViewport,
        route: &RouteOverlay,
    ) -> MapViewModel
    where
        S: LiveTelemetrySource + ?Sized,
    {
        // One read per vehicle so placement and status come from the same
        // snapshot while the source is being written.
        let snapshots: Vec<LiveTelemetryState> = vehicles
            .iter()
            .map(|v| telemetry.telemetry(&v.id))
            .collect();

        let views = self.memo.derive_from(vehicles, &snapshots);
        let markers = vehicles
            .iter()
            .zip(&snapshots)
            .map(|(v, t)| {
                let status = classify(t);
                VehicleMarker {
                    vehicle_id: v.id.clone(),
                    name: v.display_name(),
                    status,
                    label: status.label(),
                }
            })
            .collect();

        MapViewModel {
            surface: self.compose(&ListState::Ready),
            viewport,
            vehicles: views,
            markers,
            route: route.clone(),
        }
    }
}

impl<V: ViewportRefresher> Drop for MapComposer<V> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending_refresh.take() {
            pending.abort();
        }
    }
}
