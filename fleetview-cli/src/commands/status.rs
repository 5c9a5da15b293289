//! Fused vehicle positions and status labels.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fleetview::config::ConfigFile;
use fleetview::live_location::{RawTelemetry, TelemetryBoard, ViewOrigin};
use fleetview::map_view::{MapComposer, MapViewport, ViewportRefresher};
use fleetview::routing::RouteOverlay;

use super::common;
use crate::error::CliError;

/// Arguments for `fleetview status`.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// JSON vehicle list
    #[arg(long)]
    pub vehicles: PathBuf,

    /// JSON object mapping vehicle id to its telemetry snapshot
    #[arg(long)]
    pub telemetry: Option<PathBuf>,

    /// Viewport width in pixels, selects the desktop or mobile layout
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Print the full map view model as JSON
    #[arg(long)]
    pub json: bool,
}

/// No renderer behind the CLI; viewport refreshes are only logged.
struct LogRefresher;

impl ViewportRefresher for LogRefresher {
    fn recompute_viewport(&self) {
        tracing::trace!("Viewport recompute requested");
    }
}

/// Classify each vehicle and print where it is drawn.
pub fn run(args: StatusArgs, config: &ConfigFile) -> Result<(), CliError> {
    let vehicles = common::load_vehicles(&args.vehicles)?;

    let board = TelemetryBoard::new();
    if let Some(path) = &args.telemetry {
        let snapshots: HashMap<String, RawTelemetry> = common::read_json(path)?;
        for (id, raw) in &snapshots {
            board.apply_raw(id.as_str(), raw);
        }
    }

    let mut composer = MapComposer::new(config.map_config(), Arc::new(LogRefresher));
    let layout = composer.set_viewport_width(args.width);

    // Center on the first vehicle that can be placed
    let mut model = composer.view_model(
        &vehicles,
        &board,
        MapViewport::default(),
        &RouteOverlay::default(),
    );
    if let Some(center) = model.vehicles.iter().find_map(|v| v.position) {
        model.viewport = MapViewport::new(center, config.map.default_zoom);
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&model).map_err(CliError::Render)?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Layout: {}", layout);
    for (view, marker) in model.vehicles.iter().zip(&model.markers) {
        let position = match (view.position, view.origin) {
            (Some(p), ViewOrigin::LiveTelemetry) => format!("{} (device)", p),
            (Some(p), _) => format!("{} (garage)", p),
            (None, _) => "not on map".to_string(),
        };
        println!(
            "{:<12} {:<24} {}",
            marker.name,
            marker.label,
            position
        );
    }
    Ok(())
}
