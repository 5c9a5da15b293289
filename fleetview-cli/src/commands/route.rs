//! Route from a given location to the first vehicle in a list.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fleetview::config::ConfigFile;
use fleetview::coord::Coordinate;
use fleetview::routing::{OsrmClient, RouteAdapter};

use super::common;
use crate::error::CliError;

/// Arguments for `fleetview route`.
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Your latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Your longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// JSON vehicle list; only the first entry is routed to
    #[arg(long)]
    pub vehicles: PathBuf,

    /// Print the full overlay as JSON
    #[arg(long)]
    pub json: bool,
}

/// Compute and print the route.
pub fn run(args: RouteArgs, config: &ConfigFile) -> Result<(), CliError> {
    let user = Coordinate::new(args.lat, args.lon)?;
    let vehicles = common::load_vehicles(&args.vehicles)?;

    let client = OsrmClient::new(config.routing_config())?;
    let adapter = RouteAdapter::new(Arc::new(client));

    let runtime = common::runtime()?;
    let overlay = runtime.block_on(adapter.compute(Some(user), &vehicles));

    if args.json {
        let rendered = serde_json::to_string_pretty(&overlay).map_err(CliError::Render)?;
        println!("{}", rendered);
        return Ok(());
    }

    match (overlay.info, vehicles.first()) {
        (Some(info), Some(vehicle)) => {
            println!("Route to {}", vehicle.display_name());
            println!("  Distance: {:.1} km", info.distance_km);
            println!("  Duration: {:.0} min", info.duration_min);
            println!("  Points:   {}", overlay.polyline.len());
        }
        _ => println!("No route"),
    }
    Ok(())
}
