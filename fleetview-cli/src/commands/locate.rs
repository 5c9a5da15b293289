//! Replay a recorded device track through the acquisition engine.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fleetview::config::ConfigFile;
use fleetview::geolocation::{AcquisitionPhase, AcquisitionSnapshot, GeolocationEngine, ReplayCapability};

use super::common;
use crate::error::CliError;

/// Arguments for `fleetview locate`.
#[derive(Debug, Args)]
pub struct LocateArgs {
    /// JSON track of timed readings to replay as the device
    #[arg(long)]
    pub replay: PathBuf,

    /// Print each published fix as a JSON line
    #[arg(long)]
    pub json: bool,
}

/// Run an acquisition session and print each improvement.
pub fn run(args: LocateArgs, config: &ConfigFile) -> Result<(), CliError> {
    let capability = ReplayCapability::from_json_file(&args.replay).map_err(|error| {
        CliError::Replay {
            path: args.replay.clone(),
            error,
        }
    })?;

    let runtime = common::runtime()?;
    let last = runtime.block_on(acquire(Arc::new(capability), config, args.json));

    match (last.fix(), last.error) {
        (Some(_), _) => Ok(()),
        (None, Some(message)) => Err(CliError::Location(message)),
        (None, None) => Err(CliError::Location("Location acquisition interrupted".to_string())),
    }
}

async fn acquire(
    capability: Arc<ReplayCapability>,
    config: &ConfigFile,
    json: bool,
) -> AcquisitionSnapshot {
    let engine = GeolocationEngine::new(capability, config.acquisition_config());
    let mut updates = engine.subscribe();
    engine.toggle();

    let mut printed = None;
    loop {
        let snapshot = updates.borrow_and_update().clone();

        if let Some(fix) = snapshot.fix() {
            if printed != Some(fix.accuracy) {
                printed = Some(fix.accuracy);
                if json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "phase": snapshot.phase.to_string(),
                            "latitude": fix.coords.latitude(),
                            "longitude": fix.coords.longitude(),
                            "accuracy_m": fix.accuracy.meters(),
                        })
                    );
                } else {
                    println!(
                        "{:<9} {}  {}",
                        snapshot.phase.to_string(),
                        fix.coords,
                        fix.accuracy
                    );
                }
            }
        }

        if snapshot.phase == AcquisitionPhase::Complete {
            if let Some(error) = &snapshot.error {
                tracing::warn!(error = %error, "Location acquisition failed");
            }
            return snapshot;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return engine.snapshot();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping location acquisition");
                let last = engine.snapshot();
                engine.disable();
                return last;
            }
        }
    }
}
