use std::env;
use std::process::ExitCode;

use rusqlite::Connection;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use simventory::error::{Result, SimventoryError};
use simventory::settings::Settings;
use simventory::store::Store;
use simventory::walker::reconstruct_simulation;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, "some simulations could not be reconstructed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "aborting");
            ExitCode::FAILURE
        }
    }
}

/// Runs the whole batch; returns how many simulation ids failed.
fn run() -> Result<usize> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| SimventoryError::Config("usage: simventory <simulation-log.sqlite>".into()))?;
    let settings = Settings::load()?;

    let conn = Connection::open(&path)?;
    let store = Store::new(&conn);
    store.prepare_schema(settings.build_indexes)?;

    let sim_ids = store.sim_ids()?;
    info!(simulations = sim_ids.len(), %path, "reconstructing inventories");

    // a failed simulation id does not stop the batch, the rest are still attempted
    let mut failed = 0usize;
    for simid in &sim_ids {
        match reconstruct_simulation(&store, simid, settings.batch_size) {
            Ok(summary) => {
                info!(
                    %simid,
                    resources = summary.resources,
                    segments = summary.segments,
                    "inventory complete"
                );
            }
            Err(e) => {
                error!(%simid, error = %e, "inventory failed");
                failed += 1;
            }
        }
    }

    if settings.build_indexes {
        store.finish()?;
    }
    Ok(failed)
}
