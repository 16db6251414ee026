//! The ingestion cycle: fetch, store, decode, classify, publish.
//!
//! Cycles run on a single task, so at most one is ever in flight. Any
//! failure inside a cycle leaves the previously published snapshot
//! untouched.

use crate::aggregate::process_batch;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::parser::parse_rows;
use crate::server::AppState;
use crate::store;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Runs one full ingestion cycle: fetch the export, persist it, then decode,
/// classify, and publish it.
#[tracing::instrument(skip(client, state, data_dir), fields(data_dir = %data_dir.display()))]
pub async fn run_cycle<C: HttpClient>(
    client: &C,
    url: &str,
    data_dir: &Path,
    state: &AppState,
) -> Result<()> {
    let bytes = fetch_bytes(client, url).await?;
    let path = store::save_export(data_dir, &bytes)?;
    publish_file(&path, state).await
}

/// Decodes and classifies a stored export, then publishes the snapshot.
pub async fn publish_file(path: &Path, state: &AppState) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let rows = parse_rows(&bytes)?;
    let snapshot = process_batch(&rows);

    info!(
        path = %path.display(),
        rows = snapshot.records.len(),
        categories = snapshot.totals.labels.len(),
        "Batch processed"
    );

    state.publish(snapshot).await;
    Ok(())
}

/// Publishes the most recent stored export, if one exists. Used at startup
/// and as a fallback when a fetch fails. Returns `true` if something was
/// published.
pub async fn publish_latest(data_dir: &Path, state: &AppState) -> Result<bool> {
    match store::latest_export(data_dir)? {
        Some(path) => {
            info!(path = %path.display(), "Loading latest stored export");
            publish_file(&path, state).await?;
            Ok(true)
        }
        None => {
            info!(data_dir = %data_dir.display(), "No stored exports found");
            Ok(false)
        }
    }
}

/// Fetches and publishes on a fixed interval until the process exits.
pub async fn run_ingest_loop<C: HttpClient>(
    client: C,
    url: String,
    data_dir: PathBuf,
    state: Arc<AppState>,
    interval_secs: u64,
) {
    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(interval_secs)).await;

        info!(url = %url, "Starting scheduled ingestion cycle");
        if let Err(e) = run_cycle(&client, &url, &data_dir, &state).await {
            error!(error = %e, "Ingestion cycle failed, keeping previous snapshot");
        }
    }
}
