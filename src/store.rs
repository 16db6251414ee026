//! Timestamped storage of fetched exports in the data directory.
//!
//! Every successful fetch is written under a fresh timestamped name so the
//! most recent export survives a failed fetch and can be reprocessed.

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes a fetched export to the data directory under a timestamped name,
/// creating the directory if needed. Returns the path written.
pub fn save_export(data_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;

    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let path = data_dir.join(format!("conveyor_data_{stamp}.csv"));
    fs::write(&path, bytes)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Export saved");
    Ok(path)
}

/// Returns the most recently modified `.csv` export in the data directory,
/// or `None` if the directory is missing or holds no exports.
pub fn latest_export(data_dir: &Path) -> Result<Option<PathBuf>> {
    let Ok(entries) = fs::read_dir(data_dir) else {
        return Ok(None);
    };

    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}
