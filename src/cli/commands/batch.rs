//! CLI implementation for `emanator batch`
//!
//! Reads the `downloads` list of a layered config and fetches each entry,
//! extracting it when `extract_to` is set. Entries run strictly one after
//! another; the first failure aborts the batch.
//!
//! ```json
//! {
//!     "downloads": [
//!         { "url": "https://example.com/sdk.zip", "file": "deps/sdk.zip", "extract_to": "deps/sdk" }
//!     ]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::cli::commands::extract::extract_with_spinner;
use crate::cli::commands::fetch::fetch_with_bar;
use crate::cli::output::status;
use crate::config::defaults::BATCH_DOWNLOADS_KEY;
use crate::core::flags::Flags;
use crate::core::layered_config::ConfigMerger;
use crate::core::serial::run_serially_value;
use crate::error::SerialError;
use crate::infra::download::{DownloadManager, FetchOutcome};

/// One entry of the `downloads` list
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BatchEntry {
    /// Source URL
    pub url: String,
    /// Destination file, relative to the config directory
    pub file: PathBuf,
    /// Folder to extract the file into
    #[serde(default)]
    pub extract_to: Option<PathBuf>,
}

/// Execute the batch command
pub async fn execute(dir: &Path, name: &str, flags: &Flags, quiet: bool) -> Result<()> {
    let Some(config) = ConfigMerger::new(dir)
        .load(name, None)
        .with_context(|| format!("Failed to load configuration '{name}'"))?
    else {
        anyhow::bail!(
            "No configuration found for '{name}' in {} (expected {name}.conf)",
            dir.display()
        );
    };

    let manager = &DownloadManager::new();
    let downloaded = run_serially_value(config.get(BATCH_DOWNLOADS_KEY), move |item: Value| async move {
        let entry: BatchEntry = serde_json::from_value(item)
            .with_context(|| format!("Invalid entry in '{BATCH_DOWNLOADS_KEY}'"))?;
        run_entry(manager, dir, &entry, flags, quiet).await
    })
    .await
    .map_err(|e| match e {
        SerialError::Worker(inner) => inner,
        other => anyhow!("'{BATCH_DOWNLOADS_KEY}' in '{name}': {other}"),
    })?;

    if !quiet {
        println!(
            "{} Batch complete, {} file(s) downloaded",
            status::SUCCESS,
            downloaded.len()
        );
        for path in &downloaded {
            println!("    {}", path.display());
        }
    }
    Ok(())
}

/// Fetch and optionally extract one entry
///
/// Resolves with the file path when something was downloaded, `None` when
/// the file already existed.
async fn run_entry(
    manager: &DownloadManager,
    dir: &Path,
    entry: &BatchEntry,
    flags: &Flags,
    quiet: bool,
) -> Result<Option<PathBuf>> {
    let file = dir.join(&entry.file);
    let outcome = fetch_with_bar(manager, &entry.url, &file, flags, quiet).await?;

    if let Some(folder) = &entry.extract_to {
        extract_with_spinner(&file, &dir.join(folder), flags, quiet).await?;
    }

    Ok(match outcome {
        FetchOutcome::Downloaded(result) => Some(result.path),
        FetchOutcome::Skipped(_) => None,
    })
}
