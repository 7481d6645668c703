//! CLI implementation for `emanator fetch`

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::cli::output::{bar_callback, create_download_bar, status};
use crate::core::flags::Flags;
use crate::infra::download::{DownloadManager, FetchOutcome};

/// Execute the fetch command
pub async fn execute(url: &str, file: &Path, flags: &Flags, quiet: bool) -> Result<()> {
    let manager = DownloadManager::new();
    let outcome = fetch_with_bar(&manager, url, file, flags, quiet).await?;

    if !quiet {
        match outcome {
            FetchOutcome::Downloaded(result) => {
                println!("{} Downloaded {}", status::SUCCESS, result.path.display());
            }
            FetchOutcome::Skipped(path) => {
                println!("{} {} already exists, skipped", status::INFO, path.display());
            }
        }
    }
    Ok(())
}

/// Fetch with a progress bar unless `quiet`
pub(crate) async fn fetch_with_bar(
    manager: &DownloadManager,
    url: &str,
    file: &Path,
    flags: &Flags,
    quiet: bool,
) -> Result<FetchOutcome> {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        create_download_bar()
    };

    let outcome = manager
        .fetch(url, file, flags, Some(bar_callback(bar.clone())))
        .await
        .with_context(|| format!("Failed to fetch {url}"));

    bar.finish_and_clear();
    outcome
}
