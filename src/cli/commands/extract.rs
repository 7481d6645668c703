//! CLI implementation for `emanator extract`

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{create_spinner, status};
use crate::core::flags::Flags;
use crate::infra::archive::{extract, ExtractOutcome};

/// Execute the extract command
pub async fn execute(file: &Path, folder: &Path, flags: &Flags, quiet: bool) -> Result<()> {
    let outcome = extract_with_spinner(file, folder, flags, quiet).await?;

    if !quiet {
        match outcome {
            ExtractOutcome::Extracted { folder, .. } => {
                println!("{} Extracted into {}", status::SUCCESS, folder.display());
            }
            ExtractOutcome::Skipped => {
                println!("{} Fast mode, extraction skipped", status::INFO);
            }
        }
    }
    Ok(())
}

/// Extract with a spinner unless `quiet`
pub(crate) async fn extract_with_spinner(
    file: &Path,
    folder: &Path,
    flags: &Flags,
    quiet: bool,
) -> Result<ExtractOutcome> {
    let spinner = (!quiet).then(|| create_spinner(&format!("Extracting {}", file.display())));

    let outcome = extract(file, folder, flags)
        .await
        .with_context(|| format!("Failed to extract {}", file.display()));

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    outcome
}
