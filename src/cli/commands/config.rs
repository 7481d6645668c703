//! CLI implementation for `emanator config`
//!
//! Prints the effective configuration of a profile.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::layered_config::ConfigMerger;

/// Execute the config command
pub fn execute(dir: &Path, name: &str, defaults: Option<&Path>) -> Result<()> {
    let defaults = match defaults {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read defaults from {}", path.display()))?;
            let value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse defaults in {}", path.display()))?;
            Some(value)
        }
        None => None,
    };

    let effective = ConfigMerger::new(dir)
        .load(name, defaults)
        .with_context(|| format!("Failed to load configuration '{name}'"))?;

    let rendered = match effective {
        Some(value) => serde_json::to_string_pretty(&value)?,
        None => "null".to_string(),
    };
    println!("{rendered}");
    Ok(())
}
