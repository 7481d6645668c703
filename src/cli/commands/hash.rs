//! CLI implementation for `emanator hash`

use std::path::Path;

use anyhow::{Context, Result};

use crate::infra::filesystem::{hash_file, HashAlgorithm};

/// Execute the hash command
pub fn execute(file: &Path, algorithm: HashAlgorithm) -> Result<()> {
    let digest = hash_file(file, algorithm)
        .with_context(|| format!("Failed to hash {}", file.display()))?;
    println!("{digest}  {}", file.display());
    Ok(())
}
