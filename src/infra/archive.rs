//! Archive extraction
//!
//! Unpacks `.zip` and `.tar.gz` archives by delegating to the system `unzip`
//! and `tar` tools.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::flags::Flags;
use crate::error::ExtractError;
use crate::infra::process::{spawn, SpawnOptions};

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.zip`
    Zip,
    /// `.tar.gz` / `.tgz`
    TarGz,
}

impl ArchiveKind {
    /// Detect the format from the file name (case-insensitive)
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }

    /// External tool doing the extraction
    pub fn tool(self) -> &'static str {
        match self {
            Self::Zip => "unzip",
            Self::TarGz => "tar",
        }
    }

    fn args(self, file: &Path, folder: &Path) -> Vec<OsString> {
        match self {
            Self::Zip => vec![
                "-o".into(),
                "-q".into(),
                file.into(),
                "-d".into(),
                folder.into(),
            ],
            Self::TarGz => vec!["-xzf".into(), file.into(), "-C".into(), folder.into()],
        }
    }
}

/// What [`extract`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The archive was unpacked into `folder`
    Extracted { kind: ArchiveKind, folder: PathBuf },
    /// Fast mode is on; nothing was touched
    Skipped,
}

/// Extract `file` into `folder`, overwriting existing entries
///
/// With `flags.fast` set this is a no-op. `folder` is created when missing.
pub async fn extract(file: &Path, folder: &Path, flags: &Flags) -> Result<ExtractOutcome, ExtractError> {
    if flags.fast {
        tracing::info!("FAST MODE: Skipping unzip for {}...", file.display());
        return Ok(ExtractOutcome::Skipped);
    }

    if !file.is_file() {
        return Err(ExtractError::NotFound {
            path: file.to_path_buf(),
        });
    }

    let kind = ArchiveKind::detect(file).ok_or_else(|| ExtractError::UnsupportedFormat {
        path: file.to_path_buf(),
    })?;

    if which::which(kind.tool()).is_err() {
        return Err(ExtractError::ToolMissing {
            tool: kind.tool().to_string(),
            path: file.to_path_buf(),
        });
    }

    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| ExtractError::Io {
            path: folder.to_path_buf(),
            error: e.to_string(),
        })?;

    tracing::info!("Unzipping {}...", file.display());

    let options = SpawnOptions {
        cwd: None,
        verbose: flags.verbose,
    };
    let code = spawn(kind.tool(), kind.args(file, folder), &options).await?;

    match code {
        Some(0) => {
            tracing::info!("Unzipping {} success", file.display());
            Ok(ExtractOutcome::Extracted {
                kind,
                folder: folder.to_path_buf(),
            })
        }
        Some(code) => Err(ExtractError::Corrupt {
            path: file.to_path_buf(),
            reason: format!("{} exited with code {code}", kind.tool()),
        }),
        None => Err(ExtractError::Corrupt {
            path: file.to_path_buf(),
            reason: format!("{} was terminated by a signal", kind.tool()),
        }),
    }
}
