//! Error types for emanator
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Layered configuration errors
///
/// A missing configuration is not an error: the merger falls back to the
/// caller's defaults. Only unreadable or malformed layers end up here.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A layer existed at check time but could not be read
    #[error("Failed to read config layer '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// A layer is not valid layer syntax
    #[error("Failed to parse config layer '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// A layer parsed, but its top level is not a mapping
    #[error("Config layer '{path}' must contain an object at the top level")]
    NotAMapping { path: PathBuf },

    /// The effective configuration does not fit the requested type
    #[error("Failed to convert configuration '{name}': {error}")]
    Convert { name: String, error: String },
}

/// Serial pipeline errors
#[derive(Error, Debug)]
pub enum SerialError<E> {
    /// The item list is absent or not a sequence
    #[error("Serial run expects a sequence of items, got {found}")]
    NotASequence { found: &'static str },

    /// A worker failed; the run stopped at this item
    #[error("{0}")]
    Worker(E),
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    Network { url: String, error: String },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Max retries exceeded
    #[error("Download failed after {retries} retries: {url}")]
    MaxRetriesExceeded { url: String, retries: u32 },
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Archive file does not exist
    #[error("Archive not found: {path}")]
    NotFound { path: PathBuf },

    /// Extension is neither .zip nor .tar.gz
    #[error("Unsupported archive format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The external extraction tool is not installed
    #[error("'{tool}' not found in PATH, required to extract '{path}'")]
    ToolMissing { tool: String, path: PathBuf },

    /// The extraction tool failed
    #[error("Failed to extract '{path}' ({reason}). It looks like the archive is corrupt, use --force to re-download it")]
    Corrupt { path: PathBuf, reason: String },

    /// Could not prepare the destination
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Could not run the extraction tool
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// Subprocess errors
#[derive(Error, Debug)]
pub enum SpawnError {
    /// The process could not be started
    #[error("Failed to start '{program}': {error}")]
    Start { program: String, error: String },

    /// Waiting on the process failed
    #[error("Failed to wait for '{program}': {error}")]
    Wait { program: String, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove a file or directory
    #[error("Failed to remove '{path}': {error}")]
    Remove { path: PathBuf, error: String },

    /// Failed to copy
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to move
    #[error("Failed to move '{from}' to '{to}': {error}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to read file or directory
    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },
}
