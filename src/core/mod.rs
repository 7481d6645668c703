//! Core logic module
//!
//! Pure logic with no network or process I/O - those belong in
//! [`crate::infra`]. Layer files are read through the
//! [`layered_config::LayerSource`] seam.
//!
//! # Submodules
//!
//! - [`layered_config`] - Layered configuration loading and deep merging
//! - [`layer_format`] - Layer file syntax (JSON with comments)
//! - [`serial`] - Serial async pipelines with fail-fast semantics
//! - [`flags`] - Per-operation behavior flags
//! - [`size`] - Human-readable byte sizes

pub mod flags;
pub mod layer_format;
pub mod layered_config;
pub mod serial;
pub mod size;
