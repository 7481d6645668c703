//! Emanator - build tooling helpers
//!
//! This library provides the pieces build scripts keep reimplementing:
//! layered configuration files, serial async pipelines, downloads with
//! progress, archive extraction and process spawning.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Configuration merging and serial pipelines (no network or process I/O)
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
