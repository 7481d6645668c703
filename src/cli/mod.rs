//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no helper logic - that belongs in [`crate::core`] and
//! [`crate::infra`].

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;

use crate::core::flags::Flags;
use commands::Commands;

/// Emanator - build tooling helpers
///
/// Layered configuration, downloads, archive extraction and serial batches.
#[derive(Parser, Debug)]
#[command(name = "emanator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Re-download files that already exist
    #[arg(long, global = true, env = "EMANATOR_FORCE")]
    pub force: bool,

    /// Skip archive extraction
    #[arg(long, global = true, env = "EMANATOR_FAST")]
    pub fast: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Behavior flags selected on the command line
    pub fn flags(&self) -> Flags {
        Flags::new(self.force, self.verbose > 0, self.fast)
    }

    /// Log filter directive matching `-v`/`-q`
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let flags = self.flags();
        if let Some(cmd) = self.command {
            cmd.run(flags, self.quiet).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
