//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod batch;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod hash;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::core::flags::Flags;
use crate::infra::filesystem::HashAlgorithm;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective layered configuration as JSON
    Config {
        /// Profile name (reads <name>.conf, <name>.<hostname>.conf, <name>.local.conf)
        name: String,

        /// Directory holding the layer files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// JSON file with default values to merge the layers over
        #[arg(long)]
        defaults: Option<PathBuf>,
    },

    /// Download a file unless it already exists
    Fetch {
        /// URL to download
        url: String,

        /// Destination file
        file: PathBuf,
    },

    /// Extract a .zip or .tar.gz archive
    Extract {
        /// Archive to extract
        file: PathBuf,

        /// Destination folder
        folder: PathBuf,
    },

    /// Print the hex digest of a file
    Hash {
        /// File to hash
        file: PathBuf,

        /// Digest algorithm (sha256 or sha512)
        #[arg(short, long, default_value = "sha256")]
        algorithm: HashAlgorithm,
    },

    /// Fetch (and extract) every entry of a config's `downloads` list, one at a time
    Batch {
        /// Profile name of the layered config
        name: String,

        /// Directory holding the layer files; relative entries resolve against it
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, flags: Flags, quiet: bool) -> Result<()> {
        match self {
            Self::Config {
                name,
                dir,
                defaults,
            } => config::execute(&dir, &name, defaults.as_deref()),
            Self::Fetch { url, file } => fetch::execute(&url, &file, &flags, quiet).await,
            Self::Extract { file, folder } => extract::execute(&file, &folder, &flags, quiet).await,
            Self::Hash { file, algorithm } => hash::execute(&file, algorithm),
            Self::Batch { name, dir } => batch::execute(&dir, &name, &flags, quiet).await,
        }
    }
}
