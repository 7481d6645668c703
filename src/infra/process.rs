//! External process execution
//!
//! Thin async wrapper around `tokio::process::Command` used by the archive
//! helpers and the CLI.

use std::ffi::OsStr;
use std::path::PathBuf;

use tokio::process::Command;

use crate::error::SpawnError;

/// Options for [`spawn`]
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    /// Working directory of the child
    pub cwd: Option<PathBuf>,
    /// Log the command line before running it
    pub verbose: bool,
}

/// Run `program` with `args` and wait for it to exit
///
/// The child inherits stdio. Resolves with the exit code, or `None` when the
/// child was terminated by a signal. A non-zero exit is not an error here;
/// callers decide what a given code means.
pub async fn spawn<I, A>(
    program: &str,
    args: I,
    options: &SpawnOptions,
) -> Result<Option<i32>, SpawnError>
where
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    let args: Vec<A> = args.into_iter().collect();
    let rendered = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    if options.verbose {
        tracing::info!("running: {program} {rendered}");
    } else {
        tracing::debug!("running: {program} {rendered}");
    }

    let mut command = Command::new(program);
    command.args(&args);
    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(|e| SpawnError::Start {
        program: program.to_string(),
        error: e.to_string(),
    })?;

    let status = child.wait().await.map_err(|e| SpawnError::Wait {
        program: program.to_string(),
        error: e.to_string(),
    })?;

    Ok(status.code())
}
