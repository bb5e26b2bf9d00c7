//! Git subprocesses
use std::{path::Path, process::Stdio};

use log::trace;
use tokio::process::Command;

use crate::{errors::GitMoverError, platform::PlatformFuture};

/// Outcome of one git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit status was zero
    pub success: bool,

    /// Captured standard error
    pub stderr: String,
}

impl GitOutput {
    /// Successful run
    pub fn ok() -> Self {
        Self {
            success: true,
            stderr: String::new(),
        }
    }

    /// Failed run with the given stderr
    pub fn failed(stderr: &str) -> Self {
        Self {
            success: false,
            stderr: stderr.to_string(),
        }
    }
}

/// Runs git commands
pub trait GitRunner: Sync + Send {
    /// Run `git <args>` inside `cwd`.
    ///
    /// A non-zero exit is reported through [`GitOutput::success`]; `Err` means git could not be run at all.
    fn run<'a>(&'a self, args: &'a [String], cwd: &'a Path) -> PlatformFuture<'a, GitOutput>;
}

/// The `git` binary found in `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl GitRunner for SystemGit {
    fn run<'a>(&'a self, args: &'a [String], cwd: &'a Path) -> PlatformFuture<'a, GitOutput> {
        Box::pin(async move {
            trace!("git {} (in {})", args.first().map_or("", String::as_str), cwd.display());
            let output = Command::new("git")
                .args(args)
                .current_dir(cwd)
                .env("GIT_TERMINAL_PROMPT", "0")
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| GitMoverError::new_with_source("Unable to run git", e))?;
            Ok(GitOutput {
                success: output.status.success(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        })
    }
}

/// Build an argument list
pub(crate) fn git_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_string()).collect()
}
