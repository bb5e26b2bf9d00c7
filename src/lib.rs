//! # git-migrate
//!
//! Migrate git repositories between Gitea (and Codeberg), GitHub and GitLab,
//! with their full history (mirror clone, then push of every branch and tag).
//!
//! ## Usage
//!
//! ```txt
//! Usage: git-migrate [OPTIONS]
//!
//! Options:
//!   -s, --source <SOURCE>            The source platform (gitea, codeberg, github, gitlab) [aliases: from]
//!   -d, --destination <DESTINATION>  The destination platform (gitea, codeberg, github, gitlab) [aliases: to]
//!   -r, --repos <REPOS>...           Repositories to migrate (`name` or `owner/name`)
//!   -l, --list                       List the repositories of the source and exit
//!       --no-interactive             Migrate every repository owned by the source user without asking
//!   -c, --config <CONFIG>            Custom configuration file path
//!       --show-config-path           Show the current config path
//!       --setup                      Write a `.env` template in the current directory
//!       --log-file <LOG_FILE>        Log file, appended to [default: migration.log]
//!   -v, --verbose...                 Verbose mode (-v, -vv)
//!   -h, --help                       Print help
//!   -V, --version                    Print version
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::multiple_crate_versions)]
// no public repository yet
#![allow(clippy::cargo_common_metadata)]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod engine;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod git;
pub(crate) mod logging;
pub(crate) mod platform;
pub(crate) mod repo;
pub(crate) mod selector;
pub(crate) mod utils;

mod gitea;
mod github;
mod gitlab;

pub use cli::{git_mover_main, run, GitMoverCli};
pub use config::{GitMoverConfig, ProviderConfig};
pub use engine::{MigrationEngine, MigrationOutcome, MigrationReport, MigrationState};
pub use errors::{GitMoverError, GitMoverErrorKind};
pub use factory::PlatformFactory;
pub use git::{GitOutput, GitRunner, SystemGit};
pub use gitea::platform::GiteaPlatform;
pub use github::platform::GithubPlatform;
pub use gitlab::platform::GitlabPlatform;
pub use platform::{
    DestinationPlatform, Direction, LookupFuture, PlatformFuture, PlatformType, SourcePlatform,
};
pub use repo::Repo;
