//! Command line options and the top level flow of git-migrate
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use crate::{
    config::{write_env_template, GitMoverConfig},
    engine::MigrationEngine,
    errors::GitMoverError,
    factory::PlatformFactory,
    logging::{init_logging, DEFAULT_LOG_FILE},
    platform::{Direction, SourcePlatform},
    repo::Repo,
    selector::{select_repositories, sort_repositories},
};

/// git-migrate - Migrate git repositories between Gitea, GitHub and GitLab
#[derive(Parser, Deserialize, Default, Clone, Debug)]
#[command(version)]
pub struct GitMoverCli {
    /// The source platform (gitea, codeberg, github, gitlab)
    #[arg(short, long, visible_alias = "from")]
    pub source: Option<String>,

    /// The destination platform (gitea, codeberg, github, gitlab)
    #[arg(short, long, visible_alias = "to")]
    pub destination: Option<String>,

    /// Repositories to migrate (`name` or `owner/name`), skips the interactive selection
    #[arg(short, long, num_args = 1..)]
    #[serde(default)]
    pub repos: Vec<String>,

    /// List the repositories of the source and exit
    #[arg(short, long)]
    pub list: bool,

    /// Migrate every repository owned by the source user without asking
    #[arg(long)]
    pub no_interactive: bool,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Show the current config path
    #[arg(long)]
    pub show_config_path: bool,

    /// Write a `.env` template in the current directory
    #[arg(long)]
    pub setup: bool,

    /// Log file, appended to [default: migration.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Run git-migrate with the process arguments
/// # Errors
/// Error if the configuration is invalid, a platform can't be reached or the listing fails
pub async fn git_mover_main() -> Result<(), GitMoverError> {
    run(GitMoverCli::parse(), &PlatformFactory::new()).await
}

/// Run git-migrate with parsed arguments and a platform factory
/// # Errors
/// Error if the configuration is invalid, a platform can't be reached or the listing fails
pub async fn run(cli_args: GitMoverCli, factory: &PlatformFactory) -> Result<(), GitMoverError> {
    if cli_args.setup {
        let path = Path::new(".env");
        if write_env_template(path)? {
            println!("Wrote {}, fill in your credentials", path.display());
        } else {
            println!("{} already exists, not overwriting", path.display());
        }
        return Ok(());
    }
    let log_file = cli_args
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    init_logging(cli_args.verbose, &log_file);

    let config = GitMoverConfig::try_new(cli_args)?;
    if config.cli_args.show_config_path {
        println!("{}", config.config_path.display());
        return Ok(());
    }

    // every selected provider is built (names and keys checked) before any request
    let source_name = config.provider_name(Direction::Source);
    let source_config = config.provider_config(Direction::Source, &source_name);
    let source = factory.build_source(&source_name, &source_config)?;
    let destination = if config.cli_args.list {
        None
    } else {
        let destination_name = config.provider_name(Direction::Destination);
        let destination_config =
            config.provider_config(Direction::Destination, &destination_name);
        Some((
            factory.build_destination(&destination_name, &destination_config)?,
            destination_name,
        ))
    };

    source.validate_configuration().await?;
    info!("Chosen {} ({}) as source", source_name, source.get_remote_url());

    let Some((destination, destination_name)) = destination else {
        let repos = source.list_accessible_repositories().await?;
        for repo in sort_repositories(repos, source.get_username()) {
            let visibility = if repo.private { "private" } else { "public" };
            println!("{} ({visibility})", repo.full_name());
        }
        return Ok(());
    };

    destination.validate_configuration().await?;
    info!(
        "Chosen {} ({}) as destination",
        destination_name,
        destination.get_remote_url()
    );

    let repos = if !config.cli_args.repos.is_empty() {
        requested_repositories(source.as_ref(), &config.cli_args.repos).await
    } else if config.cli_args.no_interactive {
        source.list_user_repositories().await?
    } else {
        let repos = source.list_accessible_repositories().await?;
        select_repositories(repos, source.get_username())?
    };
    if repos.is_empty() {
        info!("No repositories to migrate");
        return Ok(());
    }
    info!("Migrating {} repositories", repos.len());

    let report = MigrationEngine::new(source.as_ref(), destination.as_ref())
        .migrate_repositories(&repos)
        .await;
    info!("{report}");
    Ok(())
}

/// Look up `name` or `owner/name` entries, bare names belonging to the source user
pub(crate) async fn requested_repositories(
    source: &dyn SourcePlatform,
    entries: &[String],
) -> Vec<Repo> {
    let mut repos = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.trim().trim_end_matches(".git");
        let (owner, name) = entry
            .split_once('/')
            .unwrap_or((source.get_username(), entry));
        match source.get_repository(owner, name).await {
            Some(repo) => repos.push(repo),
            None => warn!("Repository {owner}/{name} not found on {}, skipping", source.get_remote_url()),
        }
    }
    repos
}
