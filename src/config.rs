//! Configuration handling
use std::{
    collections::BTreeMap,
    fs::{read_to_string, File},
    io::Write,
    path::{Path, PathBuf},
};

use home::home_dir;
use serde::{Deserialize, Serialize};

use crate::{
    cli::GitMoverCli,
    errors::{GitMoverError, GitMoverErrorKind},
    platform::Direction,
};

/// Default source provider
pub const DEFAULT_SOURCE: &str = "gitea";

/// Default destination provider
pub const DEFAULT_DESTINATION: &str = "github";

/// Credentials of one provider for one role
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base url of the instance
    pub url: Option<String>,

    /// Access token
    pub token: Option<String>,

    /// Username owning the migrated repositories
    pub username: Option<String>,
}

impl ProviderConfig {
    /// Value of a key, `None` if absent or empty
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "url" => self.url.as_deref(),
            "token" => self.token.as_deref(),
            "username" => self.username.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Check that every key of `required` is set
    /// # Errors
    /// Configuration error listing the missing keys
    pub fn require(
        &self,
        required: &[&str],
        provider: &str,
        direction: Direction,
    ) -> Result<(), GitMoverError> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| self.get(key).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(GitMoverError::new(GitMoverErrorKind::Configuration).with_text(&format!(
            "Missing {provider} {direction} configuration: {}",
            missing.join(", ")
        )))
    }

    /// Required value, after [`ProviderConfig::require`] has been checked
    pub(crate) fn value(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

/// Configuration of one role (source or destination)
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct RoleConfig {
    /// Selected provider name
    pub provider: Option<String>,

    /// Credentials by provider name
    #[serde(flatten)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// Content of the configuration file
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub struct ConfigData {
    /// Source configuration
    pub source: Option<RoleConfig>,

    /// Destination configuration
    pub destination: Option<RoleConfig>,
}

impl ConfigData {
    /// Role section of the file
    fn role(&self, direction: Direction) -> Option<&RoleConfig> {
        match direction {
            Direction::Source => self.source.as_ref(),
            Direction::Destination => self.destination.as_ref(),
        }
    }
}

/// Configuration data
#[derive(Default, Clone, Debug)]
pub struct GitMoverConfig {
    /// path to the configuration file
    pub config_path: PathBuf,

    /// actual configuration data
    pub config_data: ConfigData,

    /// CLI arguments
    pub cli_args: GitMoverCli,
}

impl GitMoverConfig {
    /// Load the configuration file (if any) and the `.env` file of the working directory
    /// # Errors
    /// Error if an explicit config file can't be read, or if the file is invalid
    pub fn try_new(cli_args: GitMoverCli) -> Result<Self, GitMoverError> {
        let _ = dotenv::dotenv();
        let (config_path, explicit) = match cli_args.config.clone() {
            Some(p) => (PathBuf::from(p), true),
            None => (Self::get_config_path()?, false),
        };
        let config_data = if config_path.exists() || explicit {
            let contents = read_to_string(&config_path)
                .map_err(|e| GitMoverError::new_with_source("Unable to open", e))?;
            toml::from_str(&contents)?
        } else {
            ConfigData::default()
        };
        Ok(GitMoverConfig {
            config_path,
            config_data,
            cli_args,
        })
    }

    /// Get the path to the config file
    /// # Errors
    /// Error if the home directory can't be found
    pub fn get_config_path() -> Result<PathBuf, GitMoverError> {
        let home_dir = match home_dir() {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Err("Unable to get your home dir! home::home_dir() isn't working".into()),
        };
        Ok(home_dir
            .join(".config")
            .join(".git-migrate")
            .join("config.toml"))
    }

    /// Provider selected for a role: CLI, then environment, then file, then default
    pub fn provider_name(&self, direction: Direction) -> String {
        self.provider_name_with(direction, |key| std::env::var(key).ok())
    }

    /// [`GitMoverConfig::provider_name`] with a custom environment lookup
    pub(crate) fn provider_name_with(
        &self,
        direction: Direction,
        env: impl Fn(&str) -> Option<String>,
    ) -> String {
        let (from_cli, env_key, default) = match direction {
            Direction::Source => (&self.cli_args.source, "SOURCE_PROVIDER", DEFAULT_SOURCE),
            Direction::Destination => (
                &self.cli_args.destination,
                "DESTINATION_PROVIDER",
                DEFAULT_DESTINATION,
            ),
        };
        from_cli
            .clone()
            .or_else(|| env(env_key).filter(|v| !v.trim().is_empty()))
            .or_else(|| {
                self.config_data
                    .role(direction)
                    .and_then(|role| role.provider.clone())
            })
            .unwrap_or_else(|| default.to_string())
            .trim()
            .to_lowercase()
    }

    /// Credentials of `provider` for a role, environment overriding the file
    pub fn provider_config(&self, direction: Direction, provider: &str) -> ProviderConfig {
        self.provider_config_with(direction, provider, |key| std::env::var(key).ok())
    }

    /// [`GitMoverConfig::provider_config`] with a custom environment lookup
    pub(crate) fn provider_config_with(
        &self,
        direction: Direction,
        provider: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> ProviderConfig {
        let file = self
            .config_data
            .role(direction)
            .and_then(|role| role.providers.get(provider))
            .cloned()
            .unwrap_or_default();
        let prefix = provider.to_uppercase().replace('-', "_");
        let lookup = |key: &str| -> Option<String> {
            let upper = key.to_uppercase();
            env(&format!("{prefix}_{}_{upper}", direction.env_infix()))
                .or_else(|| env(&format!("{prefix}_{upper}")))
                .filter(|v| !v.trim().is_empty())
        };
        ProviderConfig {
            url: lookup("url").or(file.url),
            token: lookup("token").or(file.token),
            username: lookup("username").or(file.username),
        }
    }
}

/// Template written by `--setup`
pub const ENV_TEMPLATE: &str = "# Source provider (gitea, codeberg, github, gitlab)
SOURCE_PROVIDER=gitea
GITEA_SOURCE_URL=https://gitea.example.com
GITEA_SOURCE_TOKEN=your_gitea_personal_access_token
GITEA_SOURCE_USERNAME=your_gitea_username

# GITLAB_SOURCE_URL=https://gitlab.com
# GITLAB_SOURCE_TOKEN=your_gitlab_token
# GITLAB_SOURCE_USERNAME=your_gitlab_username

# Destination provider (gitea, codeberg, github, gitlab)
DESTINATION_PROVIDER=github
GITHUB_TOKEN=your_github_personal_access_token
GITHUB_USERNAME=your_github_username

# GITLAB_DEST_URL=https://gitlab.com
# GITLAB_DEST_TOKEN=your_gitlab_dest_token
# GITLAB_DEST_USERNAME=your_gitlab_dest_username
";

/// Write the `.env` template at `path` unless a file is already there
/// # Errors
/// Error if the file can't be written
pub fn write_env_template(path: &Path) -> Result<bool, GitMoverError> {
    if path.exists() {
        return Ok(false);
    }
    let mut file = File::create(path)
        .map_err(|e| GitMoverError::new_with_source("Unable to create .env file", e))?;
    file.write_all(ENV_TEMPLATE.as_bytes())
        .map_err(|e| GitMoverError::new_with_source("Unable to write .env file", e))?;
    Ok(true)
}
