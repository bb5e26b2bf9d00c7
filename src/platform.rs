//! Source and destination platform traits
use std::{fmt, future::Future, pin::Pin};

use crate::{errors::GitMoverError, repo::Repo};

/// Boxed future returned by platform methods
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GitMoverError>> + Send + 'a>>;

/// Boxed future for lookups that never fail (failures become absence)
pub type LookupFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A platform repositories are read from
pub trait SourcePlatform: Sync + Send {
    /// Check the credentials with one authenticated request
    fn validate_configuration(&self) -> PlatformFuture<'_, ()>;

    /// Every repository visible to the authenticated user, organizations included
    fn list_accessible_repositories(&self) -> PlatformFuture<'_, Vec<Repo>>;

    /// Repositories owned by the configured user
    fn list_user_repositories(&self) -> PlatformFuture<'_, Vec<Repo>> {
        Box::pin(async move {
            let repos = self.list_accessible_repositories().await?;
            Ok(repos
                .into_iter()
                .filter(|repo| repo.owner == self.get_username())
                .collect())
        })
    }

    /// Look up one repository, `None` if it can't be fetched
    fn get_repository(&self, owner: &str, name: &str) -> LookupFuture<'_, Option<Repo>>;

    /// Clone url with the credentials embedded
    /// # Errors
    /// Error if the configured url can't carry credentials
    fn build_authenticated_clone_url(&self, repo: &Repo) -> Result<String, GitMoverError>;

    /// Configured username
    fn get_username(&self) -> &str;

    /// Host of the platform, for display
    fn get_remote_url(&self) -> &str;
}

/// A platform repositories are pushed to
pub trait DestinationPlatform: Sync + Send {
    /// Check the credentials with one authenticated request
    fn validate_configuration(&self) -> PlatformFuture<'_, ()>;

    /// Create `target_name` from `source`, succeeding if it already exists
    fn create_repository(&self, source: &Repo, target_name: &str) -> PlatformFuture<'_, bool>;

    /// Whether `name` exists under the configured user, `false` on any error
    fn repository_exists(&self, name: &str) -> LookupFuture<'_, bool>;

    /// Push url with the credentials embedded
    /// # Errors
    /// Error if the configured url can't carry credentials
    fn build_authenticated_push_url(&self, name: &str) -> Result<String, GitMoverError>;

    /// Configured username
    fn get_username(&self) -> &str;

    /// Host of the platform, for display
    fn get_remote_url(&self) -> &str;
}

/// Built-in platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformType {
    /// Gitea (and Codeberg)
    Gitea,
    /// GitHub
    Github,
    /// GitLab
    Gitlab,
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformType::Gitea => write!(f, "gitea"),
            PlatformType::Github => write!(f, "github"),
            PlatformType::Gitlab => write!(f, "gitlab"),
        }
    }
}

/// Role of a platform in a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Source platform
    Source,
    /// Destination platform
    Destination,
}

impl Direction {
    /// Infix used in environment variables (`GITEA_SOURCE_TOKEN`, `GITEA_DEST_TOKEN`)
    pub(crate) fn env_infix(&self) -> &'static str {
        match self {
            Direction::Source => "SOURCE",
            Direction::Destination => "DEST",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Source => write!(f, "source"),
            Direction::Destination => write!(f, "destination"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(PlatformType::Github.to_string(), "github");
        assert_eq!(Direction::Destination.to_string(), "destination");
        assert_eq!(Direction::Destination.env_infix(), "DEST");
    }
}
