//! Gitea Repo structs and conversion to Repo struct
use serde::{Deserialize, Serialize};

use crate::{errors::GitMoverError, platform::PlatformType, repo::Repo};

/// Owner of a Gitea repository
#[derive(Deserialize, Default, Debug, Clone)]
pub(crate) struct GiteaOwner {
    /// Login of the user or organization
    pub login: String,
}

/// Gitea Repo
#[derive(Deserialize, Default, Debug, Clone)]
pub(crate) struct GiteaRepo {
    /// Repository name
    pub name: String,

    /// Repository owner
    pub owner: GiteaOwner,

    /// Repository description
    #[serde(default)]
    pub description: Option<String>,

    /// Repository private status
    #[serde(default)]
    pub private: bool,

    /// HTTP clone url
    #[serde(default)]
    pub clone_url: String,

    /// SSH clone url
    pub ssh_url: Option<String>,

    /// Web page
    pub html_url: Option<String>,

    /// Default branch
    pub default_branch: Option<String>,
}

/// Body of the repository creation request
#[derive(Serialize, Debug, Clone)]
pub(crate) struct GiteaRepoCreation {
    /// Repository name
    pub name: String,

    /// Repository description
    pub description: String,

    /// Repository private status
    pub private: bool,

    /// Never initialise, history comes from the push
    pub auto_init: bool,
}

impl TryFrom<GiteaRepo> for Repo {
    type Error = GitMoverError;

    fn try_from(repo: GiteaRepo) -> Result<Self, Self::Error> {
        Repo {
            name: repo.name,
            owner: repo.owner.login,
            description: repo.description.unwrap_or_default(),
            private: repo.private,
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
            web_url: repo.html_url,
            default_branch: repo.default_branch,
            rename_target: None,
        }
        .checked(PlatformType::Gitea)
    }
}
