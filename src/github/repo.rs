//! Github Repo struct and conversion to Repo struct
use crate::{errors::GitMoverError, platform::PlatformType, repo::Repo};
use serde::{Deserialize, Serialize};

/// Github account (user or organization)
#[derive(Deserialize, Default, Debug, Clone)]
pub(crate) struct GithubAccount {
    /// Login
    pub login: String,
}

/// Github Repo
#[derive(Deserialize, Default, Debug, Clone)]
pub(crate) struct RepoGithub {
    /// Repository name
    pub name: String,

    /// Repository owner
    pub owner: GithubAccount,

    /// Repository description
    pub description: Option<String>,

    /// Repository private status
    #[serde(default)]
    pub private: bool,

    /// HTTP clone url
    #[serde(default)]
    pub clone_url: String,

    /// SSH clone url
    pub ssh_url: Option<String>,

    /// Repository URL
    pub html_url: Option<String>,

    /// Default branch
    pub default_branch: Option<String>,
}

/// Body of `POST /user/repos`
#[derive(Serialize, Debug, Clone)]
pub(crate) struct GithubRepoCreation {
    /// Repository name
    pub name: String,

    /// Repository description
    pub description: String,

    /// Repository private status
    pub private: bool,

    /// Never initialise, history comes from the push
    pub auto_init: bool,
}

impl TryFrom<RepoGithub> for Repo {
    type Error = GitMoverError;

    fn try_from(repo: RepoGithub) -> Result<Self, Self::Error> {
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
        .checked(PlatformType::Github)
    }
}
