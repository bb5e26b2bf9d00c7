//! Gitlab Repo module
use crate::{errors::GitMoverError, platform::PlatformType, repo::Repo};
use serde::{Deserialize, Serialize};

/// Namespace of a project
#[derive(Deserialize, Default, Debug, Clone)]
pub(crate) struct GitlabNamespace {
    /// Last path segment
    pub path: String,

    /// Full path, `group/subgroup` for nested groups
    pub full_path: String,

    /// `user` or `group`
    pub kind: String,
}

/// Gitlab Repo
#[derive(Deserialize, Default, Debug, Clone)]
pub(crate) struct GitlabRepo {
    /// Repo path, used as the name
    pub path: String,

    /// Repo description
    pub description: Option<String>,

    /// Repo visibility, only `public` is migrated as public
    pub visibility: Option<String>,

    /// Namespace
    pub namespace: GitlabNamespace,

    /// HTTP clone url
    #[serde(default)]
    pub http_url_to_repo: String,

    /// SSH clone url
    pub ssh_url_to_repo: Option<String>,

    /// Web page
    pub web_url: Option<String>,

    /// Default branch
    pub default_branch: Option<String>,
}

/// Body of `POST /projects`
#[derive(Serialize, Debug, Clone)]
pub(crate) struct GitlabRepoCreation {
    /// Repo name
    pub name: String,

    /// Repo path
    pub path: String,

    /// Repo description
    pub description: String,

    /// Repo visibility
    pub visibility: String,

    /// Never initialise, history comes from the push
    pub initialize_with_readme: bool,
}

impl TryFrom<GitlabRepo> for Repo {
    type Error = GitMoverError;

    fn try_from(repo: GitlabRepo) -> Result<Self, Self::Error> {
        let owner = if repo.namespace.kind == "user" {
            repo.namespace.path
        } else {
            repo.namespace.full_path
        };
        Repo {
            name: repo.path,
            owner,
            description: repo.description.unwrap_or_default(),
            private: repo.visibility.as_deref() != Some("public"),
            clone_url: repo.http_url_to_repo,
            ssh_url: repo.ssh_url_to_repo,
            web_url: repo.web_url,
            default_branch: repo.default_branch,
            rename_target: None,
        }
        .checked(PlatformType::Gitlab)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn project(visibility: Option<&str>) -> GitlabRepo {
        GitlabRepo {
            path: "cli".to_string(),
            visibility: visibility.map(str::to_string),
            namespace: GitlabNamespace {
                path: "alice".to_string(),
                full_path: "alice".to_string(),
                kind: "user".to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn only_public_projects_stay_public() {
        let private = |visibility| Repo::try_from(project(visibility)).unwrap().private;
        assert!(!private(Some("public")));
        assert!(private(Some("internal")));
        assert!(private(Some("private")));
        assert!(private(None));
    }
}
