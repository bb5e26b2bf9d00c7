//! Repository record shared by every platform
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::{GitMoverError, GitMoverErrorKind};
use crate::platform::PlatformType;

/// Maximum length of a destination repository name
pub const MAX_REPO_NAME_LEN: usize = 100;

/// Repository information
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Repo {
    /// Name of the repository on the source
    pub name: String,

    /// Login or namespace owning the repository
    pub owner: String,

    /// Description of the repository
    pub description: String,

    /// Whether the repository is private
    pub private: bool,

    /// HTTP clone url as reported by the source
    pub clone_url: String,

    /// SSH clone url
    pub ssh_url: Option<String>,

    /// Web page of the repository
    pub web_url: Option<String>,

    /// Default branch
    pub default_branch: Option<String>,

    /// Name to use on the destination, when different from `name`
    pub rename_target: Option<String>,
}

impl Repo {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Name of the repository on the destination
    pub fn target_name(&self) -> &str {
        self.rename_target.as_deref().unwrap_or(&self.name)
    }

    /// Key used in migration results: `owner/name`, or `owner/name → target` when renamed
    pub fn display_key(&self) -> String {
        match &self.rename_target {
            Some(target) => format!("{} → {}", self.full_name(), target),
            None => self.full_name(),
        }
    }

    /// Reject records parsed without a name or an owner
    /// # Errors
    /// Provider error if `name` or `owner` is empty
    pub(crate) fn checked(self, platform: PlatformType) -> Result<Self, GitMoverError> {
        if self.name.trim().is_empty() || self.owner.trim().is_empty() {
            return Err(GitMoverError::new(GitMoverErrorKind::Provider)
                .with_platform(platform)
                .with_text(&format!(
                    "Repository without name or owner: '{}'",
                    self.full_name()
                )));
        }
        Ok(self)
    }

    /// Return a copy of the repo that will be created as `target` on the destination.
    ///
    /// An invalid name, or one equal to the source name, keeps the original name.
    pub fn renamed(mut self, target: &str) -> Self {
        let target = target.trim();
        if target.is_empty() || target == self.name {
            self.rename_target = None;
        } else if is_valid_repo_name(target) {
            self.rename_target = Some(target.to_string());
        } else {
            warn!(
                "Invalid repository name '{}', keeping '{}'",
                target, self.name
            );
            self.rename_target = None;
        }
        self
    }
}

/// Destination naming rule: `[A-Za-z0-9._-]`, not starting or ending with `.` or `-`,
/// at most [`MAX_REPO_NAME_LEN`] characters.
pub fn is_valid_repo_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_REPO_NAME_LEN {
        return false;
    }
    if name.starts_with(['.', '-']) || name.ends_with(['.', '-']) {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
