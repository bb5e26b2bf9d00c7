//! Gitlab configuration
use super::{platform::GitlabPlatform, GITLAB_URL};
use crate::{config::ProviderConfig, errors::GitMoverError, platform::Direction};

/// Keys GitLab needs, `url` defaults to gitlab.com
const REQUIRED_KEYS: [&str; 2] = ["token", "username"];

/// Get Gitlab platform
/// # Errors
/// Configuration error if a key is missing
pub(crate) fn get_platform(
    config: &ProviderConfig,
    direction: Direction,
) -> Result<GitlabPlatform, GitMoverError> {
    config.require(&REQUIRED_KEYS, "gitlab", direction)?;
    Ok(GitlabPlatform::new(
        config.get("url").unwrap_or(GITLAB_URL),
        config.value("username"),
        config.value("token"),
    ))
}
