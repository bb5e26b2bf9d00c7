//! Github configuration
use super::platform::GithubPlatform;
use crate::{config::ProviderConfig, errors::GitMoverError, platform::Direction};

/// Keys GitHub needs, `url` (API base) is optional
const REQUIRED_KEYS: [&str; 2] = ["token", "username"];

/// Get the github platform
/// # Errors
/// Configuration error if a key is missing
pub(crate) fn get_platform(
    config: &ProviderConfig,
    direction: Direction,
) -> Result<GithubPlatform, GitMoverError> {
    config.require(&REQUIRED_KEYS, "github", direction)?;
    Ok(GithubPlatform::new(
        config.get("url"),
        config.value("username"),
        config.value("token"),
    ))
}
