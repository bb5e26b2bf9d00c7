//! Gitea configuration
use super::{platform::GiteaPlatform, CODEBERG_URL};
use crate::{config::ProviderConfig, errors::GitMoverError, platform::Direction};

/// Keys a Gitea instance needs
const REQUIRED_KEYS: [&str; 3] = ["url", "token", "username"];

/// Build a Gitea platform from its configuration
/// # Errors
/// Configuration error if a key is missing
pub(crate) fn get_platform(
    config: &ProviderConfig,
    direction: Direction,
) -> Result<GiteaPlatform, GitMoverError> {
    config.require(&REQUIRED_KEYS, "gitea", direction)?;
    Ok(GiteaPlatform::new(
        &config.value("url"),
        config.value("username"),
        config.value("token"),
    ))
}

/// Build a Codeberg platform, the url defaulting to codeberg.org
/// # Errors
/// Configuration error if a key is missing
pub(crate) fn get_codeberg_platform(
    config: &ProviderConfig,
    direction: Direction,
) -> Result<GiteaPlatform, GitMoverError> {
    config.require(&REQUIRED_KEYS[1..], "codeberg", direction)?;
    let url = config.get("url").unwrap_or(CODEBERG_URL);
    Ok(GiteaPlatform::new(
        url,
        config.value("username"),
        config.value("token"),
    ))
}
