//! Gitea API module (Codeberg included).
pub(crate) mod config;
pub(crate) mod platform;
pub(crate) mod repo;

/// Codeberg instance, a Gitea preset
const CODEBERG_URL: &str = "https://codeberg.org";

/// Page size used when listing repositories
const GITEA_PAGE_LIMIT: usize = 50;
