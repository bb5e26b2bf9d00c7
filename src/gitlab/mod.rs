//! GitLab API module.
pub(crate) mod config;
pub(crate) mod platform;
pub(crate) mod repo;

/// Default GitLab instance
const GITLAB_URL: &str = "https://gitlab.com";

/// Page size used when listing projects
const GITLAB_PER_PAGE: usize = 100;

/// Prefix of personal access tokens, sent as `PRIVATE-TOKEN`
const PERSONAL_TOKEN_PREFIX: &str = "glpat-";
