//! Error handling for the git-migrate crate.
use std::{error::Error as StdError, fmt};

use crate::platform::PlatformType;

/// Error type for the git-migrate crate.
#[derive(Debug)]
pub struct GitMoverError {
    /// Inner error.
    inner: Box<Inner>,
}

impl GitMoverError {
    /// Create a new error.
    pub fn new(kind: GitMoverErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                platform: None,
            }),
        }
    }

    /// Create a new error with a source error.
    pub(crate) fn new_with_source<E>(text: &str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source: BoxError = source.into();
        Self::new(GitMoverErrorKind::Platform).with_text(&format!("{text}: {source}"))
    }

    /// Attach a text source to the error.
    pub fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Attach the platform the error comes from.
    pub fn with_platform(mut self, platform: PlatformType) -> Self {
        self.inner.platform = Some(platform);
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> &GitMoverErrorKind {
        &self.inner.kind
    }

    /// True when the error is a configuration error (missing keys, unknown provider, failed auth probe).
    pub fn is_configuration(&self) -> bool {
        matches!(self.inner.kind, GitMoverErrorKind::Configuration)
    }

    /// True when the user cancelled an interactive prompt.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.inner.kind, GitMoverErrorKind::Cancelled)
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the git-migrate crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: GitMoverErrorKind,

    /// Platform error
    platform: Option<PlatformType>,

    /// Source error.
    source: Option<BoxError>,
}

/// Kind of [`GitMoverError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitMoverErrorKind {
    /// Generic error (local files, user input).
    Platform,

    /// Missing or invalid credentials, unknown provider name.
    Configuration,

    /// A vendor API call failed.
    Provider,

    /// A git subprocess failed.
    Transfer,

    /// The user cancelled an interactive prompt.
    Cancelled,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Error related to the toml config file.
    Toml,

    /// Error related to url parsing.
    Url,

    /// Local I/O error.
    Io,
}

impl fmt::Display for GitMoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(platform) = &self.inner.platform {
            write!(f, " ({platform})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for GitMoverError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl GitMoverError {
    /// Wrap a library error with the given kind.
    fn wrap<E>(kind: GitMoverErrorKind, e: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(Box::new(e)),
                platform: None,
            }),
        }
    }
}

impl From<reqwest::Error> for GitMoverError {
    fn from(e: reqwest::Error) -> Self {
        Self::wrap(GitMoverErrorKind::Reqwest, e)
    }
}

impl From<serde_json::Error> for GitMoverError {
    fn from(e: serde_json::Error) -> Self {
        Self::wrap(GitMoverErrorKind::Serde, e)
    }
}

impl From<toml::de::Error> for GitMoverError {
    fn from(e: toml::de::Error) -> Self {
        Self::wrap(GitMoverErrorKind::Toml, e)
    }
}

impl From<url::ParseError> for GitMoverError {
    fn from(e: url::ParseError) -> Self {
        Self::wrap(GitMoverErrorKind::Url, e)
    }
}

impl From<std::io::Error> for GitMoverError {
    fn from(e: std::io::Error) -> Self {
        Self::wrap(GitMoverErrorKind::Io, e)
    }
}

impl From<&str> for GitMoverError {
    fn from(text: &str) -> Self {
        Self::new(GitMoverErrorKind::Platform).with_text(text)
    }
}

impl From<String> for GitMoverError {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_contains_kind_platform_and_text() {
        let err = GitMoverError::new(GitMoverErrorKind::Provider)
            .with_platform(PlatformType::Gitlab)
            .with_text("401 Unauthorized");
        assert_eq!(err.to_string(), "Provider (gitlab): 401 Unauthorized");
        assert!(err.source().is_some());
        assert!(!err.is_configuration());
    }

    #[test]
    fn string_conversion_is_generic() {
        let err: GitMoverError = "boom".into();
        assert_eq!(err.kind(), &GitMoverErrorKind::Platform);
        assert_eq!(err.to_string(), "Platform: boom");
    }

    #[test]
    fn configuration_and_cancelled_predicates() {
        assert!(GitMoverError::new(GitMoverErrorKind::Configuration).is_configuration());
        assert!(GitMoverError::new(GitMoverErrorKind::Cancelled).is_cancelled());
    }
}
