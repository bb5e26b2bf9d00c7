//! Registry of platform constructors, by role
use std::collections::BTreeMap;

use log::debug;

use crate::{
    config::ProviderConfig,
    errors::{GitMoverError, GitMoverErrorKind},
    gitea, github, gitlab,
    platform::{DestinationPlatform, Direction, SourcePlatform},
};

/// Constructor of a source platform
pub type SourceConstructor = Box<
    dyn Fn(&ProviderConfig, Direction) -> Result<Box<dyn SourcePlatform>, GitMoverError>
        + Send
        + Sync,
>;

/// Constructor of a destination platform
pub type DestinationConstructor = Box<
    dyn Fn(&ProviderConfig, Direction) -> Result<Box<dyn DestinationPlatform>, GitMoverError>
        + Send
        + Sync,
>;

/// Name-keyed platform constructors
pub struct PlatformFactory {
    /// Source constructors
    sources: BTreeMap<String, SourceConstructor>,

    /// Destination constructors
    destinations: BTreeMap<String, DestinationConstructor>,
}

impl Default for PlatformFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformFactory {
    /// Factory knowing gitea, codeberg, github and gitlab
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register_source("gitea", |config, direction| {
            Ok(Box::new(gitea::config::get_platform(config, direction)?))
        });
        factory.register_source("codeberg", |config, direction| {
            Ok(Box::new(gitea::config::get_codeberg_platform(config, direction)?))
        });
        factory.register_source("github", |config, direction| {
            Ok(Box::new(github::config::get_platform(config, direction)?))
        });
        factory.register_source("gitlab", |config, direction| {
            Ok(Box::new(gitlab::config::get_platform(config, direction)?))
        });
        factory.register_destination("gitea", |config, direction| {
            Ok(Box::new(gitea::config::get_platform(config, direction)?))
        });
        factory.register_destination("codeberg", |config, direction| {
            Ok(Box::new(gitea::config::get_codeberg_platform(config, direction)?))
        });
        factory.register_destination("github", |config, direction| {
            Ok(Box::new(github::config::get_platform(config, direction)?))
        });
        factory.register_destination("gitlab", |config, direction| {
            Ok(Box::new(gitlab::config::get_platform(config, direction)?))
        });
        factory
    }

    /// Factory without any platform
    pub fn empty() -> Self {
        Self {
            sources: BTreeMap::new(),
            destinations: BTreeMap::new(),
        }
    }

    /// Register (or replace) a source constructor
    pub fn register_source<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&ProviderConfig, Direction) -> Result<Box<dyn SourcePlatform>, GitMoverError>
            + Send
            + Sync
            + 'static,
    {
        self.sources
            .insert(name.to_lowercase(), Box::new(constructor));
    }

    /// Register (or replace) a destination constructor
    pub fn register_destination<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&ProviderConfig, Direction) -> Result<Box<dyn DestinationPlatform>, GitMoverError>
            + Send
            + Sync
            + 'static,
    {
        self.destinations
            .insert(name.to_lowercase(), Box::new(constructor));
    }

    /// Registered source names, sorted
    pub fn source_names(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    /// Registered destination names, sorted
    pub fn destination_names(&self) -> Vec<String> {
        self.destinations.keys().cloned().collect()
    }

    /// Build a source platform without any network use
    /// # Errors
    /// Configuration error if the name is unknown or a key is missing
    pub fn build_source(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn SourcePlatform>, GitMoverError> {
        let name = name.trim().to_lowercase();
        let constructor = self
            .sources
            .get(&name)
            .ok_or_else(|| unknown_platform(&name, Direction::Source, &self.source_names()))?;
        constructor(config, Direction::Source)
    }

    /// Build a destination platform without any network use
    /// # Errors
    /// Configuration error if the name is unknown or a key is missing
    pub fn build_destination(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn DestinationPlatform>, GitMoverError> {
        let name = name.trim().to_lowercase();
        let constructor = self.destinations.get(&name).ok_or_else(|| {
            unknown_platform(&name, Direction::Destination, &self.destination_names())
        })?;
        constructor(config, Direction::Destination)
    }

    /// Build and validate a source platform
    /// # Errors
    /// Configuration error if the name is unknown, a key is missing or the credentials are refused
    pub async fn create_source(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn SourcePlatform>, GitMoverError> {
        let platform = self.build_source(name, config)?;
        debug!("Validating {} as source", platform.get_remote_url());
        platform.validate_configuration().await?;
        Ok(platform)
    }

    /// Build and validate a destination platform
    /// # Errors
    /// Configuration error if the name is unknown, a key is missing or the credentials are refused
    pub async fn create_destination(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn DestinationPlatform>, GitMoverError> {
        let platform = self.build_destination(name, config)?;
        debug!("Validating {} as destination", platform.get_remote_url());
        platform.validate_configuration().await?;
        Ok(platform)
    }
}

/// Error for a name nobody registered
fn unknown_platform(name: &str, direction: Direction, known: &[String]) -> GitMoverError {
    GitMoverError::new(GitMoverErrorKind::Configuration).with_text(&format!(
        "Unknown {direction} platform '{name}', available: {}",
        known.join(", ")
    ))
}
