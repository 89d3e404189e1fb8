//! Configuration module for trawl
//!
//! Manages named catalog roots so repeated invocations don't need
//! `--root` every time. Configuration is stored in the user's config
//! directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TrawlConfig {
    /// Map of root names to the directories they serve
    #[serde(default)]
    pub roots: HashMap<String, PathBuf>,

    /// The root to use when none is specified
    #[serde(default)]
    pub default_root: Option<String>,

    /// Print per-entry progress by default
    #[serde(default)]
    pub verbose: bool,
}

impl TrawlConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("trawl").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Add a named root to the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if saving the configuration fails.
    pub fn add_root(&mut self, name: String, path: PathBuf) -> Result<(), ConfigError> {
        self.roots.insert(name, path);
        self.save()
    }

    /// Remove a named root from the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if saving the configuration fails.
    pub fn remove_root(&mut self, name: &str) -> Result<Option<PathBuf>, ConfigError> {
        let removed = self.roots.remove(name);
        self.save()?;
        Ok(removed)
    }

    /// Get a root path by name
    #[must_use]
    pub fn get_root(&self, name: &str) -> Option<&PathBuf> {
        self.roots.get(name)
    }

    /// Resolve the root directory to serve: an explicit name if given,
    /// otherwise the configured default.
    #[must_use]
    pub fn resolve_root(&self, name: Option<&str>) -> Option<&PathBuf> {
        match name {
            Some(name) => self.roots.get(name),
            None => self
                .default_root
                .as_deref()
                .and_then(|name| self.roots.get(name)),
        }
    }

    /// Set the default root
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the root name doesn't exist in the
    /// configuration or if saving fails.
    pub fn set_default_root(&mut self, name: String) -> Result<(), ConfigError> {
        if !self.roots.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Root '{name}' does not exist in configuration"
            )));
        }
        self.default_root = Some(name);
        self.save()
    }
}
