use crate::git::TagPolicy;
use crate::segments::{Category, Formats};
use crate::status::{DetachedHeadStyle, Options};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Contents of `~/.config/gitstatus/config.toml`
///
/// Every key is optional; a missing file behaves like an empty one.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fast_mode: bool,
    pub tag_policy: TagPolicy,
    pub detached_head_style: DetachedHeadStyle,
    pub untracked_counts_as_dirty: bool,
    pub trusted_paths: Vec<PathBuf>,
    pub skip_status: bool,
    pub git_binary: String,
    /// Display templates keyed by category name, `{}` marks the value
    pub formats: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fast_mode: true,
            tag_policy: TagPolicy::None,
            detached_head_style: DetachedHeadStyle::Revision,
            untracked_counts_as_dirty: true,
            trusted_paths: Vec::new(),
            skip_status: false,
            git_binary: "git".to_string(),
            formats: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("gitstatus"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// Falls back to defaults when `HOME` is unset or the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            Ok(_) | Err(ConfigError::DirectoryNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Load configuration from a specific file, which must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration text
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.git_binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "git_binary must not be empty".to_string(),
            ));
        }

        if let Some(key) = self
            .formats
            .keys()
            .find(|key| Category::from_key(key).is_none())
        {
            return Err(ConfigError::InvalidValue(format!(
                "Unknown format key: {}. Valid keys are branch, tag, behind, ahead, staged, unmerged, changed, untracked and stashed",
                key
            )));
        }

        Ok(())
    }

    /// Display templates as a category lookup table
    pub fn formats(&self) -> Formats {
        let mut formats = Formats::new();
        for (key, template) in &self.formats {
            if let Some(category) = Category::from_key(key) {
                formats.set(category, template.clone());
            }
        }
        formats
    }

    /// Options for a prompt render
    pub fn options(&self) -> Options {
        Options {
            fast_mode: self.fast_mode,
            tag_policy: self.tag_policy,
            formats: self.formats(),
            detached_head_style: self.detached_head_style,
            untracked_counts_as_dirty: self.untracked_counts_as_dirty,
            trusted_paths: self.trusted_paths.clone(),
            skip_status: self.skip_status,
        }
    }
}
