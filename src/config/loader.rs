use crate::config::schema::{RuleSetConfig, ValidationError};
use crate::rules::{Pipeline, RuleError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a rule-set file. Variants carry the file path when the
/// input came from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read rule config from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse rule config TOML{}: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid rule config{}: {source}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },

    #[error("invalid rule{}: {source}", origin(.path))]
    Rule {
        path: Option<PathBuf>,
        #[source]
        source: RuleError,
    },
}

impl ConfigError {
    /// Rule file the error came from, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. } => Some(path),
            ConfigError::Toml { path, .. }
            | ConfigError::Validation { path, .. }
            | ConfigError::Rule { path, .. } => path.as_deref(),
        }
    }
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

/// Deserialize and validate a rule set held in memory.
pub fn load_from_str(input: &str) -> Result<RuleSetConfig, ConfigError> {
    parse_rule_set(input, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<RuleSetConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rule_set(&contents, Some(path))
}

/// Load a rule-set file and build its pipeline.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Pipeline, ConfigError> {
    let path = path.as_ref();
    load_from_path(path)?
        .pipeline()
        .map_err(|source| ConfigError::Rule {
            path: Some(path.to_path_buf()),
            source,
        })
}

fn parse_rule_set(input: &str, origin: Option<&Path>) -> Result<RuleSetConfig, ConfigError> {
    let path = || origin.map(Path::to_path_buf);
    let config: RuleSetConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: path(), source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: path(), source })?;
    Ok(config)
}
