//! core::config
//!
//! Project configuration schema and loading.
//!
//! # Overview
//!
//! A project may carry an optional `graphforge.toml` in its working
//! directory supplying defaults for the build command. CLI flags always take
//! precedence over config values.
//!
//! # Example
//!
//! ```toml
//! mode = "modular"
//! classes_dir = "build/classes"
//! target_dir = "target"
//! cache = "target/graph-cache/graph.json"
//! repository_paths = ["repositories"]
//!
//! [generation]
//! metadata = true
//! sources = true
//! test_sources = false
//! single_dir = false
//! compile = true
//! add_external_api = false
//! external_api_package = "org.example.api"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::GenerationMode;

/// Canonical config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "graphforge.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Generation-related defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Write distributed binary metadata (default true).
    pub metadata: Option<bool>,
    /// Mirror generated sources to disk (default true).
    pub sources: Option<bool>,
    /// Mirror into `generated-test-sources` instead of `generated-sources`.
    pub test_sources: Option<bool>,
    /// Metadata shares the classes directory.
    pub single_dir: Option<bool>,
    /// Run the compilation stage (default true).
    pub compile: Option<bool>,
    /// Mark generated groups externally visible.
    pub add_external_api: Option<bool>,
    /// Package for externally visible groups.
    pub external_api_package: Option<String>,
}

/// Project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Default generation mode.
    pub mode: Option<GenerationMode>,
    /// Default classes output directory.
    pub classes_dir: Option<PathBuf>,
    /// Default target output directory.
    pub target_dir: Option<PathBuf>,
    /// Default graph cache file.
    pub cache: Option<PathBuf>,
    /// Directories scanned for repository descriptor files.
    pub repository_paths: Option<Vec<PathBuf>>,
    /// Generation defaults.
    pub generation: Option<GenerationConfig>,
}

impl BuildConfig {
    /// Load the config for a working directory.
    ///
    /// A missing file is not an error; it yields the default (empty) config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unreadable or unparsable files and for
    /// invalid values.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let path = cwd.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        let config: BuildConfig =
            toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(generation) = &self.generation {
            if let Some(package) = &generation.external_api_package {
                if package.is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "external_api_package cannot be empty".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Generation defaults, or the empty defaults when the section is absent.
    pub fn generation(&self) -> GenerationConfig {
        self.generation.clone().unwrap_or_default()
    }
}
