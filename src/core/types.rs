//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoName`] - Validated repository name
//! - [`GenerationMode`] - Monolithic vs. modular output partitioning
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use graphforge::core::types::{GenerationMode, RepoName};
//!
//! let name = RepoName::new("core_model").unwrap();
//! assert_eq!(name.as_str(), "core_model");
//!
//! assert!(RepoName::new("").is_err());
//! assert!(RepoName::new("Has Spaces").is_err());
//!
//! let mode: GenerationMode = "modular".parse().unwrap();
//! assert_eq!(mode, GenerationMode::Modular);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository name: {0}")]
    InvalidRepoName(String),

    #[error("invalid generation mode '{0}', must be 'monolithic' or 'modular'")]
    InvalidMode(String),
}

/// A validated repository name.
///
/// Repository names must:
/// - Be non-empty
/// - Start with a lowercase ASCII letter
/// - Contain only lowercase ASCII letters, digits, and underscores
///
/// Names double as output directory names for modular metadata sub-units,
/// so the rules keep them filesystem-safe on every platform.
///
/// # Example
///
/// ```
/// use graphforge::core::types::RepoName;
///
/// let name = RepoName::new("model_legal").unwrap();
/// assert_eq!(name.as_str(), "model_legal");
///
/// assert!(RepoName::new("9starts_with_digit").is_err());
/// assert!(RepoName::new("has-dash").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoName(String);

impl RepoName {
    /// Create a new validated repository name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepoName` if the name violates the rules above.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidRepoName(
                "repository name cannot be empty".into(),
            ));
        }

        let first = name.chars().next().unwrap_or('\0');
        if !first.is_ascii_lowercase() {
            return Err(TypeError::InvalidRepoName(format!(
                "repository name must start with a lowercase letter: '{}'",
                name
            )));
        }

        if let Some(bad) = name
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '_')
        {
            return Err(TypeError::InvalidRepoName(format!(
                "repository name '{}' contains invalid character '{}'",
                name, bad
            )));
        }

        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RepoName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepoName> for String {
    fn from(value: RepoName) -> Self {
        value.0
    }
}

impl FromStr for RepoName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// How metadata serialization and code generation partition their output.
///
/// The same mode value is threaded through every stage so the stages cannot
/// drift apart: one tagged variant, one dispatcher per stage.
///
/// - `Monolithic`: one pass over the whole graph, one undivided output unit.
/// - `Modular`: one pass per selected repository, output partitioned by
///   repository, iterated in selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Monolithic,
    Modular,
}

impl GenerationMode {
    /// Get the mode as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Monolithic => "monolithic",
            GenerationMode::Modular => "modular",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monolithic" => Ok(GenerationMode::Monolithic),
            "modular" => Ok(GenerationMode::Modular),
            other => Err(TypeError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod repo_name {
        use super::*;

        #[test]
        fn accepts_valid_names() {
            for name in ["core", "platform", "model_legal", "repo2", "a"] {
                assert!(RepoName::new(name).is_ok(), "should accept '{}'", name);
            }
        }

        #[test]
        fn rejects_invalid_names() {
            for name in ["", "Upper", "9digit", "has-dash", "has space", "dotted.name"] {
                assert!(RepoName::new(name).is_err(), "should reject '{}'", name);
            }
        }

        #[test]
        fn ordering_is_lexicographic() {
            let a = RepoName::new("alpha").unwrap();
            let b = RepoName::new("beta").unwrap();
            assert!(a < b);
        }

        #[test]
        fn serde_round_trip() {
            let name = RepoName::new("platform").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"platform\"");
            let back: RepoName = serde_json::from_str(&json).unwrap();
            assert_eq!(back, name);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<RepoName, _> = serde_json::from_str("\"Not Valid\"");
            assert!(result.is_err());
        }
    }

    mod generation_mode {
        use super::*;

        #[test]
        fn parses_both_modes() {
            assert_eq!(
                "monolithic".parse::<GenerationMode>().unwrap(),
                GenerationMode::Monolithic
            );
            assert_eq!(
                "modular".parse::<GenerationMode>().unwrap(),
                GenerationMode::Modular
            );
        }

        #[test]
        fn rejects_unknown_mode() {
            assert!("distributed".parse::<GenerationMode>().is_err());
        }

        #[test]
        fn display_round_trips() {
            for mode in [GenerationMode::Monolithic, GenerationMode::Modular] {
                let parsed: GenerationMode = mode.to_string().parse().unwrap();
                assert_eq!(parsed, mode);
            }
        }
    }
}
