//! Explorer configuration.
//!
//! # Responsibility
//! - Describe tunable tree-store behavior in one deserializable value.
//! - Reject configurations the store cannot honor before any tree exists.
//!
//! # Invariants
//! - Missing fields fall back to `ExplorerConfig::default()`.
//! - A validated config always yields a usable root name.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default root directory name.
pub const DEFAULT_ROOT_NAME: &str = "root";
/// Default per-name character limit.
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

/// How the store treats two siblings with the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Both siblings coexist; name lookups return the first pre-order match.
    #[default]
    Allow,
    /// Creating a sibling with an existing name fails.
    Reject,
}

/// Tree store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Name given to the root directory.
    pub root_name: String,
    /// Sibling name collision behavior.
    pub duplicate_names: DuplicateNamePolicy,
    /// Maximum name length in characters.
    pub max_name_len: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            duplicate_names: DuplicateNamePolicy::default(),
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Root name is blank after trim.
    BlankRootName,
    /// Name length limit is zero.
    ZeroNameLimit,
    /// Root name exceeds the configured limit.
    RootNameTooLong { len: usize, max: usize },
    /// Existing repository root carries a different name.
    RootNameMismatch { configured: String, actual: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankRootName => write!(f, "root_name must not be blank"),
            Self::ZeroNameLimit => write!(f, "max_name_len must be greater than zero"),
            Self::RootNameTooLong { len, max } => {
                write!(f, "root_name has {len} characters; limit is {max}")
            }
            Self::RootNameMismatch { configured, actual } => write!(
                f,
                "root_name is `{configured}` but the repository root is `{actual}`"
            ),
        }
    }
}

impl Error for ConfigError {}

impl ExplorerConfig {
    /// Checks field consistency.
    ///
    /// # Errors
    /// - `BlankRootName` when `root_name` is blank.
    /// - `ZeroNameLimit` when `max_name_len == 0`.
    /// - `RootNameTooLong` when the trimmed root name exceeds `max_name_len`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_len == 0 {
            return Err(ConfigError::ZeroNameLimit);
        }
        let root_name = self.root_name.trim();
        if root_name.is_empty() {
            return Err(ConfigError::BlankRootName);
        }
        let len = root_name.chars().count();
        if len > self.max_name_len {
            return Err(ConfigError::RootNameTooLong {
                len,
                max: self.max_name_len,
            });
        }
        Ok(())
    }
}
