//! Configuration for the edit-tolerant trie
//!
//! The [`Config`] trait provides validation, environment initialization,
//! presets and JSON persistence for configuration types. [`TrieConfig`] is
//! the configuration consumed by [`EditTrie`](crate::fsa::EditTrie).
//!
//! # Preset Configurations
//!
//! ```rust
//! use edit_trie::config::{Config, TrieConfig};
//!
//! // Large build tables, long completion lists
//! let config = TrieConfig::performance_preset();
//! assert!(config.validate().is_ok());
//!
//! // Small build tables and zone blocks
//! let config = TrieConfig::memory_preset();
//! assert!(config.build_capacity < TrieConfig::default().build_capacity);
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use edit_trie::config::{Config, TrieConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads EDIT_TRIE_TOP_L, EDIT_TRIE_BUILD_CAPACITY, ...
//! let config = TrieConfig::from_env()?;
//!
//! // Reads MYAPP_TOP_L, ...
//! let config = TrieConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::{EditTrieError, Result};
use std::env;
use std::fmt;
use std::path::Path;

pub mod trie;

#[cfg(test)]
mod tests;

pub use trie::TrieConfig;

/// Default prefix for environment variables
pub const ENV_PREFIX: &str = "EDIT_TRIE_";

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// [`ENV_PREFIX`] prefix, e.g. `EDIT_TRIE_TOP_L=5`.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    ///
    /// Unset variables keep their default values.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset tuned for throughput at the cost of memory.
    fn performance_preset() -> Self;

    /// Preset tuned for a small footprint.
    fn memory_preset() -> Self;

    /// Preset tuned for short, predictable per-keystroke latency.
    fn realtime_preset() -> Self;

    /// General-purpose preset.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for EditTrieError {
    fn from(err: ValidationError) -> Self {
        EditTrieError::configuration(err.to_string())
    }
}

/// Parse an environment variable, falling back to `default`.
///
/// A variable that is set but does not parse is logged and ignored.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    match env::var(var_name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable value {:?} for {}", raw, var_name);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.trim().to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
