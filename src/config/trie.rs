//! Configuration for the edit-tolerant trie

use super::{parse_env_bool, parse_env_var, Config, ValidationError};
use crate::distance::MAX_LEN;
use crate::error::{EditTrieError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Build and lookup settings for [`EditTrie`](crate::fsa::EditTrie)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieConfig {
    /// Descendant-list cap per node, also the default completion count
    pub top_l: usize,
    /// Suggested capacity of the build-time transition table
    pub build_capacity: usize,
    /// Block size, in code units, of the zone holding chain fragments
    pub zone_block_size: usize,
    /// Trim and lowercase entities and queries
    pub normalize: bool,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            top_l: 10,
            build_capacity: 1_000_000,
            zone_block_size: 256 * 1024,
            normalize: false,
        }
    }
}

impl Config for TrieConfig {
    fn validate(&self) -> Result<()> {
        if self.top_l == 0 {
            return Err(ValidationError::new("top_l", "0", "must be at least 1")
                .with_suggestion("10")
                .into());
        }
        if self.build_capacity == 0 {
            return Err(
                ValidationError::new("build_capacity", "0", "must be at least 1")
                    .with_suggestion("1000000")
                    .into(),
            );
        }
        if self.zone_block_size < MAX_LEN {
            return Err(ValidationError::new(
                "zone_block_size",
                &self.zone_block_size.to_string(),
                "must hold at least one maximum-length string",
            )
            .with_suggestion(&format!(">= {}", MAX_LEN))
            .into());
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.top_l = parse_env_var(&format!("{}TOP_L", prefix), config.top_l);
        config.build_capacity =
            parse_env_var(&format!("{}BUILD_CAPACITY", prefix), config.build_capacity);
        config.zone_block_size =
            parse_env_var(&format!("{}ZONE_BLOCK_SIZE", prefix), config.zone_block_size);
        config.normalize = parse_env_bool(&format!("{}NORMALIZE", prefix), config.normalize);
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            top_l: 20,
            build_capacity: 4_000_000,
            zone_block_size: 1024 * 1024,
            normalize: false,
        }
    }

    fn memory_preset() -> Self {
        Self {
            top_l: 5,
            build_capacity: 64 * 1024,
            zone_block_size: 16 * 1024,
            normalize: false,
        }
    }

    fn realtime_preset() -> Self {
        Self {
            top_l: 8,
            build_capacity: 1_000_000,
            zone_block_size: 64 * 1024,
            normalize: true,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            EditTrieError::configuration(format!("Failed to serialize trie config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            EditTrieError::configuration(format!("Failed to write trie config file: {}", e))
        })?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EditTrieError::configuration(format!("Failed to read trie config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            EditTrieError::configuration(format!("Failed to parse trie config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl TrieConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TrieConfigBuilder {
        TrieConfigBuilder::new()
    }
}

/// Builder for [`TrieConfig`]
#[derive(Debug, Clone)]
pub struct TrieConfigBuilder {
    config: TrieConfig,
}

impl TrieConfigBuilder {
    /// Create a builder with default values.
    pub fn new() -> Self {
        Self {
            config: TrieConfig::default(),
        }
    }

    /// Set the descendant-list cap.
    pub fn top_l(mut self, top_l: usize) -> Self {
        self.config.top_l = top_l;
        self
    }

    /// Set the suggested transition-table capacity.
    pub fn build_capacity(mut self, capacity: usize) -> Self {
        self.config.build_capacity = capacity;
        self
    }

    /// Set the zone block size.
    pub fn zone_block_size(mut self, size: usize) -> Self {
        self.config.zone_block_size = size;
        self
    }

    /// Enable or disable text normalization.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.config.normalize = normalize;
        self
    }

    /// Build the configuration, failing if validation fails.
    pub fn build(self) -> Result<TrieConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TrieConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
