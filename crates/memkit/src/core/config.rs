//! Configuration for memkit
//!
//! Growth policy lives here instead of in crate-wide constants, so different
//! call sites can pick different region sizes and vector thresholds.

use crate::error::{MemoryError, MemoryResult};

#[cfg(feature = "logging")]
use tracing::warn;

// ============================================================================
// Arena Configuration
// ============================================================================

/// Configuration for the region-chained [`Arena`](crate::allocator::Arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of a freshly created region, in machine words.
    ///
    /// Requests larger than this still succeed: the new region is sized to
    /// fit the request.
    pub region_words: usize,
}

impl ArenaConfig {
    /// Default region size: 8192 words (64KB on 64-bit targets)
    pub const DEFAULT_REGION_WORDS: usize = 8 * 1024;

    /// Creates new config with default values
    pub const fn new() -> Self {
        Self {
            region_words: Self::DEFAULT_REGION_WORDS,
        }
    }

    /// Small regions (1024 words) for short-lived scopes
    pub const fn small() -> Self {
        Self { region_words: 1024 }
    }

    /// Sets the region size in words
    #[must_use = "builder methods must be chained or built"]
    pub const fn with_region_words(mut self, words: usize) -> Self {
        self.region_words = words;
        self
    }

    /// Validates configuration
    pub fn validate(&self) -> MemoryResult<()> {
        if self.region_words == 0 {
            return Err(MemoryError::invalid_config("region_words must be non-zero"));
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Vector Configuration
// ============================================================================

/// Growth policy for [`Vector`](crate::collections::Vector)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorConfig {
    /// Capacity chosen when an empty vector first grows
    pub initial_capacity: usize,
    /// Spare capacity given to a clone beyond the source length
    pub clone_slack: usize,
}

impl VectorConfig {
    /// Default initial capacity (elements)
    pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

    /// Default clone slack (elements)
    pub const DEFAULT_CLONE_SLACK: usize = 64;

    /// Creates new config with default values
    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            clone_slack: Self::DEFAULT_CLONE_SLACK,
        }
    }

    /// Sets initial capacity
    #[must_use = "builder methods must be chained or built"]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets clone slack
    #[must_use = "builder methods must be chained or built"]
    pub const fn with_clone_slack(mut self, slack: usize) -> Self {
        self.clone_slack = slack;
        self
    }

    /// Validates configuration
    ///
    /// A zero initial capacity would make doubling loop forever.
    pub fn validate(&self) -> MemoryResult<()> {
        if self.initial_capacity == 0 {
            return Err(MemoryError::invalid_config(
                "initial_capacity must be non-zero",
            ));
        }
        Ok(())
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

/// Bundle of every tunable in the crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Arena configuration
    pub arena: ArenaConfig,
    /// Vector configuration
    pub vector: VectorConfig,
}

impl MemoryConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with small arena regions and a small vector threshold
    pub fn low_memory() -> Self {
        Self {
            arena: ArenaConfig::small(),
            vector: VectorConfig::new()
                .with_initial_capacity(8)
                .with_clone_slack(8),
        }
    }

    /// Validates every section
    pub fn validate(&self) -> MemoryResult<()> {
        let result = self.arena.validate().and_then(|()| self.vector.validate());

        #[cfg(feature = "logging")]
        if let Err(ref err) = result {
            warn!(error = %err, "rejected memory configuration");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MemoryConfig::default();
        assert_eq!(config.arena.region_words, 8192);
        assert_eq!(config.vector.initial_capacity, 64);
        assert_eq!(config.vector.clone_slack, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_region_rejected() {
        let config = ArenaConfig::new().with_region_words(0);
        assert!(matches!(
            config.validate(),
            Err(MemoryError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_initial_capacity_rejected() {
        let config = MemoryConfig {
            vector: VectorConfig::new().with_initial_capacity(0),
            ..MemoryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn low_memory_is_valid() {
        assert!(MemoryConfig::low_memory().validate().is_ok());
    }
}
