//! Engine configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`Corrector`](crate::Corrector)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Maximum number of nested beans on the stack in one walk
    pub max_traversal_depth: usize,
    /// Pre-populate the registry with the built-in appliers
    pub seed_builtin_appliers: bool,
}

impl CorrectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum traversal depth
    #[inline]
    #[must_use]
    pub fn with_max_traversal_depth(mut self, depth: usize) -> Self {
        self.max_traversal_depth = depth;
        self
    }

    /// With or without seeded built-in appliers
    #[inline]
    #[must_use]
    pub fn with_seed_builtin_appliers(mut self, seed: bool) -> Self {
        self.seed_builtin_appliers = seed;
        self
    }
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: 256,
            seed_builtin_appliers: true,
        }
    }
}
