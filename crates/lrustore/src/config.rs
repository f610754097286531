//! Store configuration

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Capacity used by [`LruConfig::default`].
pub const DEFAULT_CAPACITY: usize = 1024;

/// Configuration for an [`LruStore`](crate::LruStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LruConfig {
    /// Maximum number of entries held before the least recently used one is
    /// evicted.
    pub capacity: usize,
}

impl Default for LruConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl LruConfig {
    /// Create a config with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check the config and return the capacity as a non-zero value
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or(Error::ZeroCapacity)
    }
}
