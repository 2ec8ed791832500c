//! Cache configuration
//!
//! Capacity is the only knob. It may come from code or from the
//! `LRUCACHE_CAPACITY` environment variable; values below 1 are clamped.

use tracing::warn;

use crate::error::{Error, Result};

/// Capacity used when nothing is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Environment variable read by [`CacheConfig::from_env`]
pub const CAPACITY_ENV: &str = "LRUCACHE_CAPACITY";

/// Settings for building an [`LruCache`](crate::LruCache) or [`SharedCache`](crate::SharedCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    capacity: usize,
}

impl CacheConfig {
    /// Create a config with the given capacity
    ///
    /// Zero and negative capacities are clamped to 1 rather than rejected.
    pub fn new(capacity: i64) -> Self {
        if capacity < 1 {
            warn!(requested = capacity, "cache capacity below 1, using 1");
            return Self { capacity: 1 };
        }

        Self {
            capacity: usize::try_from(capacity).unwrap_or(usize::MAX),
        }
    }

    /// Read the config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the config through an arbitrary variable lookup
    ///
    /// # Arguments
    /// * `lookup` - Returns the raw value of a variable, if set
    ///
    /// # Returns
    /// * `Result<CacheConfig>` - Default config when the variable is unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CAPACITY_ENV) {
            None => Ok(Self::default()),
            Some(raw) => {
                let capacity = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| Error::InvalidCapacity(raw.clone()))?;
                Ok(Self::new(capacity))
            }
        }
    }

    /// Get the effective capacity (always at least 1)
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
