//! Configuration for block pooling.
//!
//! [`PoolConfig`] controls the size classes a [`BlockPool`](crate::BlockPool)
//! hands out and which of them it keeps for reuse.
//!
//! # Example
//!
//! ```
//! use cursorbuf::{BlockPool, PoolConfig};
//!
//! // Custom size classes: 64-byte unit, pool blocks up to 64 KiB
//! let config = PoolConfig::new(64, 64 * 1024)?;
//!
//! // Bound the memory retained by the cache
//! let config = config.with_cache_limit(Some(1024 * 1024));
//!
//! let pool = BlockPool::with_config(config)?;
//! # Ok::<(), cursorbuf::BufError>(())
//! ```

use crate::error::BufError;

/// Default size-class unit (16 bytes). Every block length is `unit * 2^n`.
pub const DEFAULT_UNIT: usize = 16;

/// Default largest pooled size class (32 KiB).
pub const DEFAULT_MAX_POOLED: usize = 32 * 1024;

/// Configuration for a [`BlockPool`](crate::BlockPool).
///
/// # Size Constraints
///
/// Both sizes must be:
/// - Non-zero
/// - Powers of 2
/// - Ordered: `unit <= max_pooled`
///
/// Requests are rounded up to `unit * 2^n`. Classes above `max_pooled` are
/// allocated fresh and dropped on release instead of being cached.
///
/// `cache_limit` optionally bounds the total bytes held in free lists. The
/// default is `None`: the cache grows with peak demand and is never trimmed
/// unless [`BlockPool::trim`](crate::BlockPool::trim) is called.
///
/// # Example
///
/// ```
/// use cursorbuf::PoolConfig;
///
/// let config = PoolConfig::default()
///     .with_unit(32)
///     .with_max_pooled(8192);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Smallest size class in bytes.
    unit: usize,

    /// Largest size class that is cached.
    max_pooled: usize,

    /// Upper bound on bytes held in free lists.
    cache_limit: Option<usize>,
}

impl PoolConfig {
    /// Creates a new configuration with the given size-class bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BufError::InvalidConfig`] if:
    /// - Either size is zero
    /// - Either size is not a power of 2
    /// - `unit > max_pooled`
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::PoolConfig;
    ///
    /// let config = PoolConfig::new(16, 4096)?;
    /// assert_eq!(config.unit(), 16);
    /// # Ok::<(), cursorbuf::BufError>(())
    /// ```
    pub fn new(unit: usize, max_pooled: usize) -> Result<Self, BufError> {
        if unit == 0 || max_pooled == 0 {
            return Err(BufError::InvalidConfig {
                message: "size classes must be non-zero",
            });
        }

        if !unit.is_power_of_two() || !max_pooled.is_power_of_two() {
            return Err(BufError::InvalidConfig {
                message: "size classes must be powers of 2",
            });
        }

        if unit > max_pooled {
            return Err(BufError::InvalidConfig {
                message: "unit cannot be greater than max_pooled",
            });
        }

        Ok(Self {
            unit,
            max_pooled,
            cache_limit: None,
        })
    }

    /// Sets the smallest size class.
    ///
    /// Note: This does not validate the configuration. Use [`PoolConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_unit(mut self, unit: usize) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the largest cached size class.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_max_pooled(mut self, max_pooled: usize) -> Self {
        self.max_pooled = max_pooled;
        self
    }

    /// Bounds the total bytes kept in free lists. `None` means unbounded.
    pub fn with_cache_limit(mut self, limit: Option<usize>) -> Self {
        self.cache_limit = limit;
        self
    }

    /// Returns the smallest size class.
    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Returns the largest cached size class.
    pub fn max_pooled(&self) -> usize {
        self.max_pooled
    }

    /// Returns the cache bound, if any.
    pub fn cache_limit(&self) -> Option<usize> {
        self.cache_limit
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_unit(24);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), BufError> {
        Self::new(self.unit, self.max_pooled).map(|_| ())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            unit: DEFAULT_UNIT,
            max_pooled: DEFAULT_MAX_POOLED,
            cache_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.unit(), DEFAULT_UNIT);
        assert_eq!(config.max_pooled(), DEFAULT_MAX_POOLED);
        assert_eq!(config.cache_limit(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PoolConfig::default()
            .with_unit(64)
            .with_max_pooled(65536)
            .with_cache_limit(Some(1 << 20));

        assert_eq!(config.unit(), 64);
        assert_eq!(config.max_pooled(), 65536);
        assert_eq!(config.cache_limit(), Some(1 << 20));
    }

    #[test]
    fn test_invalid_config_zero_size() {
        assert!(PoolConfig::new(0, 4096).is_err());
        assert!(PoolConfig::new(16, 0).is_err());
    }

    #[test]
    fn test_invalid_config_not_power_of_two() {
        assert!(PoolConfig::new(24, 4096).is_err());
        assert!(PoolConfig::new(16, 5000).is_err());
    }

    #[test]
    fn test_invalid_config_unit_gt_max() {
        let result = PoolConfig::new(8192, 4096);
        assert!(matches!(result, Err(BufError::InvalidConfig { .. })));
    }
}
