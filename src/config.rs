//! Configuration for Meridian
//!
//! Centralized configuration with sensible defaults.
//!
//! The shard set is static: it is fixed here at build time and the registry
//! never grows or shrinks afterwards. Restarting the process resets every
//! shard to the default status configured here.

use std::time::Duration;

use crate::registry::ShardStatus;
use crate::store::Key;

/// Static description of one shard, as configured at startup
#[derive(Debug, Clone)]
pub struct ShardSpec {
    /// Connection target (address, DSN, path - opaque to the router)
    pub target: String,

    /// Status the shard starts in (and returns to on restart)
    pub default_status: ShardStatus,
}

impl ShardSpec {
    /// A shard that starts out active
    pub fn active(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            default_status: ShardStatus::Active,
        }
    }

    /// A shard that starts out disabled
    pub fn disabled(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            default_status: ShardStatus::Disabled,
        }
    }
}

/// Main configuration for a Meridian router
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Shard Configuration
    // -------------------------------------------------------------------------
    /// The static shard set; shard id == position in this list
    pub shards: Vec<ShardSpec>,

    // -------------------------------------------------------------------------
    // Strategy Configuration
    // -------------------------------------------------------------------------
    /// Name of the strategy active at startup ("hash-modulo" or "range")
    pub default_strategy: String,

    /// Exclusive upper bound of the key space used by the range strategy
    pub range_bound: Key,

    // -------------------------------------------------------------------------
    // Connection Pool Configuration
    // -------------------------------------------------------------------------
    /// Max concurrent connections per shard
    pub pool_size: usize,

    /// How long an operation waits for a free connection before failing
    /// with `PoolTimeout`
    pub pool_acquire_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shards: Vec::new(),
            default_strategy: "hash-modulo".to_string(),
            range_bound: 10_000,
            pool_size: 8,
            pool_acquire_timeout: Duration::from_millis(2000),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Number of configured shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Add a shard (id is assigned by position, starting at 0)
    pub fn shard(mut self, spec: ShardSpec) -> Self {
        self.config.shards.push(spec);
        self
    }

    /// Replace the whole shard list
    pub fn shards(mut self, specs: Vec<ShardSpec>) -> Self {
        self.config.shards = specs;
        self
    }

    /// Set the strategy active at startup
    pub fn default_strategy(mut self, name: impl Into<String>) -> Self {
        self.config.default_strategy = name.into();
        self
    }

    /// Set the exclusive key-space bound for the range strategy
    pub fn range_bound(mut self, bound: Key) -> Self {
        self.config.range_bound = bound;
        self
    }

    /// Set the per-shard connection pool size
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Set the pool acquire timeout
    pub fn pool_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_acquire_timeout = timeout;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
