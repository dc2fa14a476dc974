//! Partition Strategies
//!
//! Maps a key to a shard index. Strategies are a closed set of stateless,
//! pure functions: same key, same strategy, same shard, every time. That
//! determinism is the whole contract - the router refuses to fall back to
//! another shard precisely because resolution must stay a pure function of
//! key and strategy.
//!
//! ## Runtime switching
//! The active strategy lives in a `StrategySelector` and can be swapped
//! while the router is serving. A switch changes future routing decisions
//! only: records written under the old strategy stay physically on their
//! original shard, so a subsequent read under the new strategy may miss
//! them. That is the documented trade-off of switching without migration,
//! not a bug.
//!
//! ## Concurrency
//! - The selector holds the strategy behind a RwLock and swaps it as one
//!   value; readers copy the enum out, so an in-flight request keeps the
//!   decision it captured even if the strategy changes mid-request

use parking_lot::RwLock;

use crate::error::{Result, RouterError};
use crate::registry::ShardId;
use crate::store::Key;

/// Wire name of the hash-modulo strategy
pub const HASH_MODULO: &str = "hash-modulo";

/// Wire name of the range strategy
pub const RANGE: &str = "range";

/// A partition strategy
///
/// A closed enum rather than trait objects keyed by name: the name lookup
/// happens once when a strategy is activated, and the hot path dispatches
/// on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `index = key mod shard_count`
    HashModulo,

    /// `shard_count` contiguous buckets over the key space `[0, bound)`
    Range {
        /// Exclusive upper bound of the key space
        bound: Key,
    },
}

impl Strategy {
    /// Wire name of this strategy
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::HashModulo => HASH_MODULO,
            Strategy::Range { .. } => RANGE,
        }
    }

    /// Resolve a key to a shard index
    ///
    /// Pure and deterministic. For every non-negative key the result is in
    /// `[0, shard_count)`; keys the strategy cannot place fail instead of
    /// getting an implementation-defined bucket.
    pub fn resolve(&self, key: Key, shard_count: usize) -> Result<ShardId> {
        debug_assert!(shard_count >= 1, "registry guarantees at least one shard");

        if key < 0 {
            return Err(RouterError::InvalidKey(key));
        }

        match *self {
            Strategy::HashModulo => Ok((key as u64 % shard_count as u64) as ShardId),

            Strategy::Range { bound } => {
                if key >= bound {
                    return Err(RouterError::OutOfRange { key, bound });
                }
                // Last bucket absorbs the remainder of an uneven split.
                let width = (bound / shard_count as Key).max(1);
                let index = (key / width) as usize;
                Ok(index.min(shard_count - 1))
            }
        }
    }
}

/// Holds the process-wide active strategy and the set it can switch between
///
/// The available set is fixed at construction (the range bound comes from
/// configuration); only which member is active changes at runtime.
pub struct StrategySelector {
    available: Vec<Strategy>,
    active: RwLock<Strategy>,
}

impl StrategySelector {
    /// Build a selector offering both built-in strategies, with the named
    /// one active
    pub fn new(default_strategy: &str, range_bound: Key) -> Result<Self> {
        if range_bound < 1 {
            return Err(RouterError::Config(format!(
                "range bound must be positive, got {}",
                range_bound
            )));
        }

        let available = vec![Strategy::HashModulo, Strategy::Range { bound: range_bound }];
        let active = Self::find(&available, default_strategy)?;

        Ok(Self {
            available,
            active: RwLock::new(active),
        })
    }

    /// Copy of the currently active strategy
    pub fn active(&self) -> Strategy {
        *self.active.read()
    }

    /// Wire name of the currently active strategy
    pub fn active_name(&self) -> &'static str {
        self.active().name()
    }

    /// Activate a strategy by wire name
    ///
    /// Effective immediately for all subsequent resolutions; requests that
    /// already captured the prior strategy are unaffected. Re-activating
    /// the active strategy is a no-op success.
    pub fn set_active(&self, name: &str) -> Result<()> {
        let next = Self::find(&self.available, name)?;

        let mut active = self.active.write();
        if *active != next {
            tracing::info!(from = active.name(), to = next.name(), "active strategy switched");
            *active = next;
        }
        Ok(())
    }

    /// Wire names of every available strategy
    pub fn available_names(&self) -> Vec<&'static str> {
        self.available.iter().map(Strategy::name).collect()
    }

    fn find(available: &[Strategy], name: &str) -> Result<Strategy> {
        available
            .iter()
            .copied()
            .find(|s| s.name() == name)
            .ok_or_else(|| RouterError::InvalidStrategy(name.to_string()))
    }
}
