//! Router Module
//!
//! Resolves single-key operations to one shard and fans whole-dataset
//! operations out to all of them.
//!
//! ## Responsibilities
//! - Route writes and point reads through the active partition strategy
//! - Enforce shard availability: an unavailable target shard is a hard
//!   error, never a silent failover (failing over would break the
//!   deterministic key->shard mapping)
//! - Scatter-gather over the full shard set with per-shard fault isolation
//! - Live health probing of active shards
//!
//! ## Concurrency
//! - Requests run independently; the only shared mutable state is the
//!   active strategy (in `StrategySelector`) and per-shard status (in
//!   `ShardRegistry`), both single-value swaps under their own locks
//! - Scatter and probe fan out on crossbeam scoped threads and join all of
//!   them before returning (fan-out/fan-in barrier); results come back as
//!   a fixed-size vector ordered by shard id, one slot per registered
//!   shard, never a streaming channel

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, RouterError};
use crate::pool::ConnectionPool;
use crate::registry::{ShardHandle, ShardId, ShardRegistry, ShardStatus};
use crate::store::{Key, MemoryStore, Record, ShardStore};
use crate::strategy::StrategySelector;

/// Where one request was routed, and by what
///
/// Ephemeral: produced per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    /// Target shard
    pub shard_id: ShardId,

    /// Wire name of the strategy that made the decision
    pub strategy: &'static str,
}

/// One shard's slice of a `scatter_all` result
#[derive(Debug, Clone, Serialize)]
pub struct ShardScan {
    pub shard_id: ShardId,

    /// Status as of this scatter (post-transition if the query failed)
    pub status: ShardStatus,

    /// Row set; empty for shards that were not contacted or failed
    pub rows: Vec<Record>,

    /// Inline failure report, `None` on success or when not contacted
    pub error: Option<String>,
}

/// One shard's slice of a `distribution` result
#[derive(Debug, Clone, Serialize)]
pub struct ShardCount {
    pub shard_id: ShardId,
    pub target: String,
    pub status: ShardStatus,

    /// Row count; zero for shards that were not contacted or failed
    pub count: usize,

    /// Inline failure report, `None` on success or when not contacted
    pub error: Option<String>,
}

/// A shard's backend plus its connection pool, index-aligned with the
/// registry
struct ShardConn {
    store: Arc<dyn ShardStore>,
    pool: ConnectionPool,
}

/// The shard router
pub struct Router {
    registry: Arc<ShardRegistry>,
    strategies: Arc<StrategySelector>,
    conns: Vec<ShardConn>,
}

impl Router {
    /// Build a router over the given per-shard backends
    ///
    /// `stores` must be index-aligned with `config.shards`: store `i`
    /// serves shard id `i`.
    pub fn new(config: Config, stores: Vec<Arc<dyn ShardStore>>) -> Result<Self> {
        if stores.len() != config.shards.len() {
            return Err(RouterError::Config(format!(
                "{} shards configured but {} stores supplied",
                config.shards.len(),
                stores.len()
            )));
        }

        let registry = Arc::new(ShardRegistry::new(&config.shards)?);
        let strategies = Arc::new(StrategySelector::new(
            &config.default_strategy,
            config.range_bound,
        )?);

        let conns = stores
            .into_iter()
            .enumerate()
            .map(|(id, store)| ShardConn {
                store,
                pool: ConnectionPool::new(id, config.pool_size, config.pool_acquire_timeout),
            })
            .collect();

        Ok(Self {
            registry,
            strategies,
            conns,
        })
    }

    /// Build a router backed entirely by in-memory stores
    pub fn in_memory(config: Config) -> Result<Self> {
        let stores = config
            .shards
            .iter()
            .map(|_| Arc::new(MemoryStore::new()) as Arc<dyn ShardStore>)
            .collect();
        Self::new(config, stores)
    }

    /// The shard registry (status toggles go through here)
    pub fn registry(&self) -> &ShardRegistry {
        &self.registry
    }

    /// The strategy selector (runtime switching goes through here)
    pub fn strategies(&self) -> &StrategySelector {
        &self.strategies
    }

    // =========================================================================
    // Single-Key Operations
    // =========================================================================

    /// Resolve a key to its target shard under the active strategy
    ///
    /// Deterministic: the decision is a pure function of the key and the
    /// strategy captured at this instant. A strategy switch after this
    /// call does not revise the decision.
    pub fn resolve(&self, key: Key) -> Result<RoutingDecision> {
        let strategy = self.strategies.active();
        let shard_id = strategy.resolve(key, self.registry.len())?;

        Ok(RoutingDecision {
            shard_id,
            strategy: strategy.name(),
        })
    }

    /// Write a record to the shard that owns its key
    ///
    /// Fails with `ShardUnavailable` if the resolved shard is not active.
    /// No failover: re-targeting the write would put the record where no
    /// future resolution of this key will look.
    pub fn write(&self, key: Key, payload: impl Into<Vec<u8>>) -> Result<RoutingDecision> {
        let decision = self.resolve(key)?;
        self.check_available(decision.shard_id)?;

        let conn = &self.conns[decision.shard_id];
        let _permit = conn.pool.acquire()?;
        conn.store.insert(Record::new(key, payload))?;

        tracing::debug!(
            key,
            shard_id = decision.shard_id,
            strategy = decision.strategy,
            "write routed"
        );
        Ok(decision)
    }

    /// Point read through the active strategy
    ///
    /// An unavailable resolved shard yields `ShardUnavailable`; an
    /// available shard with no record for the key yields `KeyNotFound`.
    /// Key absence is distinct from shard absence.
    pub fn read_one(&self, key: Key) -> Result<(RoutingDecision, Record)> {
        let (decision, record) = self.routed_lookup(key)?;
        match record {
            Some(record) => Ok((decision, record)),
            None => Err(RouterError::KeyNotFound),
        }
    }

    /// Routed point lookup that reports absence as `None` rather than an
    /// error; shared by `read_one` and the comparator
    pub(crate) fn routed_lookup(&self, key: Key) -> Result<(RoutingDecision, Option<Record>)> {
        let decision = self.resolve(key)?;
        self.check_available(decision.shard_id)?;

        let conn = &self.conns[decision.shard_id];
        let _permit = conn.pool.acquire()?;
        let record = conn.store.get(key)?;

        Ok((decision, record))
    }

    fn check_available(&self, shard_id: ShardId) -> Result<()> {
        let status = self.registry.status(shard_id)?;
        if status != ShardStatus::Active {
            return Err(RouterError::ShardUnavailable { shard_id, status });
        }
        Ok(())
    }

    // =========================================================================
    // Scatter Operations
    // =========================================================================

    /// Full-row scatter across every registered shard
    ///
    /// Always returns exactly one entry per shard, ordered by shard id.
    /// Non-active shards are reported with their status and an empty row
    /// set, not contacted. A contacted shard that fails is transitioned to
    /// `Error` in the registry and reported inline; the other shards'
    /// results are unaffected. Partial success is the normal outcome.
    pub fn scatter_all(&self) -> Result<Vec<ShardScan>> {
        let outcomes = self.fan_out(|conn| {
            let _permit = conn.pool.acquire()?;
            conn.store.scan()
        })?;

        Ok(outcomes
            .into_iter()
            .map(|outcome| match outcome {
                ShardOutcome::Skipped { shard_id, status } => ShardScan {
                    shard_id,
                    status,
                    rows: Vec::new(),
                    error: None,
                },
                ShardOutcome::Ok { shard_id, value } => ShardScan {
                    shard_id,
                    status: ShardStatus::Active,
                    rows: value,
                    error: None,
                },
                ShardOutcome::Failed {
                    shard_id,
                    status,
                    error,
                } => ShardScan {
                    shard_id,
                    status,
                    rows: Vec::new(),
                    error: Some(error),
                },
            })
            .collect())
    }

    /// Counts-only scatter variant backing the distribution view
    pub fn distribution(&self) -> Result<Vec<ShardCount>> {
        let handles = self.registry.list();
        let outcomes = self.fan_out(|conn| {
            let _permit = conn.pool.acquire()?;
            conn.store.count()
        })?;

        Ok(outcomes
            .into_iter()
            .zip(handles)
            .map(|(outcome, handle)| match outcome {
                ShardOutcome::Skipped { shard_id, status } => ShardCount {
                    shard_id,
                    target: handle.target,
                    status,
                    count: 0,
                    error: None,
                },
                ShardOutcome::Ok { shard_id, value } => ShardCount {
                    shard_id,
                    target: handle.target,
                    status: ShardStatus::Active,
                    count: value,
                    error: None,
                },
                ShardOutcome::Failed {
                    shard_id,
                    status,
                    error,
                } => ShardCount {
                    shard_id,
                    target: handle.target,
                    status,
                    count: 0,
                    error: Some(error),
                },
            })
            .collect())
    }

    /// Probe every active shard's backend
    ///
    /// A failed probe transitions that shard to `Error`. Returns the
    /// post-probe registry snapshot.
    pub fn probe_all(&self) -> Result<Vec<ShardHandle>> {
        self.fan_out(|conn| {
            let _permit = conn.pool.acquire()?;
            conn.store.ping()
        })?;

        Ok(self.registry.list())
    }

    /// Unpartitioned point lookup: asks every shard for the key,
    /// concurrently, regardless of registry status
    ///
    /// This is the comparator's full-scan baseline - it models a single
    /// unsharded dataset, so administrative status does not apply. Any
    /// per-shard failure fails the whole lookup (absence cannot be claimed
    /// while part of the dataset was unreadable).
    pub(crate) fn unpartitioned_lookup(&self, key: Key) -> Result<Option<Record>> {
        let results = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = self
                .conns
                .iter()
                .map(|conn| {
                    scope.spawn(move |_| -> Result<Option<Record>> {
                        let _permit = conn.pool.acquire()?;
                        conn.store.get(key)
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(shard_id, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(RouterError::ShardError {
                            shard_id,
                            message: "shard worker panicked".to_string(),
                        })
                    })
                })
                .collect::<Vec<_>>()
        })
        .map_err(|_| RouterError::Store("scatter worker pool failed".to_string()))?;

        let mut found = None;
        for result in results {
            if let Some(record) = result? {
                found = Some(record);
            }
        }
        Ok(found)
    }

    // =========================================================================
    // Fan-Out Plumbing
    // =========================================================================

    /// Run `op` against every active shard concurrently and join all of
    /// them; skipped and failed shards keep their slot in the id-ordered
    /// result. A failing shard is transitioned to `Error`; a pool timeout
    /// is reported inline without a status transition.
    fn fan_out<T, F>(&self, op: F) -> Result<Vec<ShardOutcome<T>>>
    where
        T: Send,
        F: Fn(&ShardConn) -> Result<T> + Sync,
    {
        let statuses: Vec<ShardStatus> = self
            .registry
            .list()
            .into_iter()
            .map(|handle| handle.status)
            .collect();

        let op = &op;
        let joined = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = self
                .conns
                .iter()
                .zip(&statuses)
                .map(|(conn, &status)| {
                    if status == ShardStatus::Active {
                        Some(scope.spawn(move |_| op(conn)))
                    } else {
                        None
                    }
                })
                .collect();

            // Join barrier: every spawned sub-operation completes before
            // the scatter returns.
            handles
                .into_iter()
                .enumerate()
                .map(|(shard_id, handle)| {
                    handle.map(|h| {
                        h.join().unwrap_or_else(|_| {
                            Err(RouterError::ShardError {
                                shard_id,
                                message: "shard worker panicked".to_string(),
                            })
                        })
                    })
                })
                .collect::<Vec<_>>()
        })
        .map_err(|_| RouterError::Store("scatter worker pool failed".to_string()))?;

        let outcomes = joined
            .into_iter()
            .enumerate()
            .map(|(shard_id, slot)| match slot {
                None => ShardOutcome::Skipped {
                    shard_id,
                    status: statuses[shard_id],
                },
                Some(Ok(value)) => ShardOutcome::Ok { shard_id, value },
                Some(Err(err)) => {
                    // Resource exhaustion is not evidence the shard itself
                    // is broken; everything else is.
                    let status = if matches!(&err, RouterError::PoolTimeout { .. }) {
                        statuses[shard_id]
                    } else {
                        tracing::warn!(shard_id, error = %err, "shard query failed, marking shard errored");
                        let _ = self.registry.set_status(shard_id, ShardStatus::Error);
                        ShardStatus::Error
                    };
                    ShardOutcome::Failed {
                        shard_id,
                        status,
                        error: err.to_string(),
                    }
                }
            })
            .collect();

        Ok(outcomes)
    }
}

/// Per-shard slot of a fan-out result
enum ShardOutcome<T> {
    /// Not contacted (disabled or errored at the time of the scatter)
    Skipped {
        shard_id: ShardId,
        status: ShardStatus,
    },

    /// Contacted and succeeded
    Ok { shard_id: ShardId, value: T },

    /// Contacted and failed at call time
    Failed {
        shard_id: ShardId,
        status: ShardStatus,
        error: String,
    },
}
