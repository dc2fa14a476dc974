//! # Meridian
//!
//! An embeddable shard router:
//! - Deterministic key -> shard routing with runtime-switchable strategies
//! - Per-shard health tracking (active / disabled / error)
//! - Concurrent scatter-gather over the full shard set
//! - Comparative-latency lookups: routed access vs. full unpartitioned scan
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Request Layer                            │
//! │            (HTTP / CLI - external collaborator)              │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//! ┌──────────▼──────────┐            ┌──────────▼──────────┐
//! │       Router        │◄───────────│     Comparator      │
//! │  write / read_one   │            │   compare_lookup    │
//! │     scatter_all     │            └─────────────────────┘
//! └──────┬───────┬──────┘
//!        │       │
//! ┌──────▼───┐ ┌─▼────────────┐
//! │ Strategy │ │   Registry   │
//! │ Selector │ │ (status map) │
//! └──────────┘ └──┬───────────┘
//!                 │
//!      ┌──────────┼──────────┐
//!      ▼          ▼          ▼
//! ┌─────────┐┌─────────┐┌─────────┐
//! │ Shard 0 ││ Shard 1 ││ Shard 2 │   (ShardStore backends,
//! │ (store) ││ (store) ││ (store) │    one pool each)
//! └─────────┘└─────────┘└─────────┘
//! ```
//!
//! Routing is a pure function of key and active strategy: at most one shard
//! is ever addressed for a given key, and an unavailable target is a hard
//! error rather than a silent failover. Switching the active strategy moves
//! no data - records written under the old strategy stay on their original
//! shard, which is the documented trade-off of migration-free switching.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod registry;
pub mod strategy;
pub mod pool;
pub mod router;
pub mod compare;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, RouterError};
pub use config::{Config, ShardSpec};
pub use registry::{ShardHandle, ShardId, ShardRegistry, ShardStatus};
pub use strategy::{Strategy, StrategySelector};
pub use store::{Key, MemoryStore, Record, ShardStore};
pub use router::{Router, RoutingDecision, ShardCount, ShardScan};
pub use compare::{Comparator, Comparison};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Meridian
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
