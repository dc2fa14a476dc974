//! Store Module
//!
//! The seam between the router and each shard's persistence engine.
//!
//! ## Responsibilities
//! - Define the `ShardStore` trait the router speaks to every shard through
//! - Provide `MemoryStore`, the in-memory reference backend
//!
//! The router never looks inside a store: a shard is an ordinary
//! transactional record store reachable through this trait, and whatever it
//! does for durability is its own business. Records are owned by whichever
//! shard currently stores them; the router neither copies nor caches them.

mod memory;

pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Record key. Signed so that negative inputs can be rejected explicitly
/// rather than silently wrapped.
pub type Key = i64;

/// A record as stored on a shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Routing key
    pub key: Key,

    /// Opaque payload bytes
    pub payload: Vec<u8>,
}

impl Record {
    /// Create a record
    pub fn new(key: Key, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            payload: payload.into(),
        }
    }
}

/// Backend interface of a single shard
///
/// Implementations must be safe to call from multiple threads; the router
/// fans scatter reads out concurrently.
pub trait ShardStore: Send + Sync {
    /// Insert or overwrite a record
    fn insert(&self, record: Record) -> Result<()>;

    /// Point lookup by key
    fn get(&self, key: Key) -> Result<Option<Record>>;

    /// Full row set, ordered by key
    fn scan(&self) -> Result<Vec<Record>>;

    /// Number of stored records
    fn count(&self) -> Result<usize>;

    /// Liveness check; `Err` marks the shard unhealthy
    fn ping(&self) -> Result<()>;
}
