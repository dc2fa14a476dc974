//! In-memory shard backend
//!
//! BTreeMap under a RwLock: ordered scans, many concurrent readers,
//! exclusive writers. Used by the demo binary and the test suite; a real
//! deployment would put a database client behind `ShardStore` instead.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::Result;

use super::{Key, Record, ShardStore};

/// In-memory record store
#[derive(Default)]
pub struct MemoryStore {
    /// Ordered so scan() returns rows sorted by key
    records: RwLock<BTreeMap<Key, Record>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShardStore for MemoryStore {
    fn insert(&self, record: Record) -> Result<()> {
        self.records.write().insert(record.key, record);
        Ok(())
    }

    fn get(&self, key: Key) -> Result<Option<Record>> {
        Ok(self.records.read().get(&key).cloned())
    }

    fn scan(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    fn ping(&self) -> Result<()> {
        Ok(())
    }
}
