//! Per-shard connection pool
//!
//! Bounds the number of concurrent operations against one shard. The demo
//! backend is in-memory, but the contract matches a real client pool: a
//! fixed number of permits, and waiters that give up after the configured
//! timeout instead of queueing forever.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{Result, RouterError};
use crate::registry::ShardId;

/// Fixed-capacity permit pool for one shard
pub struct ConnectionPool {
    shard_id: ShardId,
    available: Mutex<usize>,
    returned: Condvar,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    /// Create a pool with `capacity` permits
    pub fn new(shard_id: ShardId, capacity: usize, acquire_timeout: Duration) -> Self {
        Self {
            shard_id,
            available: Mutex::new(capacity.max(1)),
            returned: Condvar::new(),
            acquire_timeout,
        }
    }

    /// Take a permit, waiting up to the configured timeout
    ///
    /// Exhaustion surfaces as `PoolTimeout`, never as an unbounded wait.
    /// The deadline is fixed once up front: a waiter that wakes up, loses
    /// the race for a returned permit, and waits again does not have its
    /// clock restarted.
    pub fn acquire(&self) -> Result<PoolPermit<'_>> {
        let deadline = Instant::now() + self.acquire_timeout;
        let mut available = self.available.lock();

        while *available == 0 {
            if self
                .returned
                .wait_until(&mut available, deadline)
                .timed_out()
            {
                tracing::warn!(shard_id = self.shard_id, "connection pool exhausted");
                return Err(RouterError::PoolTimeout {
                    shard_id: self.shard_id,
                });
            }
        }

        *available -= 1;
        Ok(PoolPermit { pool: self })
    }

    fn release(&self) {
        let mut available = self.available.lock();
        *available += 1;
        self.returned.notify_one();
    }
}

/// A held connection permit; returned to the pool on drop
pub struct PoolPermit<'a> {
    pool: &'a ConnectionPool,
}

impl Drop for PoolPermit<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}
