//! Shard Registry
//!
//! Holds the static, ordered shard set and tracks each shard's availability.
//!
//! ## Responsibilities
//! - Canonical shard index space: shard id == position in the configured
//!   list, `0..n`, and partition strategies resolve into exactly that space
//! - Status bookkeeping (`Active` / `Disabled` / `Error`)
//! - Healthy-set queries for scatter fan-out
//!
//! ## Concurrency
//! - The shard list itself is immutable after construction
//! - Each slot's status sits behind its own RwLock; a status change is a
//!   single-value swap, so concurrent routing reads observe either the old
//!   or the new status, never a torn intermediate
//! - All methods take `&self`

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::ShardSpec;
use crate::error::{Result, RouterError};

/// Shard identifier. Equal to the shard's position in the configured list.
pub type ShardId = usize;

/// Availability state of a shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardStatus {
    /// Reachable and routable
    Active,

    /// Administratively taken out of rotation
    Disabled,

    /// A probe or scatter query against it failed
    Error,
}

impl fmt::Display for ShardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardStatus::Active => write!(f, "active"),
            ShardStatus::Disabled => write!(f, "disabled"),
            ShardStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of one registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardHandle {
    /// Shard identifier (stable for the registry's lifetime)
    pub id: ShardId,

    /// Connection target from configuration
    pub target: String,

    /// Status at the time the snapshot was taken
    pub status: ShardStatus,
}

/// One registered shard
struct ShardSlot {
    target: String,

    /// Only mutable field in the registry
    status: RwLock<ShardStatus>,
}

/// The static shard registry
///
/// Shards are registered once at construction from configuration and live
/// until process shutdown; there is no dynamic add/remove.
pub struct ShardRegistry {
    slots: Vec<ShardSlot>,
}

impl ShardRegistry {
    /// Build the registry from the configured shard specs
    pub fn new(specs: &[ShardSpec]) -> Result<Self> {
        if specs.is_empty() {
            return Err(RouterError::Config(
                "at least one shard must be configured".to_string(),
            ));
        }

        let slots = specs
            .iter()
            .map(|spec| ShardSlot {
                target: spec.target.clone(),
                status: RwLock::new(spec.default_status),
            })
            .collect();

        Ok(Self { slots })
    }

    /// Number of registered shards (fixed for the process lifetime)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no shards are registered (never, post-construction)
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot all shards in id order
    pub fn list(&self) -> Vec<ShardHandle> {
        self.slots
            .iter()
            .enumerate()
            .map(|(id, slot)| ShardHandle {
                id,
                target: slot.target.clone(),
                status: *slot.status.read(),
            })
            .collect()
    }

    /// Snapshot a single shard
    pub fn get(&self, id: ShardId) -> Result<ShardHandle> {
        let slot = self.slots.get(id).ok_or(RouterError::ShardNotFound(id))?;
        Ok(ShardHandle {
            id,
            target: slot.target.clone(),
            status: *slot.status.read(),
        })
    }

    /// Current status of a single shard
    pub fn status(&self, id: ShardId) -> Result<ShardStatus> {
        let slot = self.slots.get(id).ok_or(RouterError::ShardNotFound(id))?;
        Ok(*slot.status.read())
    }

    /// Set a shard's status
    ///
    /// Takes effect immediately for future routing and scatter decisions;
    /// in-flight operations that already resolved are not re-routed.
    /// Writing the status a shard already has is a no-op success.
    pub fn set_status(&self, id: ShardId, status: ShardStatus) -> Result<()> {
        let slot = self.slots.get(id).ok_or(RouterError::ShardNotFound(id))?;

        let mut current = slot.status.write();
        if *current != status {
            let prev = *current;
            tracing::info!(shard_id = id, from = %prev, to = %status, "shard status changed");
            *current = status;
        }
        Ok(())
    }

    /// Ids of all shards currently `Active`, in id order
    pub fn healthy(&self) -> Vec<ShardId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| *slot.status.read() == ShardStatus::Active)
            .map(|(id, _)| id)
            .collect()
    }
}
