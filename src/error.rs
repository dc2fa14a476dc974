//! Error types for Meridian
//!
//! Provides a unified error type for all routing operations.

use thiserror::Error;

use crate::registry::{ShardId, ShardStatus};
use crate::store::Key;

/// Result type alias using RouterError
pub type Result<T> = std::result::Result<T, RouterError>;

/// Unified error type for Meridian operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouterError {
    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("invalid key {0}: keys must be non-negative")]
    InvalidKey(Key),

    #[error("key {key} outside configured key space [0, {bound})")]
    OutOfRange { key: Key, bound: Key },

    #[error("key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Strategy Errors
    // -------------------------------------------------------------------------
    #[error("unknown partition strategy: {0:?}")]
    InvalidStrategy(String),

    // -------------------------------------------------------------------------
    // Shard Errors
    // -------------------------------------------------------------------------
    #[error("shard {0} not found in registry")]
    ShardNotFound(ShardId),

    #[error("shard {shard_id} unavailable (status: {status})")]
    ShardUnavailable {
        shard_id: ShardId,
        status: ShardStatus,
    },

    /// A per-shard failure during scatter/compare. Recorded inline in the
    /// result slot for that shard, never propagated as the call's error.
    #[error("shard {shard_id} failed: {message}")]
    ShardError { shard_id: ShardId, message: String },

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("timed out waiting for a connection to shard {shard_id}")]
    PoolTimeout { shard_id: ShardId },

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("store error: {0}")]
    Store(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
