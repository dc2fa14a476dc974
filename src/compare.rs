//! Comparator Module
//!
//! Runs the same point lookup through the routed path (one shard) and
//! through a full unpartitioned scan (every shard, or an unsharded mirror
//! dataset when one is attached), timing both. The point of the exercise
//! is the side-by-side latency, so both paths always run to completion:
//! a failure on either side lands in that side's `error` field and the
//! comparison still comes back whole.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use crate::error::RouterError;
use crate::registry::ShardId;
use crate::router::Router;
use crate::store::{Key, Record, ShardStore};

/// Result of the routed side of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct ShardedLookup {
    /// The shard the key resolved to, when resolution got that far
    pub shard_id: Option<ShardId>,

    /// Wall-clock time of the routed lookup
    #[serde(rename = "elapsed_ms", serialize_with = "duration_ms")]
    pub elapsed: Duration,

    /// The record, when present on the resolved shard
    pub payload: Option<Record>,

    /// Failure report; `None` when the lookup completed (absence of the
    /// key is not a failure here)
    pub error: Option<String>,
}

/// Result of the full-scan side of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct FullScanLookup {
    /// Wall-clock time of the unpartitioned lookup
    #[serde(rename = "elapsed_ms", serialize_with = "duration_ms")]
    pub elapsed: Duration,

    /// The record, when present anywhere in the dataset
    pub payload: Option<Record>,

    /// Failure report; `None` when the scan completed
    pub error: Option<String>,
}

/// Structured result of one comparative lookup
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub sharded: ShardedLookup,
    pub full_scan: FullScanLookup,
}

/// Compares routed access against an unpartitioned baseline
pub struct Comparator {
    router: Arc<Router>,

    /// Unsharded mirror of the full dataset; when absent, the baseline is
    /// a scan over every shard's data
    mirror: Option<Arc<dyn ShardStore>>,
}

impl Comparator {
    /// Comparator whose baseline scans every shard
    pub fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            mirror: None,
        }
    }

    /// Comparator whose baseline reads an unsharded mirror store
    pub fn with_mirror(router: Arc<Router>, mirror: Arc<dyn ShardStore>) -> Self {
        Self {
            router,
            mirror: Some(mirror),
        }
    }

    /// Time a point lookup through both paths
    ///
    /// The two sides run concurrently and independently; neither result
    /// short-circuits the other.
    pub fn compare_lookup(&self, key: Key) -> Comparison {
        let (sharded, full_scan) = crossbeam::thread::scope(|scope| {
            let routed = scope.spawn(|_| self.routed_side(key));
            let scanned = scope.spawn(|_| self.full_scan_side(key));

            let sharded = routed
                .join()
                .unwrap_or_else(|_| Self::sharded_panic_slot());
            let full_scan = scanned
                .join()
                .unwrap_or_else(|_| Self::full_scan_panic_slot());
            (sharded, full_scan)
        })
        .unwrap_or_else(|_| (Self::sharded_panic_slot(), Self::full_scan_panic_slot()));

        tracing::debug!(
            key,
            sharded_ms = sharded.elapsed.as_secs_f64() * 1000.0,
            full_scan_ms = full_scan.elapsed.as_secs_f64() * 1000.0,
            "comparative lookup finished"
        );

        Comparison { sharded, full_scan }
    }

    fn routed_side(&self, key: Key) -> ShardedLookup {
        let start = Instant::now();
        let outcome = self.router.routed_lookup(key);
        let elapsed = start.elapsed();

        match outcome {
            Ok((decision, payload)) => ShardedLookup {
                shard_id: Some(decision.shard_id),
                elapsed,
                payload,
                error: None,
            },
            Err(err) => ShardedLookup {
                // Availability errors still name the shard the key
                // resolved to; resolution errors never got that far.
                shard_id: match &err {
                    RouterError::ShardUnavailable { shard_id, .. } => Some(*shard_id),
                    _ => None,
                },
                elapsed,
                payload: None,
                error: Some(err.to_string()),
            },
        }
    }

    fn full_scan_side(&self, key: Key) -> FullScanLookup {
        let start = Instant::now();
        let outcome = match &self.mirror {
            Some(mirror) => mirror.get(key),
            None => self.router.unpartitioned_lookup(key),
        };
        let elapsed = start.elapsed();

        match outcome {
            Ok(payload) => FullScanLookup {
                elapsed,
                payload,
                error: None,
            },
            Err(err) => FullScanLookup {
                elapsed,
                payload: None,
                error: Some(err.to_string()),
            },
        }
    }

    fn sharded_panic_slot() -> ShardedLookup {
        ShardedLookup {
            shard_id: None,
            elapsed: Duration::ZERO,
            payload: None,
            error: Some("comparison worker panicked".to_string()),
        }
    }

    fn full_scan_panic_slot() -> FullScanLookup {
        FullScanLookup {
            elapsed: Duration::ZERO,
            payload: None,
            error: Some("comparison worker panicked".to_string()),
        }
    }
}

/// Serialize a duration as fractional milliseconds, matching what the
/// presentation layer charts
fn duration_ms<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}
