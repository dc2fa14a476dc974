//! Tests for partition strategies
//!
//! These tests verify:
//! - Determinism and output bounds of hash-modulo
//! - Range bucketing and key-space bound enforcement
//! - Key validation (negative keys rejected)
//! - Runtime strategy switching through the selector

use meridian::strategy::{Strategy, StrategySelector, HASH_MODULO, RANGE};
use meridian::RouterError;

// =============================================================================
// Hash-Modulo Tests
// =============================================================================

#[test]
fn test_hash_modulo_in_bounds_and_deterministic() {
    let strategy = Strategy::HashModulo;

    for shard_count in [1, 2, 3, 7] {
        for key in [0, 1, 6, 7, 42, 9_999, i64::MAX] {
            let first = strategy.resolve(key, shard_count).unwrap();
            let second = strategy.resolve(key, shard_count).unwrap();

            assert!(first < shard_count);
            assert_eq!(first, second, "same inputs must give same shard");
        }
    }
}

#[test]
fn test_hash_modulo_is_key_mod_count() {
    let strategy = Strategy::HashModulo;

    assert_eq!(strategy.resolve(7, 3).unwrap(), 1);
    assert_eq!(strategy.resolve(9, 3).unwrap(), 0);
    assert_eq!(strategy.resolve(11, 4).unwrap(), 3);
}

#[test]
fn test_hash_modulo_rejects_negative_keys() {
    let strategy = Strategy::HashModulo;

    assert_eq!(
        strategy.resolve(-1, 3),
        Err(RouterError::InvalidKey(-1)),
        "negative keys must fail, not get an implementation-defined modulo"
    );
}

#[test]
fn test_hash_modulo_single_shard() {
    let strategy = Strategy::HashModulo;

    assert_eq!(strategy.resolve(12345, 1).unwrap(), 0);
}

// =============================================================================
// Range Tests
// =============================================================================

#[test]
fn test_range_contiguous_buckets() {
    // bound 9000, 3 shards -> buckets of width 3000
    let strategy = Strategy::Range { bound: 9000 };

    assert_eq!(strategy.resolve(0, 3).unwrap(), 0);
    assert_eq!(strategy.resolve(2999, 3).unwrap(), 0);
    assert_eq!(strategy.resolve(3000, 3).unwrap(), 1);
    assert_eq!(strategy.resolve(5999, 3).unwrap(), 1);
    assert_eq!(strategy.resolve(6000, 3).unwrap(), 2);
    assert_eq!(strategy.resolve(8999, 3).unwrap(), 2);
}

#[test]
fn test_range_last_bucket_absorbs_remainder() {
    // bound 10000, 3 shards -> width 3333; keys 9999 and 9998 both land
    // in the last bucket instead of a nonexistent shard 3
    let strategy = Strategy::Range { bound: 10_000 };

    assert_eq!(strategy.resolve(9999, 3).unwrap(), 2);
    assert_eq!(strategy.resolve(9998, 3).unwrap(), 2);
}

#[test]
fn test_range_in_bound_results_stay_in_shard_space() {
    let strategy = Strategy::Range { bound: 1000 };

    for shard_count in [1, 2, 3, 5] {
        for key in 0..1000 {
            let index = strategy.resolve(key, shard_count).unwrap();
            assert!(index < shard_count);
        }
    }
}

#[test]
fn test_range_rejects_keys_outside_bound() {
    let strategy = Strategy::Range { bound: 1000 };

    assert_eq!(
        strategy.resolve(1000, 3),
        Err(RouterError::OutOfRange {
            key: 1000,
            bound: 1000
        })
    );
    assert!(matches!(
        strategy.resolve(50_000, 3),
        Err(RouterError::OutOfRange { .. })
    ));
}

#[test]
fn test_range_rejects_negative_keys() {
    let strategy = Strategy::Range { bound: 1000 };

    assert_eq!(strategy.resolve(-7, 3), Err(RouterError::InvalidKey(-7)));
}

// =============================================================================
// Selector Tests
// =============================================================================

#[test]
fn test_selector_starts_on_configured_default() {
    let selector = StrategySelector::new(RANGE, 500).unwrap();

    assert_eq!(selector.active_name(), RANGE);
    assert_eq!(selector.active(), Strategy::Range { bound: 500 });
}

#[test]
fn test_selector_switch_is_effective_immediately() {
    let selector = StrategySelector::new(HASH_MODULO, 500).unwrap();

    selector.set_active(RANGE).unwrap();

    assert_eq!(selector.active_name(), RANGE);
}

#[test]
fn test_selector_rejects_unknown_strategy() {
    let selector = StrategySelector::new(HASH_MODULO, 500).unwrap();

    let err = selector.set_active("round-robin").unwrap_err();

    assert_eq!(err, RouterError::InvalidStrategy("round-robin".to_string()));
    // Active strategy unchanged after a rejected switch
    assert_eq!(selector.active_name(), HASH_MODULO);
}

#[test]
fn test_selector_reactivating_active_strategy_is_noop_success() {
    let selector = StrategySelector::new(HASH_MODULO, 500).unwrap();

    selector.set_active(HASH_MODULO).unwrap();

    assert_eq!(selector.active_name(), HASH_MODULO);
}

#[test]
fn test_selector_rejects_unknown_default() {
    assert!(matches!(
        StrategySelector::new("directory", 500),
        Err(RouterError::InvalidStrategy(_))
    ));
}

#[test]
fn test_selector_lists_available_strategies() {
    let selector = StrategySelector::new(HASH_MODULO, 500).unwrap();

    assert_eq!(selector.available_names(), vec![HASH_MODULO, RANGE]);
}
