//! Meridian Demo Binary
//!
//! Walks the router through the full scenario an HTTP front-end would
//! drive: seed writes, distribution view, comparative lookup, shard
//! disable/enable, strategy switch.

use std::sync::Arc;

use clap::Parser;
use meridian::{Comparator, Config, Router, ShardSpec, ShardStatus};
use tracing_subscriber::{fmt, EnvFilter};

/// Meridian Demo
#[derive(Parser, Debug)]
#[command(name = "meridian-demo")]
#[command(about = "Shard router walkthrough over in-memory shards")]
#[command(version)]
struct Args {
    /// Number of shards
    #[arg(short, long, default_value = "3")]
    shards: usize,

    /// Number of records to seed
    #[arg(short, long, default_value = "100")]
    records: i64,

    /// Strategy active at startup
    #[arg(long, default_value = "hash-modulo")]
    strategy: String,

    /// Key used for the comparative lookup
    #[arg(short, long, default_value = "42")]
    key: i64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meridian=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("Meridian Demo v{}", meridian::VERSION);

    if let Err(e) = run(&args) {
        tracing::error!("demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> meridian::Result<()> {
    let config = Config::builder()
        .shards(
            (0..args.shards)
                .map(|i| ShardSpec::active(format!("mem://shard-{}", i)))
                .collect(),
        )
        .default_strategy(args.strategy.as_str())
        .range_bound(args.records.max(args.key.saturating_add(1)))
        .build();

    let router = Arc::new(Router::in_memory(config)?);

    // Seed
    for key in 0..args.records {
        router.write(key, format!("record-{}", key).into_bytes())?;
    }
    tracing::info!(records = args.records, "seeded");

    // Distribution view
    for entry in router.distribution()? {
        tracing::info!(
            shard_id = entry.shard_id,
            target = %entry.target,
            status = %entry.status,
            count = entry.count,
            "distribution"
        );
    }

    // Comparative lookup
    let comparator = Comparator::new(Arc::clone(&router));
    let comparison = comparator.compare_lookup(args.key);
    tracing::info!(
        key = args.key,
        sharded_ms = comparison.sharded.elapsed.as_secs_f64() * 1000.0,
        full_scan_ms = comparison.full_scan.elapsed.as_secs_f64() * 1000.0,
        shard_id = ?comparison.sharded.shard_id,
        "comparison"
    );

    // Disable the shard that owns the demo key, show the hard error
    if let Some(shard_id) = comparison.sharded.shard_id {
        router.registry().set_status(shard_id, ShardStatus::Disabled)?;
        match router.read_one(args.key) {
            Err(e) => tracing::info!("read with shard {} disabled: {}", shard_id, e),
            Ok(_) => tracing::warn!("read unexpectedly succeeded with shard disabled"),
        }

        // Scatter still answers for every shard
        for scan in router.scatter_all()? {
            tracing::info!(
                shard_id = scan.shard_id,
                status = %scan.status,
                rows = scan.rows.len(),
                "scatter"
            );
        }

        router.registry().set_status(shard_id, ShardStatus::Active)?;
    }

    // Strategy switch moves no data; a routed read may now miss records
    // written under the old strategy
    let other = if router.strategies().active_name() == "hash-modulo" {
        "range"
    } else {
        "hash-modulo"
    };
    router.strategies().set_active(other)?;
    match router.read_one(args.key) {
        Ok((decision, _)) => tracing::info!(
            shard_id = decision.shard_id,
            strategy = decision.strategy,
            "read after switch"
        ),
        Err(e) => tracing::info!("read after switch to {}: {}", other, e),
    }

    Ok(())
}
