//! Benchmarks for Meridian routing operations

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meridian::{Comparator, Config, Router, ShardSpec, Strategy};

fn setup_router(shards: usize) -> Arc<Router> {
    let config = Config::builder()
        .shards(
            (0..shards)
                .map(|i| ShardSpec::active(format!("mem://shard-{}", i)))
                .collect(),
        )
        .build();
    let router = Arc::new(Router::in_memory(config).unwrap());
    for key in 0..1000 {
        router.write(key, format!("record-{}", key).into_bytes()).unwrap();
    }
    router
}

fn routing_benchmarks(c: &mut Criterion) {
    let router = setup_router(4);
    let comparator = Comparator::new(Arc::clone(&router));

    c.bench_function("strategy_hash_modulo_resolve", |b| {
        let strategy = Strategy::HashModulo;
        b.iter(|| strategy.resolve(black_box(7919), black_box(4)).unwrap())
    });

    c.bench_function("strategy_range_resolve", |b| {
        let strategy = Strategy::Range { bound: 10_000 };
        b.iter(|| strategy.resolve(black_box(7919), black_box(4)).unwrap())
    });

    c.bench_function("router_read_one", |b| {
        b.iter(|| router.read_one(black_box(617)).unwrap())
    });

    c.bench_function("router_scatter_all", |b| {
        b.iter(|| router.scatter_all().unwrap())
    });

    c.bench_function("comparator_compare_lookup", |b| {
        b.iter(|| comparator.compare_lookup(black_box(617)))
    });
}

criterion_group!(benches, routing_benchmarks);
criterion_main!(benches);
