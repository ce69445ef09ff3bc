//! # Asset Registry Benchmarks
//!
//! | Scenario | Ledger | Shape |
//! |----------|--------|-------|
//! | Enroll | in-memory, auto-commit | one batch per asset |
//! | Exchange | in-memory, transactional | ping-pong between two users |
//! | History query | in-memory | prefix scan over N records |
//! | Durable exchange | file | commit plus snapshot rewrite |

use asset_registry::prelude::*;
use asset_registry::test_utils::{args, seeded_service, ALICE, BOB, CAR};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

// ============================================================================
// Enroll
// ============================================================================

fn bench_enroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("enroll");
    let batch = 100u64;
    group.throughput(Throughput::Elements(batch));

    group.bench_function("enroll_100_assets", |b| {
        b.iter_batched(
            || seeded_service(RegistryConfig::default()),
            |(service, mut ledger)| {
                for i in 0..batch {
                    let asset_id = format!("bench-{i}");
                    service
                        .enroll_asset(&mut ledger, "widget", &asset_id, "meta", ALICE)
                        .unwrap();
                }
                black_box(ledger.height())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Exchange
// ============================================================================

fn bench_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange");
    let (service, ledger) = seeded_service(RegistryConfig::default());
    let dispatcher = Dispatcher::new(service);
    let forward = args(&[ALICE, CAR, BOB]);
    let back = args(&[BOB, CAR, ALICE]);

    group.bench_function("exchange_ping_pong", |b| {
        b.iter(|| {
            let there = dispatcher.invoke_in_transaction(&ledger, "assetExchange", &forward);
            let home = dispatcher.invoke_in_transaction(&ledger, "assetExchange", &back);
            black_box(there.is_success() && home.is_success())
        })
    });

    group.finish();
}

// ============================================================================
// History Query
// ============================================================================

/// Ledger where `a1` passed through `transfers` distinct owners in a chain.
fn ledger_with_history(transfers: usize) -> (Dispatcher, InMemoryLedger) {
    let service = RegistryService::default();
    let mut ledger = InMemoryLedger::new();
    for i in 0..=transfers {
        service.register_user(&mut ledger, "user", &format!("u{i}")).unwrap();
    }
    service.enroll_asset(&mut ledger, "car", CAR, "red", "u0").unwrap();
    for i in 0..transfers {
        let (from, to) = (format!("u{i}"), format!("u{}", i + 1));
        service.exchange_asset(&mut ledger, &from, CAR, &to).unwrap();
    }
    (Dispatcher::new(service), ledger)
}

fn bench_history_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_query");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 1000] {
        let (dispatcher, ledger) = ledger_with_history(size);
        group.throughput(Throughput::Elements(size as u64));
        for query_type in ["all", "exchange"] {
            let call = args(&[CAR, query_type]);
            group.bench_with_input(BenchmarkId::new(query_type, size), &call, |b, call| {
                b.iter(|| {
                    let response = dispatcher.invoke_in_transaction(&ledger, "queryAssetHistory", call);
                    black_box(response.payload().map(<[u8]>::len))
                })
            });
        }
    }

    group.finish();
}

// ============================================================================
// Durable Exchange
// ============================================================================

fn bench_file_ledger_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_ledger");
    group.sample_size(20);

    let dir = tempfile::TempDir::new().unwrap();
    let ledger = FileLedger::open(dir.path()).unwrap();
    let dispatcher = Dispatcher::default();
    let mut rng = rand::thread_rng();

    // Pad the snapshot with unrelated users so persistence has real work.
    for i in 0..500 {
        let id = format!("filler-{i}-{}", rng.gen::<u32>());
        dispatcher.invoke_in_transaction(&ledger, "userRegister", &args(&["filler", id.as_str()]));
    }
    dispatcher.invoke_in_transaction(&ledger, "userRegister", &args(&["alice", ALICE]));
    dispatcher.invoke_in_transaction(&ledger, "userRegister", &args(&["bob", BOB]));
    dispatcher.invoke_in_transaction(&ledger, "assetEnroll", &args(&["car", CAR, "red", ALICE]));

    let forward = args(&[ALICE, CAR, BOB]);
    let back = args(&[BOB, CAR, ALICE]);
    group.bench_function("exchange_persisted", |b| {
        b.iter(|| {
            let there = dispatcher.invoke_in_transaction(&ledger, "assetExchange", &forward);
            let home = dispatcher.invoke_in_transaction(&ledger, "assetExchange", &back);
            black_box(there.is_success() && home.is_success())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_enroll,
    bench_exchange,
    bench_history_query,
    bench_file_ledger_exchange,
);
criterion_main!(benches);
