use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use points_ledger::LedgerManager;
use std::hint::black_box;
use tokio::runtime::Runtime;

const PAYERS: [&str; 4] = ["DANNON", "UNILEVER", "MILLER COORS", "KRAFT"];

fn timestamp(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 11, 2, 0, 0, 0).unwrap() + Duration::minutes(minute)
}

/// Helper to create a ledger whose single user holds `n_lots` lots of 10 points
fn setup_ledger(rt: &Runtime, n_lots: usize) -> LedgerManager {
    rt.block_on(async {
        let ledger = LedgerManager::new();
        ledger.create_account("user").await.unwrap();
        for i in 0..n_lots {
            // Alternate old/new timestamps so insertion order differs from spend order
            let minute = if i % 2 == 0 { i as i64 } else { -(i as i64) };
            ledger
                .record_earn("user", PAYERS[i % PAYERS.len()], 10, timestamp(minute))
                .await
                .unwrap();
        }
        ledger
    })
}

/// Benchmark recording an earn transaction into pools of various sizes
fn bench_record_earn(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("record_earn");

    for n_lots in [10, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n_lots), &n_lots, |b, &n| {
            b.iter_batched(
                || setup_ledger(&rt, n),
                |ledger| {
                    rt.block_on(ledger.record_earn(
                        "user",
                        "DANNON",
                        black_box(10),
                        timestamp(0),
                    ))
                    .unwrap()
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark a spend touching a single partially consumed lot
fn bench_spend_single_lot(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("spend_single_lot");

    for n_lots in [10, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n_lots), &n_lots, |b, &n| {
            b.iter_batched(
                || setup_ledger(&rt, n),
                |ledger| rt.block_on(ledger.spend("user", black_box(5))).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark a spend that drains many lots
fn bench_spend_many_lots(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("spend_100_of_10000_lots", |b| {
        b.iter_batched(
            || setup_ledger(&rt, 10_000),
            |ledger| rt.block_on(ledger.spend("user", black_box(1_000))).unwrap(),
            criterion::BatchSize::LargeInput,
        );
    });
}

/// Benchmark the balance queries
fn bench_queries(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let ledger = setup_ledger(&rt, 10_000);

    c.bench_function("payer_balances", |b| {
        b.iter(|| rt.block_on(ledger.payer_balances(black_box("user"))).unwrap());
    });

    c.bench_function("total_points", |b| {
        b.iter(|| rt.block_on(ledger.total_points(black_box("user"))).unwrap());
    });
}

criterion_group!(
    benches,
    bench_record_earn,
    bench_spend_single_lot,
    bench_spend_many_lots,
    bench_queries
);
criterion_main!(benches);
