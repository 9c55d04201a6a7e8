//! Performance benchmarks for the Payroll Engine.
//!
//! Covers the single-record deduction path, parallel cycle scans at several
//! sizes, pay run aggregation, and one HTTP round trip.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::batch::BatchAggregator;
use payroll_engine::calculation::DeductionCalculator;
use payroll_engine::config::{ConfigLoader, RuleSet};
use payroll_engine::models::CompensationRecord;
use payroll_engine::pipeline::scan_cycle;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Builds a cycle with a spread of salaries across every tax slab.
fn create_cycle(size: usize) -> Vec<CompensationRecord> {
    (0..size)
        .map(|i| {
            let basic = Decimal::from(8_000 + (i as i64 % 200) * 1_000);
            let gross = basic + Decimal::from(5_000 + (i as i64 % 7) * 2_500);
            CompensationRecord {
                hra: basic / Decimal::from(3),
                bank_account: Some(format!("ACC-{:05}", i)),
                tax_id: (i % 11 != 0).then(|| format!("TAX-{:05}", i)),
                attendance_gap_days: (i % 13 == 0) as u32,
                ..CompensationRecord::new(format!("emp_{:05}", i), basic, gross)
            }
        })
        .collect()
}

/// Benchmark: Deductions for one record, with and without the audit trace.
fn bench_single_record(c: &mut Criterion) {
    let rules = RuleSet::default();
    let calculator = DeductionCalculator::new(&rules);
    let record = CompensationRecord::new("emp_bench", Decimal::from(50_000), Decimal::from(60_000));

    c.bench_function("compute_single", |b| {
        b.iter(|| black_box(calculator.compute(black_box(&record))))
    });

    c.bench_function("compute_with_trace_single", |b| {
        b.iter(|| black_box(calculator.compute_with_trace(black_box(&record))))
    });
}

/// Benchmark: Parallel scans at increasing cycle sizes.
fn bench_scan_scaling(c: &mut Criterion) {
    let rules = RuleSet::default();
    let mut group = c.benchmark_group("scan_cycle");

    for size in [100usize, 1_000, 10_000].iter() {
        let records = create_cycle(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("records", size), size, |b, _| {
            b.iter(|| black_box(scan_cycle(&records, &rules)))
        });
    }

    group.finish();
}

/// Benchmark: Cycle totals and batch creation.
fn bench_pay_run(c: &mut Criterion) {
    let rules = RuleSet::default();
    let aggregator = BatchAggregator::new(&rules);
    let records = create_cycle(10_000);

    let mut group = c.benchmark_group("pay_run");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.sample_size(20);

    group.bench_function("create_pay_run_10000", |b| {
        b.iter(|| black_box(aggregator.create_pay_run("bench-cycle", &records)))
    });

    group.finish();
}

/// Benchmark: One `/deductions` request through the router.
fn bench_http_deductions(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/rules.yaml").expect("Failed to load config");
    let router = create_router(AppState::new(config));
    let body = serde_json::json!({ "records": create_cycle(100) }).to_string();

    c.bench_function("http_deductions_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/deductions")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_single_record,
    bench_scan_scaling,
    bench_pay_run,
    bench_http_deductions,
);
criterion_main!(benches);
