//! Criterion benchmarks for the repair passes and the integrity check.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use fablink_bench::{loop_layout, repaired, scattered_layout};
use fablink_engine::{check_and_repair, connect_endpoints, connect_unused, OverlapScan, RepairConfig};
use fablink_space::IndexKind;

fn bench_unused_pass(c: &mut Criterion) {
    let layout = scattered_layout(2_000, 3);
    for index in [IndexKind::BruteForce, IndexKind::RTree] {
        let config = RepairConfig {
            index,
            ..RepairConfig::default()
        };
        c.bench_function(&format!("unused_pass_2k_{index:?}"), |b| {
            b.iter_batched(
                || layout.clone(),
                |layout| black_box(connect_unused(layout, &config)),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_endpoint_pass(c: &mut Criterion) {
    let layout = loop_layout(8, 20);
    let config = RepairConfig::default();
    c.bench_function("endpoint_pass_loops", |b| {
        b.iter_batched(
            || layout.clone(),
            |layout| black_box(connect_endpoints(layout, &config)),
            BatchSize::LargeInput,
        );
    });
}

/// Pairwise versus canonical-index overlap scan on the same layout.
fn bench_integrity(c: &mut Criterion) {
    let mut layout = repaired(loop_layout(8, 20));
    // Reversed copies of every tenth line give the scan something to find.
    let extra: Vec<_> = layout
        .lines
        .iter()
        .step_by(10)
        .map(|l| {
            let mut r = l.clone();
            std::mem::swap(&mut r.from_address, &mut r.to_address);
            r
        })
        .collect();
    layout.lines.extend(extra);

    for scan in [OverlapScan::Pairwise, OverlapScan::CanonicalIndex] {
        let config = RepairConfig {
            overlap_scan: scan,
            ..RepairConfig::default()
        };
        c.bench_function(&format!("integrity_{scan:?}"), |b| {
            b.iter_batched(
                || layout.clone(),
                |layout| black_box(check_and_repair(layout, &config)),
                BatchSize::LargeInput,
            );
        });
    }
}

criterion_group!(benches, bench_unused_pass, bench_endpoint_pass, bench_integrity);
criterion_main!(benches);
