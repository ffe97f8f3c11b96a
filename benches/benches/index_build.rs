// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use orthant_harness::{Fixture, HarnessConfig};
use orthant_index::{Aabb, Index};

fn boundary_points(n: usize) -> Vec<[f64; 4]> {
    let config = HarnessConfig::default()
        .with_boundary_points(n)
        .with_query_points(0);
    match Fixture::<4>::build(config) {
        Ok(f) => f.boundary.points().to_vec(),
        Err(err) => panic!("boundary generation failed: {err}"),
    }
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build_4d");
    for &n in &[1024_usize, 2048, 4096] {
        let points = boundary_points(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("rtree_insert_n{n}"), |b| {
            b.iter_batched(
                Index::<f64, u32, 4>::with_rtree,
                |mut idx| {
                    for (p, id) in points.iter().zip(0_u32..) {
                        let _ = idx.insert_point(*p, id);
                    }
                    black_box(idx.count_below([0.5; 4]))
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rtree_bulk_n{n}"), |b| {
            b.iter_batched(
                || {
                    points
                        .iter()
                        .zip(0_u32..)
                        .map(|(p, id)| (Aabb::from_point(*p), id))
                        .collect::<Vec<_>>()
                },
                |entries| {
                    let idx = Index::<f64, u32, 4>::with_rtree_bulk(&entries);
                    black_box(idx.count_below([0.5; 4]))
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_build);
criterion_main!(benches);
