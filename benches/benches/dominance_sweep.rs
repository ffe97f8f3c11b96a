// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query throughput of the brute-force oracle and each index at quarter, half
//! and full boundary size.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use orthant_harness::{
    BruteForceOracle, DominanceQuery, Fixture, HarnessConfig, bulk_rtree_index, rtree_index,
};

const BOUNDARY_POINTS: usize = 4096;
const QUERY_POINTS: usize = 10_000;

fn fixture() -> Fixture<4> {
    let config = HarnessConfig::default()
        .with_boundary_points(BOUNDARY_POINTS)
        .with_query_points(QUERY_POINTS);
    match Fixture::build(config) {
        Ok(f) => f,
        Err(err) => panic!("fixture generation failed: {err}"),
    }
}

fn sweep_above(index: &dyn DominanceQuery<4>, queries: &[[f64; 4]]) -> usize {
    queries
        .iter()
        .filter(|q| index.count_dominated(q) > 0)
        .count()
}

fn bench_dominance_sweep(c: &mut Criterion) {
    let fx = fixture();
    let queries = fx.queries.points();
    let mut group = c.benchmark_group("dominance_sweep_4d");
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.sample_size(10);

    for m in fx.config.prefixes() {
        let prefix = fx.boundary.prefix(m);

        group.bench_function(format!("point_above_m{m}"), |b| {
            let oracle = BruteForceOracle::new(prefix, m);
            b.iter(|| {
                let above = queries.iter().filter(|q| oracle.is_above(q)).count();
                black_box(above)
            })
        });

        let rtree = rtree_index(prefix);
        group.bench_function(format!("rtree_m{m}"), |b| {
            b.iter(|| black_box(sweep_above(&rtree, queries)))
        });

        let bulk = bulk_rtree_index(prefix);
        group.bench_function(format!("rtree_bulk_m{m}"), |b| {
            b.iter(|| black_box(sweep_above(&bulk, queries)))
        });

        #[cfg(feature = "compare_rstar")]
        {
            let rstar = orthant_harness::RStarIndex::bulk_load("rstar", prefix);
            group.bench_function(format!("rstar_m{m}"), |b| {
                b.iter(|| black_box(sweep_above(&rstar, queries)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_dominance_sweep);
criterion_main!(benches);
