// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-validation of indexes against the dominance oracle.

use orthant_index::{Backend, FlatVec, Index, IndexGeneric, RTree};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::boundary::{BoundarySet, QuerySet};
use crate::config::HarnessConfig;
use crate::error::{Disagreement, HarnessError, Result};
use crate::oracle::{BruteForceOracle, point_above};
use crate::query::{DominanceQuery, NamedIndex};

/// Outcome of a sweep over one index. Diagnostic only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepReport {
    /// Name of the index.
    pub index_name: String,
    /// Boundary prefix length the index was built over.
    pub prefix: usize,
    /// Query points checked.
    pub checked: usize,
    /// Query points lying above the boundary prefix.
    pub above: usize,
    /// Query points lying below it.
    pub below: usize,
}

/// Checks indexes built over boundary prefixes against [`point_above`].
#[derive(Copy, Clone, Debug)]
pub struct ConsistencyHarness<'a, const D: usize> {
    boundary: &'a BoundarySet<D>,
    queries: &'a QuerySet<D>,
    idempotence_probes: usize,
}

impl<'a, const D: usize> ConsistencyHarness<'a, D> {
    /// Check against `boundary` using the points of `queries`.
    pub fn new(boundary: &'a BoundarySet<D>, queries: &'a QuerySet<D>) -> Self {
        Self {
            boundary,
            queries,
            idempotence_probes: 0,
        }
    }

    /// Ask the first `n` query points twice and require identical counts.
    pub fn with_idempotence_probes(mut self, n: usize) -> Self {
        self.idempotence_probes = n;
        self
    }

    /// The prefix an index covers, taken from its size.
    fn prefix_of(&self, index: &dyn DominanceQuery<D>) -> Result<usize> {
        let m = index.len();
        if m > self.boundary.len() {
            return Err(HarnessError::InvalidConfig(format!(
                "{} holds {m} points but the boundary has only {}",
                index.name(),
                self.boundary.len()
            )));
        }
        Ok(m)
    }

    /// Boundary point `k` used as the upper bound must dominate exactly itself,
    /// both according to the oracle and to `index`.
    pub fn check_known_point(&self, index: &dyn DominanceQuery<D>, k: usize) -> Result<()> {
        let m = self.prefix_of(index)?;
        let Some(p) = self.boundary.prefix(m).get(k) else {
            return Err(HarnessError::InvalidConfig(format!(
                "known point {k} is outside the {m}-point prefix of {}",
                index.name()
            )));
        };
        let oracle = BruteForceOracle::new(self.boundary.points(), m);
        let expected = oracle.count_dominated(p);
        if !point_above(self.boundary.points(), p, m) || expected != 1 {
            return Err(HarnessError::KnownPointMismatch {
                index_name: oracle.name().to_owned(),
                point: k,
                hits: expected,
            });
        }
        let hits = index.count_dominated(p);
        if hits != 1 {
            return Err(HarnessError::KnownPointMismatch {
                index_name: index.name().to_owned(),
                point: k,
                hits,
            });
        }
        Ok(())
    }

    /// Compare `index` with the oracle for every query point.
    ///
    /// Stops at the first disagreement.
    pub fn sweep(&self, index: &dyn DominanceQuery<D>) -> Result<SweepReport> {
        let m = self.prefix_of(index)?;
        let refs = self.boundary.points();
        let mut report = SweepReport {
            index_name: index.name().to_owned(),
            prefix: m,
            checked: 0,
            above: 0,
            below: 0,
        };
        debug!(index = index.name(), prefix = m, queries = self.queries.len(), "sweep started");
        for (i, q) in self.queries.points().iter().enumerate() {
            let above_slow = point_above(refs, q, m);
            let hits = index.count_dominated(q);
            let direction = match (hits > 0, above_slow) {
                (true, false) => Some(Disagreement::IndexFalsePositive),
                (false, true) => Some(Disagreement::IndexFalseNegative),
                _ => None,
            };
            if let Some(direction) = direction {
                return Err(HarnessError::ConsistencyViolation {
                    index_name: report.index_name,
                    prefix: m,
                    query: i,
                    point: q.to_vec(),
                    direction,
                });
            }
            if i < self.idempotence_probes {
                let again = index.count_dominated(q);
                if again != hits {
                    return Err(HarnessError::NonIdempotent {
                        index_name: report.index_name,
                        query: i,
                        first: hits,
                        second: again,
                    });
                }
            }
            report.checked += 1;
            if above_slow {
                report.above += 1;
            } else {
                report.below += 1;
            }
        }
        info!(
            index = %report.index_name,
            prefix = m,
            below_count = report.below,
            above_count = report.above,
            "sweep finished"
        );
        Ok(report)
    }

    /// Sweep every index in turn, running the known-point check on those
    /// built over the half prefix. Stops at the first error.
    pub fn run(
        &self,
        indexes: &[Box<dyn DominanceQuery<D> + '_>],
        known_point: usize,
    ) -> Result<Vec<SweepReport>> {
        let half = self.boundary.len() / 2;
        info!(
            indexes = indexes.len(),
            queries = self.queries.len(),
            "Input objects to test"
        );
        let mut reports = Vec::with_capacity(indexes.len());
        for index in indexes {
            if index.len() == half {
                self.check_known_point(index.as_ref(), known_point)?;
            }
            reports.push(self.sweep(index.as_ref())?);
        }
        Ok(reports)
    }
}

fn build_incremental<B, const D: usize>(
    name: String,
    mut index: IndexGeneric<f64, u32, B, D>,
    points: &[[f64; D]],
) -> NamedIndex<u32, B, D>
where
    B: Backend<f64, D>,
{
    index.reserve(points.len());
    for (p, id) in points.iter().zip(0_u32..) {
        index.insert_point(*p, id);
    }
    debug!(index = %name, points = points.len(), "index built");
    NamedIndex::new(name, index)
}

/// Linear-scan index over `points`, ids are positions.
pub fn flat_index<const D: usize>(points: &[[f64; D]]) -> NamedIndex<u32, FlatVec<f64, D>, D> {
    build_incremental(format!("flatvec_{}", points.len()), Index::new(), points)
}

/// R-tree built by inserting `points` one at a time.
pub fn rtree_index<const D: usize>(points: &[[f64; D]]) -> NamedIndex<u32, RTree<f64, D>, D> {
    build_incremental(format!("rtree_{}", points.len()), Index::with_rtree(), points)
}

/// STR bulk-loaded R-tree over `points`.
pub fn bulk_rtree_index<const D: usize>(points: &[[f64; D]]) -> NamedIndex<u32, RTree<f64, D>, D> {
    let entries: Vec<_> = points
        .iter()
        .zip(0_u32..)
        .map(|(p, id)| (orthant_index::Aabb::from_point(*p), id))
        .collect();
    let name = format!("rtree_bulk_{}", points.len());
    debug!(index = %name, points = points.len(), "index built");
    NamedIndex::new(name, Index::with_rtree_bulk(&entries))
}

/// Owned boundary and query sets for one run.
#[derive(Clone, Debug)]
pub struct Fixture<const D: usize> {
    /// Parameters the fixture was built with.
    pub config: HarnessConfig,
    /// Generated boundary.
    pub boundary: BoundarySet<D>,
    /// Generated query points.
    pub queries: QuerySet<D>,
}

impl<const D: usize> Fixture<D> {
    /// Validate `config`, then generate the boundary and query sets from its seed.
    pub fn build(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let boundary = BoundarySet::generate(
            &mut rng,
            config.boundary_points,
            config.squeeze_spread,
            config.max_attempts,
        )?;
        let queries = QuerySet::generate(&mut rng, config.query_points);
        Ok(Self {
            config,
            boundary,
            queries,
        })
    }

    /// A harness over this fixture's sets.
    pub fn harness(&self) -> ConsistencyHarness<'_, D> {
        ConsistencyHarness::new(&self.boundary, &self.queries)
            .with_idempotence_probes(self.config.idempotence_probes)
    }

    /// Incremental and bulk R-trees over the quarter, half and full prefixes.
    pub fn native_indexes(&self) -> Vec<Box<dyn DominanceQuery<D>>> {
        let mut out: Vec<Box<dyn DominanceQuery<D>>> = Vec::new();
        for m in self.config.prefixes() {
            let prefix = self.boundary.prefix(m);
            out.push(Box::new(rtree_index(prefix)));
            out.push(Box::new(bulk_rtree_index(prefix)));
        }
        out
    }

    /// Check `indexes` against the oracle.
    pub fn check(&self, indexes: &[Box<dyn DominanceQuery<D> + '_>]) -> Result<Vec<SweepReport>> {
        self.harness().run(indexes, self.config.known_point)
    }
}

#[cfg(feature = "compare_rstar")]
impl<const D: usize> Fixture<D>
where
    [f64; D]: rstar::Point<Scalar = f64>,
{
    /// `rstar` trees over the quarter, half and full prefixes.
    pub fn rstar_indexes(&self) -> Vec<Box<dyn DominanceQuery<D>>> {
        self.config
            .prefixes()
            .into_iter()
            .map(|m| {
                let idx = crate::external::RStarIndex::bulk_load(format!("rstar_{m}"), self.boundary.prefix(m));
                Box::new(idx) as Box<dyn DominanceQuery<D>>
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 4] = [0.1, 0.1, 0.1, 0.1];
    const B: [f64; 4] = [0.5, 0.05, 0.05, 0.05];

    fn small_config() -> HarnessConfig {
        HarnessConfig::default()
            .with_boundary_points(256)
            .with_query_points(20_000)
            .with_seed(0xC0FFEE)
    }

    /// Pretends every query hits.
    struct AlwaysAbove;

    impl DominanceQuery<4> for AlwaysAbove {
        fn name(&self) -> &str {
            "always_above"
        }
        fn len(&self) -> usize {
            1
        }
        fn count_dominated(&self, _: &[f64; 4]) -> usize {
            1
        }
    }

    /// Returns a larger count on every call.
    struct Flaky(core::cell::Cell<usize>);

    impl DominanceQuery<4> for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }
        fn len(&self) -> usize {
            2
        }
        fn count_dominated(&self, _: &[f64; 4]) -> usize {
            let n = self.0.get() + 1;
            self.0.set(n);
            n
        }
    }

    #[test]
    fn two_point_scenario_agrees_everywhere() {
        let boundary = BoundarySet::try_from_points(vec![A, B]).unwrap();
        let queries = QuerySet::from_points(vec![[0.6; 4], [0.05; 4]]);
        let harness = ConsistencyHarness::new(&boundary, &queries);
        for index in [
            Box::new(flat_index(boundary.points())) as Box<dyn DominanceQuery<4>>,
            Box::new(rtree_index(boundary.points())),
            Box::new(bulk_rtree_index(boundary.points())),
        ] {
            let report = harness.sweep(index.as_ref()).unwrap();
            assert_eq!((report.above, report.below), (1, 1), "{}", report.index_name);
        }
    }

    #[test]
    fn empty_index_is_below_for_every_query() {
        let fixture = Fixture::<4>::build(small_config().with_query_points(2_000)).unwrap();
        let harness = fixture.harness();
        let report = harness.sweep(&rtree_index(fixture.boundary.prefix(0))).unwrap();
        assert_eq!(report.prefix, 0);
        assert_eq!(report.above, 0);
        assert_eq!(report.below, 2_000);
    }

    #[test]
    fn random_sweep_agrees_for_all_backends() {
        let fixture = Fixture::<4>::build(small_config()).unwrap();
        let mut indexes = fixture.native_indexes();
        indexes.push(Box::new(flat_index(fixture.boundary.prefix(128))));
        let reports = fixture.check(&indexes).unwrap();
        assert_eq!(reports.len(), 7);
        for r in &reports {
            assert_eq!(r.checked, 20_000);
            assert_eq!(r.above + r.below, r.checked);
        }
        // Larger prefixes can only cover more of the cube.
        assert!(reports[0].above <= reports[2].above && reports[2].above <= reports[4].above);
        assert!(reports[4].above > 0 && reports[4].below > 0);
    }

    #[test]
    fn known_point_hits_exactly_itself() {
        let fixture = Fixture::<4>::build(small_config().with_query_points(0)).unwrap();
        let harness = fixture.harness();
        let half = fixture.boundary.prefix(128);
        harness.check_known_point(&rtree_index(half), 10).unwrap();
        harness.check_known_point(&bulk_rtree_index(half), 10).unwrap();
        let err = harness.check_known_point(&rtree_index(half), 200).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn half_index_with_wrong_known_point_count_fails_run() {
        const C: [f64; 4] = [0.05, 0.5, 0.05, 0.05];
        const E: [f64; 4] = [0.05, 0.05, 0.5, 0.05];
        let boundary = BoundarySet::try_from_points(vec![A, B, C, E]).unwrap();
        let queries = QuerySet::from_points(vec![[0.6; 4]]);
        let harness = ConsistencyHarness::new(&boundary, &queries);

        // Both hold two points, so both get the known-point check on boundary[0].
        let duplicated: Vec<Box<dyn DominanceQuery<4>>> = vec![Box::new(flat_index(&[A, A]))];
        let err = harness.run(&duplicated, 0).unwrap_err();
        assert!(
            matches!(err, HarnessError::KnownPointMismatch { point: 0, hits: 2, .. }),
            "{err}"
        );

        let missing: Vec<Box<dyn DominanceQuery<4>>> = vec![Box::new(flat_index(&[B, [0.9; 4]]))];
        let err = harness.run(&missing, 0).unwrap_err();
        match err {
            HarnessError::KnownPointMismatch { index_name, hits, .. } => {
                assert_eq!(index_name, "flatvec_2");
                assert_eq!(hits, 0);
            }
            other => panic!("unexpected {other}"),
        }

        let good: Vec<Box<dyn DominanceQuery<4>>> = vec![Box::new(flat_index(&[A, B]))];
        assert_eq!(harness.run(&good, 0).unwrap().len(), 1);
    }

    #[test]
    fn false_positive_is_fatal_and_names_the_query() {
        let boundary = BoundarySet::try_from_points(vec![A, B]).unwrap();
        let queries = QuerySet::from_points(vec![[0.6; 4], [0.05; 4], [0.01; 4]]);
        let err = ConsistencyHarness::new(&boundary, &queries)
            .sweep(&AlwaysAbove)
            .unwrap_err();
        match err {
            HarnessError::ConsistencyViolation {
                index_name,
                prefix,
                query,
                direction,
                ..
            } => {
                assert_eq!(index_name, "always_above");
                assert_eq!(prefix, 1);
                assert_eq!(query, 1);
                assert_eq!(direction, Disagreement::IndexFalsePositive);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn false_negative_is_reported() {
        let boundary = BoundarySet::try_from_points(vec![A, B]).unwrap();
        let queries = QuerySet::from_points(vec![[0.6; 4]]);
        // An index over the wrong point, compared with the oracle over a one-point prefix.
        let harness = ConsistencyHarness::new(&boundary, &queries);
        assert!(harness.sweep(&flat_index::<4>(&[])).is_ok());
        let err = harness.sweep(&flat_index(&[[0.9; 4]])).unwrap_err();
        assert!(
            matches!(
                err,
                HarnessError::ConsistencyViolation {
                    direction: Disagreement::IndexFalseNegative,
                    query: 0,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn repeated_queries_are_idempotent() {
        let fixture = Fixture::<4>::build(small_config().with_query_points(500)).unwrap();
        let harness = fixture.harness().with_idempotence_probes(500);
        let idx = bulk_rtree_index(fixture.boundary.points());
        harness.sweep(&idx).unwrap();
        let q = fixture.queries.points()[0];
        assert_eq!(idx.count_dominated(&q), idx.count_dominated(&q));
    }

    #[test]
    fn oversized_index_is_rejected() {
        let boundary = BoundarySet::try_from_points(vec![A]).unwrap();
        let queries = QuerySet::from_points(vec![[0.6; 4]]);
        let err = ConsistencyHarness::new(&boundary, &queries)
            .sweep(&flat_index(&[A, B]))
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn changing_counts_fail_idempotence_probe() {
        let boundary = BoundarySet::try_from_points(vec![A, B]).unwrap();
        let queries = QuerySet::from_points(vec![[0.6; 4], [0.7; 4]]);
        let harness = ConsistencyHarness::new(&boundary, &queries);
        // Counts stay positive, so without probes the drift goes unnoticed.
        let report = harness.sweep(&Flaky(core::cell::Cell::new(0))).unwrap();
        assert_eq!(report.above, 2);
        let err = harness
            .with_idempotence_probes(1)
            .sweep(&Flaky(core::cell::Cell::new(0)))
            .unwrap_err();
        assert!(
            matches!(
                err,
                HarnessError::NonIdempotent {
                    query: 0,
                    first: 1,
                    second: 2,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[cfg(feature = "compare_rstar")]
    #[test]
    fn rstar_agrees_with_oracle() {
        let fixture = Fixture::<4>::build(small_config().with_query_points(5_000)).unwrap();
        let reports = fixture.check(&fixture.rstar_indexes()).unwrap();
        assert_eq!(reports.len(), 3);
        let native = fixture.check(&fixture.native_indexes()).unwrap();
        assert_eq!(reports[2].above, native[4].above);
    }

    #[test]
    fn high_dimensional_sweep() {
        let config = HarnessConfig::high_dimensional()
            .with_boundary_points(64)
            .with_query_points(2_000)
            .with_max_attempts(Some(100_000));
        let fixture = Fixture::<25>::build(config).unwrap();
        let reports = fixture.check(&fixture.native_indexes()).unwrap();
        assert_eq!(reports.len(), 6);
    }
}
