// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brute-force dominance oracle.
//!
//! Everything here is a linear scan on purpose: it is the reference the
//! indexes are checked against, not a query path.

use crate::query::DominanceQuery;

/// `a <= b` in every coordinate.
#[inline]
pub fn leq<const D: usize>(a: &[f64; D], b: &[f64; D]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

/// Neither `p <= q` nor `q <= p` for any `q` in `set`.
pub fn incomparable<const D: usize>(set: &[[f64; D]], p: &[f64; D]) -> bool {
    set.iter().all(|q| !leq(q, p) && !leq(p, q))
}

/// Whether some point among the first `m` of `refs` lies below `q`.
///
/// # Panics
///
/// If `m > refs.len()`.
pub fn point_above<const D: usize>(refs: &[[f64; D]], q: &[f64; D], m: usize) -> bool {
    refs[..m].iter().any(|r| leq(r, q))
}

/// The oracle as a [`DominanceQuery`] over a borrowed prefix of a boundary set.
#[derive(Copy, Clone, Debug)]
pub struct BruteForceOracle<'a, const D: usize> {
    refs: &'a [[f64; D]],
}

impl<'a, const D: usize> BruteForceOracle<'a, D> {
    /// Scan the first `m` points of `refs`.
    ///
    /// # Panics
    ///
    /// If `m > refs.len()`.
    pub fn new(refs: &'a [[f64; D]], m: usize) -> Self {
        Self { refs: &refs[..m] }
    }

    /// Short-circuiting form of [`DominanceQuery::count_dominated`]` > 0`.
    pub fn is_above(&self, q: &[f64; D]) -> bool {
        point_above(self.refs, q, self.refs.len())
    }
}

impl<const D: usize> DominanceQuery<D> for BruteForceOracle<'_, D> {
    fn name(&self) -> &str {
        "point_above"
    }

    fn len(&self) -> usize {
        self.refs.len()
    }

    fn count_dominated(&self, upper: &[f64; D]) -> usize {
        self.refs.iter().filter(|r| leq(r, upper)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 4] = [0.1, 0.1, 0.1, 0.1];
    const B: [f64; 4] = [0.5, 0.05, 0.05, 0.05];

    #[test]
    fn leq_is_componentwise_and_reflexive() {
        assert!(leq(&A, &A));
        assert!(leq(&A, &[0.1, 0.2, 0.1, 0.1]));
        assert!(!leq(&A, &[0.1, 0.2, 0.1, 0.09]));
        assert!(!leq(&A, &B) && !leq(&B, &A));
    }

    #[test]
    fn incomparable_rejects_equal_and_dominating_points() {
        let set = [A, B];
        assert!(incomparable(&set, &[0.05, 0.5, 0.05, 0.05]));
        assert!(!incomparable(&set, &A));
        assert!(!incomparable(&set, &[0.6; 4]));
        assert!(!incomparable(&set, &[0.01; 4]));
        assert!(incomparable::<4>(&[], &A));
    }

    #[test]
    fn two_point_scenario() {
        let set = [A, B];
        assert!(point_above(&set, &[0.6; 4], 2));
        assert!(!point_above(&set, &[0.05; 4], 2));
        // Only the prefix is scanned.
        assert!(!point_above(&set, &[0.5, 0.06, 0.06, 0.06], 1));
        assert!(point_above(&set, &[0.5, 0.06, 0.06, 0.06], 2));

        let oracle = BruteForceOracle::new(&set, 2);
        assert_eq!(oracle.count_dominated(&[0.6; 4]), 2);
        assert_eq!(oracle.count_dominated(&[0.05; 4]), 0);
        assert!(oracle.is_above(&[0.6; 4]));
    }

    #[test]
    fn empty_prefix_is_never_above() {
        let set = [A, B];
        let oracle = BruteForceOracle::new(&set, 0);
        assert!(oracle.is_empty());
        assert!(!point_above(&set, &[1.0; 4], 0));
        assert_eq!(oracle.count_dominated(&[1.0; 4]), 0);
    }
}
