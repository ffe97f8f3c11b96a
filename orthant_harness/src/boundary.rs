// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary and query point generation.

use rand::Rng;
use tracing::{info, warn};

use crate::config::check_spread;
use crate::error::{HarnessError, Result};
use crate::oracle::{incomparable, leq};

/// Attempts on a single point between slow-progress warnings.
const STALL_WARN_EVERY: u64 = 100_000;

/// Points in `[0, 1]^D` that are pairwise incomparable under dominance.
///
/// The invariant is established by [`BoundarySet::generate`] (or checked by
/// [`BoundarySet::try_from_points`]) and never re-checked afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundarySet<const D: usize> {
    points: Vec<[f64; D]>,
}

impl<const D: usize> BoundarySet<D> {
    /// Rejection-sample `n` pairwise-incomparable points.
    ///
    /// Each candidate is drawn uniformly from the unit cube, rescaled to sum to
    /// a random `1 + spread * U[0,1]`, and clamped to 1 per axis. It is kept
    /// only if it is incomparable with every point accepted so far.
    ///
    /// With `max_attempts == None` the loop for a single point is unbounded: if
    /// `n` is large for the density of incomparable configurations in `D`
    /// dimensions, generation may not terminate. With `Some(cap)` a point that
    /// needs more than `cap` draws fails with [`HarnessError::GenerationStall`].
    ///
    /// A negative or non-finite `spread` fails with [`HarnessError::InvalidConfig`].
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        n: usize,
        spread: f64,
        max_attempts: Option<u64>,
    ) -> Result<Self> {
        check_spread(spread)?;
        info!(points = n, dims = D, "Generating border");
        let mut points: Vec<[f64; D]> = Vec::with_capacity(n);
        for i in 0..n {
            let mut attempts = 0_u64;
            let accepted = loop {
                if max_attempts.is_some_and(|cap| attempts >= cap) {
                    return Err(HarnessError::GenerationStall { index: i, attempts });
                }
                attempts += 1;
                if attempts % STALL_WARN_EVERY == 0 {
                    warn!(index = i, attempts, "border generation is slow to find an incomparable point");
                }
                if let Some(p) = draw_candidate(rng, spread)
                    && incomparable(&points, &p)
                {
                    break p;
                }
            };
            points.push(accepted);
        }
        info!(points = points.len(), "Border created");
        Ok(Self { points })
    }

    /// Adopt `points` as a boundary set after checking pairwise incomparability.
    pub fn try_from_points(points: Vec<[f64; D]>) -> Result<Self> {
        let set = Self { points };
        match set.first_comparable_pair() {
            None => Ok(set),
            Some((i, j)) => Err(HarnessError::InvalidConfig(format!(
                "boundary points {i} and {j} are comparable"
            ))),
        }
    }

    /// First pair `(i, j)`, `i < j`, where one point dominates-or-equals the other.
    ///
    /// Quadratic; meant for tests and fixture validation.
    pub fn first_comparable_pair(&self) -> Option<(usize, usize)> {
        for (j, q) in self.points.iter().enumerate() {
            for (i, p) in self.points[..j].iter().enumerate() {
                if leq(p, q) || leq(q, p) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// All points in generation order.
    pub fn points(&self) -> &[[f64; D]] {
        &self.points
    }

    /// The first `m` points.
    ///
    /// # Panics
    ///
    /// If `m > self.len()`.
    pub fn prefix(&self, m: usize) -> &[[f64; D]] {
        &self.points[..m]
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One squeeze-normalized draw, or `None` when the raw draw sums to zero.
pub fn draw_candidate<R: Rng + ?Sized, const D: usize>(rng: &mut R, spread: f64) -> Option<[f64; D]> {
    let raw: [f64; D] = core::array::from_fn(|_| rng.random::<f64>());
    let sum: f64 = raw.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    let squeeze = 1.0 + spread * rng.random::<f64>();
    Some(raw.map(|x| (squeeze * x / sum).min(1.0)))
}

/// Uniform random query points, generated once and shared read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySet<const D: usize> {
    points: Vec<[f64; D]>,
}

impl<const D: usize> QuerySet<D> {
    /// Draw `m` points uniformly from `[0, 1]^D`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, m: usize) -> Self {
        let points = (0..m)
            .map(|_| core::array::from_fn(|_| rng.random::<f64>()))
            .collect();
        Self { points }
    }

    /// Use explicit query points.
    pub fn from_points(points: Vec<[f64; D]>) -> Self {
        Self { points }
    }

    /// All query points.
    pub fn points(&self) -> &[[f64; D]] {
        &self.points
    }

    /// Number of query points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no query points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
