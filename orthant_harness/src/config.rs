// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run parameters for a consistency sweep.

use crate::error::{HarnessError, Result};

/// Squeeze spread for four-dimensional boundaries.
pub const SQUEEZE_SPREAD_4D: f64 = 1.407777778;

/// Squeeze spread for the high-dimensional (25D) preset.
pub const SQUEEZE_SPREAD_25D: f64 = 10.87;

/// Parameters for boundary generation and the query sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct HarnessConfig {
    /// Number of pairwise-incomparable boundary points to generate.
    /// Default: 4096
    pub boundary_points: usize,

    /// Number of random query points in the sweep.
    /// Default: 500 000
    pub query_points: usize,

    /// Each boundary draw is normalized to sum `1 + squeeze_spread * U[0,1]`
    /// before clamping to the unit cube.
    /// Default: [`SQUEEZE_SPREAD_4D`]
    pub squeeze_spread: f64,

    /// RNG seed; boundary and query sets are deterministic for a given seed.
    /// Default: 0x5EED
    pub seed: u64,

    /// Per-point cap on rejection-sampling attempts. `None` never gives up.
    /// Default: `None`
    pub max_attempts: Option<u64>,

    /// Boundary point checked against the half-size index.
    /// Default: 10
    pub known_point: usize,

    /// How many leading query points are asked twice to check idempotence.
    /// Default: 64
    pub idempotence_probes: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            boundary_points: 4096,
            query_points: 500_000,
            squeeze_spread: SQUEEZE_SPREAD_4D,
            seed: 0x5EED,
            max_attempts: None,
            known_point: 10,
            idempotence_probes: 64,
        }
    }
}

impl HarnessConfig {
    /// Defaults tuned for 25-dimensional boundaries.
    pub fn high_dimensional() -> Self {
        Self {
            squeeze_spread: SQUEEZE_SPREAD_25D,
            ..Self::default()
        }
    }

    /// Set the boundary size.
    pub fn with_boundary_points(mut self, n: usize) -> Self {
        self.boundary_points = n;
        self
    }

    /// Set the query population size.
    pub fn with_query_points(mut self, n: usize) -> Self {
        self.query_points = n;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the squeeze spread.
    pub fn with_squeeze_spread(mut self, spread: f64) -> Self {
        self.squeeze_spread = spread;
        self
    }

    /// Cap rejection-sampling attempts per boundary point.
    pub fn with_max_attempts(mut self, cap: Option<u64>) -> Self {
        self.max_attempts = cap;
        self
    }

    /// Choose the known boundary point.
    pub fn with_known_point(mut self, k: usize) -> Self {
        self.known_point = k;
        self
    }

    /// Boundary prefix lengths indexed by a standard fixture: quarter, half, full.
    pub fn prefixes(&self) -> [usize; 3] {
        let n = self.boundary_points;
        [n / 4, n / 2, n]
    }

    /// Reject parameters the sweep cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.boundary_points == 0 {
            return Err(HarnessError::InvalidConfig(
                "boundary_points must be positive".into(),
            ));
        }
        if self.known_point >= self.boundary_points / 2 {
            return Err(HarnessError::InvalidConfig(format!(
                "known_point {} must lie in the half prefix of {} points",
                self.known_point,
                self.boundary_points / 2
            )));
        }
        check_spread(self.squeeze_spread)?;
        if self.max_attempts == Some(0) {
            return Err(HarnessError::InvalidConfig(
                "max_attempts must allow at least one attempt".into(),
            ));
        }
        Ok(())
    }
}

/// Reject a squeeze spread that would push draws outside the unit cube.
///
/// A negative spread can scale coordinates below zero, and NaN clamps every
/// coordinate to 1 so no two draws are ever incomparable.
pub fn check_spread(spread: f64) -> Result<()> {
    if !spread.is_finite() || spread < 0.0 {
        return Err(HarnessError::InvalidConfig(format!(
            "squeeze_spread must be finite and non-negative, got {spread}"
        )));
    }
    Ok(())
}
