// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orthant Harness: checks N-dimensional spatial indexes against a brute-force
//! dominance oracle.
//!
//! A run has three steps:
//!
//! 1. Generate a [`BoundarySet`]: points in `[0, 1]^D` that are pairwise
//!    incomparable (no point lies below another in every coordinate).
//! 2. Build indexes over prefixes of the boundary. The [`orthant_index`]
//!    backends are included, plus `rstar` with the `compare_rstar` feature.
//! 3. For a large population of random query points `q`, require that an index
//!    finds some stored point in the box `[0, q]` exactly when [`point_above`]
//!    finds one by linear scan.
//!
//! The first disagreement ends the run with [`HarnessError::ConsistencyViolation`].
//!
//! ```rust
//! use orthant_harness::{Fixture, HarnessConfig};
//!
//! let config = HarnessConfig::default()
//!     .with_boundary_points(64)
//!     .with_query_points(1_000);
//! let fixture = Fixture::<4>::build(config)?;
//! let reports = fixture.check(&fixture.native_indexes())?;
//! for r in &reports {
//!     assert_eq!(r.above + r.below, 1_000);
//! }
//! # Ok::<(), orthant_harness::HarnessError>(())
//! ```
//!
//! Everything the oracle and the indexes have in common is the
//! [`DominanceQuery`] trait, so the same checks run against any implementation.

pub mod boundary;
pub mod config;
pub mod error;
#[cfg(feature = "compare_rstar")]
pub mod external;
pub mod harness;
pub mod oracle;
pub mod query;

pub use boundary::{BoundarySet, QuerySet};
pub use config::HarnessConfig;
pub use error::{Disagreement, HarnessError, Result};
#[cfg(feature = "compare_rstar")]
pub use external::RStarIndex;
pub use harness::{
    ConsistencyHarness, Fixture, SweepReport, bulk_rtree_index, flat_index, rtree_index,
};
pub use oracle::{BruteForceOracle, incomparable, leq, point_above};
pub use query::{DominanceQuery, NamedIndex};
