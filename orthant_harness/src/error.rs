// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for boundary generation and consistency checking.

use core::fmt;

use thiserror::Error;

/// Which side of the oracle an index disagreed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disagreement {
    /// The index reported hits but the oracle found no dominated boundary point.
    IndexFalsePositive,
    /// The oracle found a dominated boundary point but the index reported none.
    IndexFalseNegative,
}

impl fmt::Display for Disagreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexFalsePositive => f.write_str("index reports above, but not point_above"),
            Self::IndexFalseNegative => f.write_str("point_above reports true, but not the index"),
        }
    }
}

/// Harness errors. Every variant is terminal for the current run.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Rejection sampling gave up on a boundary point.
    #[error("generation stalled: no incomparable point {index} after {attempts} attempts")]
    GenerationStall {
        /// Position of the point being generated.
        index: usize,
        /// Attempts spent on that point.
        attempts: u64,
    },

    /// An index and the oracle disagreed for a query point.
    #[error("{index_name} over {prefix} points, query #{query} at {point:?}: {direction}")]
    ConsistencyViolation {
        /// Name of the index under test.
        index_name: String,
        /// Boundary prefix length the index was built over.
        prefix: usize,
        /// Position of the query point in the query set.
        query: usize,
        /// The query point.
        point: Vec<f64>,
        /// Direction of the disagreement.
        direction: Disagreement,
    },

    /// A boundary point used as its own upper bound did not yield exactly one hit.
    #[error("{index_name}: boundary point #{point} should dominate exactly itself, got {hits} hits")]
    KnownPointMismatch {
        /// Name of the index under test.
        index_name: String,
        /// Position of the boundary point.
        point: usize,
        /// Hits the index (or oracle) reported.
        hits: usize,
    },

    /// Repeating a query on an unchanged index gave a different count.
    #[error("{index_name}: query #{query} returned {first} then {second}")]
    NonIdempotent {
        /// Name of the index under test.
        index_name: String,
        /// Position of the query point in the query set.
        query: usize,
        /// First count.
        first: usize,
        /// Second count.
        second: usize,
    },

    /// Run parameters are unusable.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

/// Result type for harness operations.
pub type Result<T> = core::result::Result<T, HarnessError>;
