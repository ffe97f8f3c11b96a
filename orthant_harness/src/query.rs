// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The query capability shared by the oracle and every index under test.

use core::fmt::Debug;

use orthant_index::{Backend, IndexGeneric};

/// "Count the stored points dominated by a given upper bound."
///
/// Implementors hold points in `[0, 1]^D`; `count_dominated(q)` is the number
/// of stored `p` with `p <= q` in every coordinate.
pub trait DominanceQuery<const D: usize> {
    /// Human-readable name used in reports and errors.
    fn name(&self) -> &str;

    /// Number of stored points.
    fn len(&self) -> usize;

    /// Whether nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored points `p` with `p <= upper` component-wise.
    fn count_dominated(&self, upper: &[f64; D]) -> usize;
}

/// An `orthant_index` index with a report name.
#[derive(Debug)]
pub struct NamedIndex<P: Copy + Debug, B: Backend<f64, D>, const D: usize> {
    name: String,
    index: IndexGeneric<f64, P, B, D>,
}

impl<P: Copy + Debug, B: Backend<f64, D>, const D: usize> NamedIndex<P, B, D> {
    /// Wrap `index` under `name`.
    pub fn new(name: impl Into<String>, index: IndexGeneric<f64, P, B, D>) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl<P: Copy + Debug, B: Backend<f64, D>, const D: usize> DominanceQuery<D> for NamedIndex<P, B, D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn count_dominated(&self, upper: &[f64; D]) -> usize {
        self.index.count_below(*upper)
    }
}
