// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orthant Index: a generic N-dimensional AABB index.
//!
//! Orthant Index is a reusable building block for range and dominance queries.
//!
//! - Insert axis-aligned bounding boxes (AABBs) or points with user payloads.
//! - Query by point or intersecting box, or count hits with an early-exit callback.
//! - Count the stored points dominated by an upper bound with [`IndexGeneric::count_below`].
//!
//! It is generic over the scalar type `T` and the dimension `D` (a const generic),
//! and does not depend on any geometry crate.
//!
//! Backends are pluggable via a simple trait so you can swap the spatial strategy without API churn.
//! The default backend is a flat vector (linear scan).
//! The R-tree backend is generic over the scalar and uses widened accumulator types
//! (f32→f64, f64→f64, i64→i128) for SAH-like splits.
//!
//! # Example
//!
//! ```rust
//! use core::ops::ControlFlow;
//! use orthant_index::{Aabb, Index};
//!
//! // Four-dimensional points, payload is the insertion order.
//! let mut idx = Index::<f64, u32, 4>::with_rtree();
//! idx.insert_point([0.1, 0.1, 0.1, 0.1], 0);
//! idx.insert_point([0.5, 0.05, 0.05, 0.05], 1);
//!
//! // Both points lie below (0.6, 0.6, 0.6, 0.6).
//! assert_eq!(idx.count_below([0.6; 4]), 2);
//!
//! // Neither lies below (0.05, 0.05, 0.05, 0.05).
//! assert_eq!(idx.count_below([0.05; 4]), 0);
//!
//! // Stop at the first hit.
//! let n = idx.search(&Aabb::below([1.0; 4]), |_| ControlFlow::Break(()));
//! assert_eq!(n, 1);
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): simplest and smallest, linear scans. Good for very small sets
//!   or as a reference to check other backends against.
//! - `RTreeF32`/`RTreeF64`/`RTreeI64`: R-tree with SAH-like splits over every axis; good
//!   general-purpose index for irregular distributions. Use
//!   [`Index::with_rtree_bulk`] to STR-pack a known set in one pass.
//!   See the [`backends`] docs for a brief SAH overview.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.
//! Box intervals are closed, so a query box touching a stored point counts it.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::rtree::{RTree, RTreeF32, RTreeF64, RTreeI64};
pub use index::{Index, IndexGeneric};
pub use types::{Aabb, Scalar};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn flatvec_and_rtree_agree_on_dominance_counts() {
        let pts: [[i64; 3]; 5] = [[1, 5, 5], [5, 1, 5], [5, 5, 1], [3, 3, 3], [9, 9, 9]];
        let mut flat: Index<i64, usize, 3> = Index::new();
        let mut tree = Index::<i64, usize, 3>::with_rtree();
        for (i, p) in pts.iter().enumerate() {
            flat.insert_point(*p, i);
            tree.insert_point(*p, i);
        }
        for upper in [[0, 0, 0], [3, 3, 3], [5, 5, 5], [4, 9, 9], [9, 9, 9]] {
            assert_eq!(flat.count_below(upper), tree.count_below(upper), "at {upper:?}");
        }
        assert_eq!(flat.count_below([5, 5, 5]), 4);
        let mut hits: Vec<_> = tree.query_rect(Aabb::below([4, 9, 9])).map(|(_, p)| p).collect();
        hits.sort_unstable();
        assert_eq!(hits, [0, 3]);
    }
}
