// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple).
//! - `rtree`: generic R-tree (`T: Scalar`, any `D`) with SAH-like split (aliases: `RTreeI64`, `RTreeF32`, `RTreeF64`).
//!
//! SAH note
//! --------
//! The R-tree uses an SAH-like split heuristic.
//! For a split point `k` along a sorted axis we minimize:
//!
//! `cost(k) = c(LB_k) * k + c(RB_k) * (n - k)`
//!
//! where `LB_k` and `RB_k` are the bounding boxes of the first `k` and remaining `n - k` items,
//! and `c(b)` is the margin plus the volume of `b`. Pure volume is zero for boxes that are flat
//! on any axis, which is common when indexing points.
//! We evaluate all `k` in O(n) per axis using prefix/suffix bounding boxes, for each of the `D`
//! axes, and pick the lowest cost.
//! Accumulators are widened (`f32`→`f64`, `f64`→`f64`, `i64`→`i128`) for robust comparisons.
//! The bulk builder uses Sort-Tile-Recursive packing across all `D` axes.

pub mod flatvec;
pub mod rtree;
