// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::rtree::RTree;
use crate::types::{Aabb, Scalar};

#[derive(Clone, Debug)]
struct Entry<T, P, const D: usize> {
    aabb: Aabb<T, D>,
    payload: P,
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Entries are addressed by the slot returned from [`IndexGeneric::insert`];
/// slots are dense and assigned in insertion order.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T, D>, const D: usize>
{
    entries: Vec<Entry<T, P, D>>,
    backend: B,
}

impl<T, P, B, const D: usize> IndexGeneric<T, P, B, D>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T, D> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            backend: B::default(),
        }
    }
}

impl<T, P, B, const D: usize> IndexGeneric<T, P, B, D>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T, D>,
{
    /// Reserve space for at least `n` entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Insert a new AABB with payload. Returns its slot.
    pub fn insert(&mut self, aabb: Aabb<T, D>, payload: P) -> usize {
        let slot = self.entries.len();
        self.entries.push(Entry { aabb, payload });
        self.backend.insert(slot, aabb);
        slot
    }

    /// Insert a point as a degenerate box (`low == high`).
    pub fn insert_point(&mut self, p: [T; D], payload: P) -> usize {
        self.insert(Aabb::from_point(p), payload)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.backend.clear();
    }

    /// The AABB and payload stored at `slot`.
    pub fn get(&self, slot: usize) -> Option<(Aabb<T, D>, P)> {
        self.entries.get(slot).map(|e| (e.aabb, e.payload))
    }

    /// Count entries whose AABB intersects `rect`, passing each payload to `callback`.
    ///
    /// The callback may stop the search early by returning `Break`; the hit that
    /// triggered the break is still counted.
    pub fn search<F>(&self, rect: &Aabb<T, D>, mut callback: F) -> usize
    where
        F: FnMut(P) -> ControlFlow<()>,
    {
        let mut hits = 0_usize;
        let _ = self.backend.visit_rect(rect, &mut |slot| match self.entries.get(slot) {
            Some(e) => {
                hits += 1;
                callback(e.payload)
            }
            None => ControlFlow::Continue(()),
        });
        hits
    }

    /// Count all entries whose AABB intersects `rect`.
    pub fn count_rect(&self, rect: &Aabb<T, D>) -> usize {
        self.search(rect, |_| ControlFlow::Continue(()))
    }

    /// Query for entries whose AABB contains the point.
    pub fn query_point(&self, p: [T; D]) -> impl Iterator<Item = (usize, P)> + '_ {
        let slots = self.backend.query_point(p);
        let mut out = Vec::new();
        for i in slots {
            if let Some(e) = self.entries.get(i) {
                out.push((i, e.payload));
            }
        }
        out.into_iter()
    }

    /// Query for entries whose AABB intersects the given rectangle.
    pub fn query_rect(&self, rect: Aabb<T, D>) -> impl Iterator<Item = (usize, P)> + '_ {
        let slots = self.backend.query_rect(rect);
        let mut out = Vec::new();
        for i in slots {
            if let Some(e) = self.entries.get(i) {
                out.push((i, e.payload));
            }
        }
        out.into_iter()
    }
}

impl<T, P, B, const D: usize> IndexGeneric<T, P, B, D>
where
    T: Scalar,
    P: Copy + Debug,
    B: Backend<T, D>,
{
    /// Count entries lying in the box `[0, upper]`.
    ///
    /// For point entries in the non-negative orthant this is the number of
    /// stored points dominated by `upper` component-wise.
    pub fn count_below(&self, upper: [T; D]) -> usize {
        self.count_rect(&Aabb::below(upper))
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P, const D: usize> = IndexGeneric<T, P, FlatVec<T, D>, D>;

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug, const D: usize> Default for Index<T, P, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P: Copy + Debug, const D: usize> Index<T, P, D> {
    /// Create an R-tree-backed index.
    pub fn with_rtree() -> IndexGeneric<T, P, RTree<T, D>, D> {
        IndexGeneric {
            entries: Vec::new(),
            backend: RTree::default(),
        }
    }

    /// Build an R-tree-backed index in bulk from entries.
    pub fn with_rtree_bulk(entries: &[(Aabb<T, D>, P)]) -> IndexGeneric<T, P, RTree<T, D>, D> {
        let mut pairs: Vec<(usize, Aabb<T, D>)> = Vec::with_capacity(entries.len());
        let mut stored = Vec::with_capacity(entries.len());
        for (i, (aabb, payload)) in entries.iter().copied().enumerate() {
            stored.push(Entry { aabb, payload });
            pairs.push((i, aabb));
        }
        IndexGeneric {
            entries: stored,
            backend: RTree::bulk_build_default(&pairs),
        }
    }
}
