// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter running the third-party `rstar` R-tree through [`DominanceQuery`].

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::query::DominanceQuery;

type Entry<const D: usize> = GeomWithData<[f64; D], u32>;

/// Bulk-loaded `rstar` tree of boundary points tagged with their position.
pub struct RStarIndex<const D: usize>
where
    [f64; D]: rstar::Point<Scalar = f64>,
{
    name: String,
    tree: RTree<Entry<D>>,
}

impl<const D: usize> RStarIndex<D>
where
    [f64; D]: rstar::Point<Scalar = f64>,
{
    /// Bulk-load `points`; each point's id is its position in the slice.
    pub fn bulk_load(name: impl Into<String>, points: &[[f64; D]]) -> Self {
        let entries = points
            .iter()
            .zip(0_u32..)
            .map(|(p, id)| GeomWithData::new(*p, id))
            .collect();
        Self {
            name: name.into(),
            tree: RTree::bulk_load(entries),
        }
    }

    /// Ids of the stored points inside `[low, high]`.
    pub fn ids_in(&self, low: [f64; D], high: [f64; D]) -> Vec<u32> {
        let envelope = AABB::from_corners(low, high);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.data)
            .collect()
    }
}

impl<const D: usize> DominanceQuery<D> for RStarIndex<D>
where
    [f64; D]: rstar::Point<Scalar = f64>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.tree.size()
    }

    fn count_dominated(&self, upper: &[f64; D]) -> usize {
        let envelope = AABB::from_corners([0.0; D], *upper);
        self.tree.locate_in_envelope_intersecting(&envelope).count()
    }
}

impl<const D: usize> core::fmt::Debug for RStarIndex<D>
where
    [f64; D]: rstar::Point<Scalar = f64>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RStarIndex")
            .field("name", &self.name)
            .field("dims", &D)
            .field("size", &self.tree.size())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_points_below_bound() {
        let pts = [[0.1, 0.1, 0.1, 0.1], [0.5, 0.05, 0.05, 0.05]];
        let idx = RStarIndex::bulk_load("rstar", &pts);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.count_dominated(&[0.6; 4]), 2);
        assert_eq!(idx.count_dominated(&[0.05; 4]), 0);
        assert_eq!(idx.ids_in([0.0; 4], [0.5, 0.05, 0.05, 0.05]), [1]);
    }

    #[test]
    fn empty_tree_counts_nothing() {
        let idx = RStarIndex::<4>::bulk_load("rstar", &[]);
        assert!(idx.is_empty());
        assert_eq!(idx.count_dominated(&[1.0; 4]), 0);
    }
}
