// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree backend generic over scalar `T: Scalar` and dimension `D` with SAH-like split.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::backend::Backend;
use crate::types::{Aabb, Scalar, cost, union_aabb};

/// R-tree backend using SAH-like splits and widened accumulator metrics.
pub struct RTree<T: Scalar, const D: usize> {
    max_children: usize,
    min_children: usize,
    root: Option<NodeIdx>,
    arena: Vec<RNode<T, D>>,
    len: usize,
}

#[derive(Clone)]
struct RNode<T: Scalar, const D: usize> {
    bbox: Aabb<T, D>,
    leaf: bool,
    children: Vec<RChild<T, D>>,
}

#[derive(Clone)]
enum RChild<T: Scalar, const D: usize> {
    Node(NodeIdx),
    Item { slot: usize, bbox: Aabb<T, D> },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar, const D: usize> Default for RTree<T, D> {
    fn default() -> Self {
        Self {
            max_children: 8,
            min_children: 4,
            root: None,
            arena: Vec::new(),
            len: 0,
        }
    }
}

// Reduce clippy::type_complexity noise for local helpers.
type RChildren<TS, const DS: usize> = Vec<RChild<TS, DS>>;
type RBestSplit<TS, const DS: usize> = Option<(
    crate::types::ScalarAcc<TS>,
    RChildren<TS, DS>,
    RChildren<TS, DS>,
)>;

fn centroid_cmp<T: Scalar, const D: usize>(a: &Aabb<T, D>, b: &Aabb<T, D>, axis: usize) -> Ordering {
    Scalar::mid(a.min[axis], a.max[axis])
        .partial_cmp(&Scalar::mid(b.min[axis], b.max[axis]))
        .unwrap_or(Ordering::Equal)
}

/// Smallest `s` with `s^r >= n`.
fn int_root_ceil(n: usize, r: u32) -> usize {
    let mut s = 1_usize;
    while s.saturating_pow(r) < n {
        s += 1;
    }
    s
}

impl<T: Scalar, const D: usize> RTree<T, D> {
    /// Number of items stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty, 1 for a single leaf.
    pub fn height(&self) -> usize {
        let mut h = 0;
        let mut cur = self.root;
        while let Some(i) = cur {
            h += 1;
            let n = &self.arena[i.get()];
            cur = if n.leaf {
                None
            } else {
                n.children.iter().find_map(|c| match c {
                    RChild::Node(ci) => Some(*ci),
                    RChild::Item { .. } => None,
                })
            };
        }
        h
    }

    /// Sort-Tile-Recursive ordering: slab the items along `axis`, then recurse
    /// into each slab on the next axis. Slabs are sized in multiples of
    /// `max_children` so consecutive chunks never straddle two slabs.
    fn str_order<X, F>(items: &mut [X], axis: usize, max_children: usize, bbox_of: &F)
    where
        F: Fn(&X) -> Aabb<T, D>,
    {
        items.sort_by(|a, b| centroid_cmp(&bbox_of(a), &bbox_of(b), axis));
        let n = items.len();
        if axis + 1 >= D || n <= max_children {
            return;
        }
        let pages = n.div_ceil(max_children);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Remaining axis count is bounded by D, far below u32::MAX."
        )]
        let slabs = int_root_ceil(pages, (D - axis) as u32);
        let slab_size = pages.div_ceil(slabs) * max_children;
        for slab in items.chunks_mut(slab_size) {
            Self::str_order(slab, axis + 1, max_children, bbox_of);
        }
    }

    /// STR-like bulk builder: creates a packed tree from items in one pass into `arena`.
    fn bulk_build_nodes(
        arena: &mut Vec<RNode<T, D>>,
        items: &mut [(usize, Aabb<T, D>)],
        max_children: usize,
    ) -> Option<NodeIdx> {
        if items.is_empty() {
            return None;
        }

        // Build leaf level (as node indices in the arena)
        Self::str_order(items, 0, max_children, &|it: &(usize, Aabb<T, D>)| it.1);
        let mut level: Vec<usize> = Vec::with_capacity(items.len().div_ceil(max_children));
        for chunk in items.chunks(max_children) {
            let children: RChildren<T, D> = chunk
                .iter()
                .map(|&(slot, bbox)| RChild::Item { slot, bbox })
                .collect();
            let bbox = Self::node_bbox(arena, &children);
            level.push(arena.len());
            arena.push(RNode {
                bbox,
                leaf: true,
                children,
            });
        }

        // Promote until a single root remains
        while level.len() > 1 {
            {
                let arena_ref: &[RNode<T, D>] = arena;
                Self::str_order(&mut level, 0, max_children, &|&i: &usize| {
                    arena_ref[i].bbox
                });
            }
            let mut next: Vec<usize> = Vec::with_capacity(level.len().div_ceil(max_children));
            for chunk in level.chunks(max_children) {
                let children: RChildren<T, D> = chunk
                    .iter()
                    .map(|&i| RChild::Node(NodeIdx::new(i)))
                    .collect();
                let bbox = Self::node_bbox(arena, &children);
                next.push(arena.len());
                arena.push(RNode {
                    bbox,
                    leaf: false,
                    children,
                });
            }
            level = next;
        }

        level.first().copied().map(NodeIdx::new)
    }

    /// Build an `RTree` from a set of (slot, bbox) pairs using a packed layout.
    pub fn bulk_build_default(pairs: &[(usize, Aabb<T, D>)]) -> Self {
        let mut tree = Self::default();
        let mut items = pairs.to_vec();
        tree.root = Self::bulk_build_nodes(&mut tree.arena, &mut items[..], tree.max_children);
        tree.len = pairs.len();
        tree
    }

    fn child_bbox(arena: &[RNode<T, D>], c: &RChild<T, D>) -> Aabb<T, D> {
        match c {
            RChild::Node(i) => arena[i.get()].bbox,
            RChild::Item { bbox, .. } => *bbox,
        }
    }

    fn node_bbox(arena: &[RNode<T, D>], children: &[RChild<T, D>]) -> Aabb<T, D> {
        let mut it = children.iter();
        let first = match it.next() {
            Some(c) => Self::child_bbox(arena, c),
            None => Aabb::from_point([T::zero(); D]),
        };
        it.fold(first, |acc, c| union_aabb(acc, Self::child_bbox(arena, c)))
    }

    fn enlarge_cost(a: &Aabb<T, D>, b: &Aabb<T, D>) -> T::Acc {
        let u = union_aabb(*a, *b);
        cost(&u) - cost(a)
    }

    fn choose_child(arena: &[RNode<T, D>], children: &[RChild<T, D>], bbox: &Aabb<T, D>) -> usize {
        let mut best_idx = 0_usize;
        let mut best_cost: Option<T::Acc> = None;
        for (i, c) in children.iter().enumerate() {
            let cb = Self::child_bbox(arena, c);
            let enlarge = Self::enlarge_cost(&cb, bbox);
            if best_cost.map(|bc| enlarge < bc).unwrap_or(true) {
                best_cost = Some(enlarge);
                best_idx = i;
            }
        }
        best_idx
    }

    /// SAH-like split: for every axis, sort by centroid, precompute prefix/suffix
    /// AABBs, and choose `k` minimizing `cost(LB_k) * k + cost(RB_k) * (n - k)`.
    fn split_children(
        arena: &[RNode<T, D>],
        children: Vec<RChild<T, D>>,
        min_children: usize,
    ) -> (RChildren<T, D>, RChildren<T, D>) {
        let n = children.len();
        let mut best: RBestSplit<T, D> = None;
        for axis in 0..D {
            let mut v = children.clone();
            v.sort_by(|a, b| {
                centroid_cmp(&Self::child_bbox(arena, a), &Self::child_bbox(arena, b), axis)
            });

            // Precompute prefix and suffix bounding boxes to evaluate costs in O(1) per split.
            let mut prefix: Vec<Aabb<T, D>> = Vec::with_capacity(n);
            for c in &v {
                let bb = Self::child_bbox(arena, c);
                let next = match prefix.last() {
                    Some(prev) => union_aabb(*prev, bb),
                    None => bb,
                };
                prefix.push(next);
            }
            let mut suffix: Vec<Aabb<T, D>> = Vec::with_capacity(n);
            for c in v.iter().rev() {
                let bb = Self::child_bbox(arena, c);
                let next = match suffix.last() {
                    Some(prev) => union_aabb(bb, *prev),
                    None => bb,
                };
                suffix.push(next);
            }
            suffix.reverse();

            for k in min_children..=(n - min_children) {
                let c = cost(&prefix[k - 1]) * T::acc_from_usize(k)
                    + cost(&suffix[k]) * T::acc_from_usize(n - k);
                if best.as_ref().map(|(bc, _, _)| c < *bc).unwrap_or(true) {
                    best = Some((c, v[..k].to_vec(), v[k..].to_vec()));
                }
            }
        }
        match best {
            Some((_, l, r)) => (l, r),
            // Unreachable for overflowing nodes (n > max >= 2 * min); halve as a fallback.
            None => {
                let mut l = children;
                let r = l.split_off(n / 2);
                (l, r)
            }
        }
    }

    /// Insert below `node_idx`; returns the arena index of a new right sibling on split.
    fn insert_node(
        arena: &mut Vec<RNode<T, D>>,
        node_idx: usize,
        slot: usize,
        bbox: Aabb<T, D>,
        max_children: usize,
        min_children: usize,
    ) -> Option<usize> {
        if arena[node_idx].leaf {
            let node = &mut arena[node_idx];
            node.children.push(RChild::Item { slot, bbox });
            node.bbox = union_aabb(node.bbox, bbox);
            if node.children.len() <= max_children {
                return None;
            }
        } else {
            // Choose child without holding &mut to the node across arena borrows
            let idx = Self::choose_child(arena, &arena[node_idx].children, &bbox);
            let split = match arena[node_idx].children[idx] {
                RChild::Node(child_idx) => Self::insert_node(
                    arena,
                    child_idx.get(),
                    slot,
                    bbox,
                    max_children,
                    min_children,
                ),
                RChild::Item { .. } => None,
            };
            arena[node_idx].bbox = union_aabb(arena[node_idx].bbox, bbox);
            let new_right_idx = split?;
            arena[node_idx]
                .children
                .insert(idx + 1, RChild::Node(NodeIdx::new(new_right_idx)));
            if arena[node_idx].children.len() <= max_children {
                return None;
            }
        }

        // Overflow: split this node into itself (left half) and a new right sibling.
        let leaf = arena[node_idx].leaf;
        let children = core::mem::take(&mut arena[node_idx].children);
        let (left, right) = Self::split_children(arena, children, min_children);
        let l_bbox = Self::node_bbox(arena, &left);
        let r_bbox = Self::node_bbox(arena, &right);
        let node = &mut arena[node_idx];
        node.children = left;
        node.bbox = l_bbox;
        let r_idx = arena.len();
        arena.push(RNode {
            bbox: r_bbox,
            leaf,
            children: right,
        });
        Some(r_idx)
    }
}

impl<T: Scalar, const D: usize> Backend<T, D> for RTree<T, D> {
    fn insert(&mut self, slot: usize, aabb: Aabb<T, D>) {
        self.len += 1;
        match self.root {
            None => {
                let idx = self.arena.len();
                self.arena.push(RNode {
                    bbox: aabb,
                    leaf: true,
                    children: vec![RChild::Item { slot, bbox: aabb }],
                });
                self.root = Some(NodeIdx::new(idx));
            }
            Some(root_idx) => {
                let split = Self::insert_node(
                    &mut self.arena,
                    root_idx.get(),
                    slot,
                    aabb,
                    self.max_children,
                    self.min_children,
                );
                if let Some(right_idx) = split {
                    // Create a new root combining old root and new right child
                    let left_bb = self.arena[root_idx.get()].bbox;
                    let right_bb = self.arena[right_idx].bbox;
                    let idx = self.arena.len();
                    self.arena.push(RNode {
                        bbox: union_aabb(left_bb, right_bb),
                        leaf: false,
                        children: vec![
                            RChild::Node(root_idx),
                            RChild::Node(NodeIdx::new(right_idx)),
                        ],
                    });
                    self.root = Some(NodeIdx::new(idx));
                }
            }
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.len = 0;
    }

    fn visit_rect(
        &self,
        rect: &Aabb<T, D>,
        f: &mut dyn FnMut(usize) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let Some(root_idx) = self.root else {
            return ControlFlow::Continue(());
        };
        let mut stack = vec![root_idx];
        while let Some(i) = stack.pop() {
            let n = &self.arena[i.get()];
            if !n.bbox.intersects(rect) {
                continue;
            }
            for c in &n.children {
                match c {
                    RChild::Item { slot, bbox } => {
                        if bbox.intersects(rect) {
                            f(*slot)?;
                        }
                    }
                    RChild::Node(ci) => stack.push(*ci),
                }
            }
        }
        ControlFlow::Continue(())
    }
}

impl<T: Scalar, const D: usize> Debug for RTree<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("dims", &D)
            .field("max_children", &self.max_children)
            .field("min_children", &self.min_children)
            .field("arena_nodes", &self.arena.len())
            .field("len", &self.len)
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

/// Convenience type aliases.
/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64<const D: usize> = RTree<i64, D>;

/// R-tree with f32 coordinates and f64 metrics.
pub type RTreeF32<const D: usize> = RTree<f32, D>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64<const D: usize> = RTree<f64, D>;
