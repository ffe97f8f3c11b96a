// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::backend::Backend;
use crate::types::Aabb;

/// Flat vector backend with linear scans.
pub struct FlatVec<T: Copy + PartialOrd + Debug, const D: usize> {
    entries: Vec<Option<Aabb<T, D>>>,
}

impl<T: Copy + PartialOrd + Debug, const D: usize> Default for FlatVec<T, D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Copy + PartialOrd + Debug, const D: usize> Debug for FlatVec<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("dims", &D)
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug, const D: usize> Backend<T, D> for FlatVec<T, D> {
    fn insert(&mut self, slot: usize, aabb: Aabb<T, D>) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn visit_rect(
        &self,
        rect: &Aabb<T, D>,
        f: &mut dyn FnMut(usize) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        for (i, slot) in self.entries.iter().enumerate() {
            if let Some(a) = slot.as_ref()
                && a.intersects(rect)
            {
                f(i)?;
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn sparse_slots_are_skipped() {
        let mut b: FlatVec<i64, 3> = FlatVec::default();
        b.insert(4, Aabb::from_point([1, 1, 1]));
        b.insert(1, Aabb::from_point([5, 5, 5]));
        let hits: Vec<_> = b.query_rect(Aabb::new([0; 3], [2; 3])).collect();
        assert_eq!(hits, vec![4]);
        assert_eq!(b.query_point([5, 5, 5]).collect::<Vec<_>>(), vec![1]);
        b.clear();
        assert_eq!(b.query_rect(Aabb::new([0; 3], [9; 3])).count(), 0);
    }

    #[test]
    fn visitor_break_stops_scan() {
        let mut b: FlatVec<f64, 2> = FlatVec::default();
        for i in 0..5 {
            b.insert(i, Aabb::from_point([0.1, 0.1]));
        }
        let mut seen = 0;
        let flow = b.visit_rect(&Aabb::below([1.0, 1.0]), &mut |_| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, 2);
    }
}
