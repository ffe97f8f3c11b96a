// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::types::Aabb;

/// Spatial backend abstraction used by `IndexGeneric`.
///
/// Backends only know about slots; payloads live in the index.
pub trait Backend<T: Copy + PartialOrd + Debug, const D: usize> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb<T, D>);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Visit slots whose AABB intersects `rect` until `f` breaks.
    ///
    /// Returns `Break` if the visitor stopped the walk early.
    fn visit_rect(
        &self,
        rect: &Aabb<T, D>,
        f: &mut dyn FnMut(usize) -> ControlFlow<()>,
    ) -> ControlFlow<()>;

    /// Query slots whose AABB contains the point.
    fn query_point<'a>(&'a self, p: [T; D]) -> Box<dyn Iterator<Item = usize> + 'a> {
        self.query_rect(Aabb::new(p, p))
    }

    /// Query slots whose AABB intersects the rectangle.
    fn query_rect<'a>(&'a self, rect: Aabb<T, D>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        let _ = self.visit_rect(&rect, &mut |slot| {
            out.push(slot);
            ControlFlow::Continue(())
        });
        Box::new(out.into_iter())
    }
}
