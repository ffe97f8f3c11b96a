// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Orthant Index: insert points, count the ones below a bound, and query a box.

use orthant_index::{Aabb, Index};

fn main() {
    let mut idx = Index::<f64, u32, 4>::with_rtree();
    idx.insert_point([0.1, 0.1, 0.1, 0.1], 0);
    idx.insert_point([0.5, 0.05, 0.05, 0.05], 1);
    idx.insert_point([0.05, 0.7, 0.1, 0.1], 2);

    for upper in [[0.6; 4], [0.05; 4], [0.55, 0.2, 0.2, 0.2]] {
        println!("points below {:?}: {}", upper, idx.count_below(upper));
    }

    // Query a box
    let hits: Vec<_> = idx
        .query_rect(Aabb::new([0.0, 0.5, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0]))
        .collect();
    println!("hits in upper-y slab: {:?}", hits);
}
