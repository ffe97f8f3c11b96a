// Copyright 2025 the Orthant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in `D` dimensions.
///
/// Intervals are closed on both ends, so a degenerate box (`min == max`)
/// represents a single point and still intersects boxes that touch it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb<T, const D: usize> {
    /// Lower corner.
    pub min: [T; D],
    /// Upper corner.
    pub max: [T; D],
}

impl<T, const D: usize> Aabb<T, D> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min: [T; D], max: [T; D]) -> Self {
        Self { min, max }
    }
}

impl<T: Copy, const D: usize> Aabb<T, D> {
    /// Degenerate box covering exactly `p`.
    pub const fn from_point(p: [T; D]) -> Self {
        Self { min: p, max: p }
    }
}

impl<T: Copy + PartialOrd, const D: usize> Aabb<T, D> {
    /// The intersection of two AABBs.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = *self;
        for j in 0..D {
            out.min[j] = max_t(self.min[j], other.min[j]);
            out.max[j] = min_t(self.max[j], other.max[j]);
        }
        out
    }

    /// Whether the two AABBs share at least one point. Assumes no NaN.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|j| le(self.min[j], other.max[j]) && le(other.min[j], self.max[j]))
    }

    /// Return true if the AABB is inverted on some axis (contains no point). Assumes no NaN.
    ///
    /// Zero-extent axes are not empty: a point box is a valid, non-empty AABB.
    pub fn is_empty(&self) -> bool {
        (0..D).any(|j| lt(self.max[j], self.min[j]))
    }
}

impl<T: Scalar, const D: usize> Aabb<T, D> {
    /// The box spanning from the origin to `upper`, i.e. the down-set of `upper`
    /// within the non-negative orthant.
    pub fn below(upper: [T; D]) -> Self {
        Self {
            min: [T::zero(); D],
            max: upper,
        }
    }
}

/// Numeric scalar abstraction for AABBs used by backends.
///
/// This trait provides a minimal set of operations required for SAH metrics and
/// centroid computations, and an associated widened accumulator type for volume
/// (e.g., f32→f64, i64→i128).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for volume/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b (used for centroid ordering).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for SAH weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as Self::Acc
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as i128
    }
}

/// Margin (sum of extents) of an AABB in the widened accumulator type.
///
/// Degenerate point boxes have zero volume, so splits are scored on margin
/// plus volume; volume alone cannot tell point clusters apart.
#[inline]
pub fn margin<T: Scalar, const D: usize>(a: &Aabb<T, D>) -> T::Acc {
    let mut acc = T::widen(T::zero());
    for j in 0..D {
        acc = acc + T::widen(T::max_zero(T::sub(a.max[j], a.min[j])));
    }
    acc
}

/// Volume (product of extents) of an AABB in the widened accumulator type.
#[inline]
pub fn volume<T: Scalar, const D: usize>(a: &Aabb<T, D>) -> T::Acc {
    let mut acc = T::acc_from_usize(1);
    for j in 0..D {
        acc = acc * T::widen(T::max_zero(T::sub(a.max[j], a.min[j])));
    }
    acc
}

/// Split/enlargement cost of a box: `margin + volume`.
#[inline]
pub fn cost<T: Scalar, const D: usize>(a: &Aabb<T, D>) -> T::Acc {
    margin(a) + volume(a)
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy, const D: usize>(
    a: Aabb<T, D>,
    b: Aabb<T, D>,
) -> Aabb<T, D> {
    let mut out = a;
    for j in 0..D {
        out.min[j] = min_t(a.min[j], b.min[j]);
        out.max[j] = max_t(a.max[j], b.max[j]);
    }
    out
}
