// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// A point (or extent) in 2D.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2<T> {
    /// Horizontal coordinate.
    pub x: T,
    /// Vertical coordinate.
    pub y: T,
}

impl<T> Point2<T> {
    /// Create a new point.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in 2D.
///
/// `min` must not exceed `max` on either axis. This is the caller's contract and is
/// not checked; zero-width or zero-height boxes are valid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb<T> {
    /// Minimum corner (left, top).
    pub min: Point2<T>,
    /// Maximum corner (right, bottom).
    pub max: Point2<T>,
}

impl<T> Aabb<T> {
    /// Create a new AABB from its min/max corners.
    pub const fn new(min: Point2<T>, max: Point2<T>) -> Self {
        Self { min, max }
    }

    /// Create a new AABB from min/max coordinates.
    pub const fn from_coords(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min: Point2::new(min_x, min_y),
            max: Point2::new(max_x, max_y),
        }
    }
}

impl<T: Scalar> Aabb<T> {
    /// Create an AABB from an origin and a size.
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::from_coords(x, y, T::add(x, w), T::add(y, h))
    }

    /// A degenerate AABB covering exactly one point.
    pub fn from_point(p: Point2<T>) -> Self {
        Self { min: p, max: p }
    }

    /// Width and height as a vector.
    pub fn size(&self) -> Point2<T> {
        Point2::new(self.width(), self.height())
    }

    /// Extent along the x axis.
    pub fn width(&self) -> T {
        T::sub(self.max.x, self.min.x)
    }

    /// Extent along the y axis.
    pub fn height(&self) -> T {
        T::sub(self.max.y, self.min.y)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point2<T> {
        Point2::new(
            T::mid(self.min.x, self.max.x),
            T::mid(self.min.y, self.max.y),
        )
    }

    /// Area in the widened accumulator type. Zero for degenerate boxes.
    pub fn area(&self) -> T::Acc {
        area(self)
    }

    /// Whether `other` lies entirely inside this box. Shared edges count as inside.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min.x, other.min.x)
            && le(self.min.y, other.min.y)
            && le(other.max.x, self.max.x)
            && le(other.max.y, self.max.y)
    }

    /// Whether this box contains the point, edges included.
    pub fn contains_point(&self, p: Point2<T>) -> bool {
        le(self.min.x, p.x) && le(self.min.y, p.y) && le(p.x, self.max.x) && le(p.y, self.max.y)
    }

    /// Separating-axis overlap test. Boxes that only touch count as overlapping.
    pub fn overlaps(&self, other: &Self) -> bool {
        le(self.min.x, other.max.x)
            && le(other.min.x, self.max.x)
            && le(self.min.y, other.max.y)
            && le(other.min.y, self.max.y)
    }

    /// The smallest AABB containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }
}

/// Numeric scalar abstraction for AABB coordinates.
///
/// This trait provides the handful of operations the tree needs for its cost
/// metric, plus an associated widened accumulator type for areas (f32→f64,
/// i64→i128) so that summed costs stay comparable on large inputs.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b.
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

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
        f64::from(v)
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

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
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

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
        i128::from(v)
    }
}

/// Compute the area of an AABB using the scalar's widened accumulator type.
#[inline]
pub fn area<T: Scalar>(a: &Aabb<T>) -> T::Acc {
    let w = T::max_zero(T::sub(a.max.x, a.min.x));
    let h = T::max_zero(T::sub(a.max.y, a.min.y));
    T::widen(w) * T::widen(h)
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb<T>, b: Aabb<T>) -> Aabb<T> {
    Aabb {
        min: Point2::new(min_t(a.min.x, b.min.x), min_t(a.min.y, b.min.y)),
        max: Point2::new(max_t(a.max.x, b.max.x), max_t(a.max.y, b.max.y)),
    }
}
