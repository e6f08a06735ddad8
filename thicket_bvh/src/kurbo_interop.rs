// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions to and from Kurbo geometry (feature `kurbo`).
//!
//! Kurbo rectangles may be stored with swapped corners; they are normalized on
//! the way in so the resulting [`Aabb`] always has `min <= max`.

use kurbo::{Point, Rect};

use crate::types::{Aabb, Point2};

impl From<Rect> for Aabb<f64> {
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self::from_coords(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<Aabb<f64>> for Rect {
    fn from(a: Aabb<f64>) -> Self {
        Self::new(a.min.x, a.min.y, a.max.x, a.max.y)
    }
}

impl From<Point> for Point2<f64> {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point2<f64>> for Point {
    fn from(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}
