//! Basic 2D value types and the shared numeric conventions.
//!
//! - `Point`: image-space coordinate pair (serde-friendly, converts to/from `Vector2`).
//! - `BoundingBox`: axis-aligned extent of a point sequence.
//! - `EPS` + `safe_div`: the single tolerance and the single zero-denominator rule.
//!
//! Code cross-refs: `primitives`, `hull`, `rect`, `crate::metrics`

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Numerical tolerance for denominators, parallel tests and degenerate edges.
pub const EPS: f64 = 1e-12;

/// Divide `num` by `den`, returning `0.0` instead of NaN/Infinity.
///
/// Convention: the result is `0.0` whenever `|den| < EPS` or the quotient is
/// not finite. Every ratio in the crate goes through here.
#[inline]
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den.abs() < EPS {
        return 0.0;
    }
    let q = num / den;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Point in image space (pixels, y pointing down as delivered by the loader).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.to_vec() - other.to_vec()).norm()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Linear interpolation `self + t (other - self)`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }
}

impl From<Vector2<f64>> for Point {
    #[inline]
    fn from(v: Vector2<f64>) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for Vector2<f64> {
    #[inline]
    fn from(p: Point) -> Self {
        p.to_vec()
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned bounding box. All-zero for empty input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Width/height pair (image or viewport size).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
