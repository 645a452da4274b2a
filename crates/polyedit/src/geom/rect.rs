//! Minimum-area enclosing rectangle by rotating calipers over hull edges.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use super::primitives::edges;
use super::types::{Point, EPS};

/// Oriented rectangle: `width` runs along `angle` (radians), `height` across it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MinAreaRect {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl MinAreaRect {
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corners in order, counterclockwise in y-up.
    pub fn corners(&self) -> [Point; 4] {
        let rot = Rotation2::new(self.angle);
        let c = self.center.to_vec();
        let (hw, hh) = (0.5 * self.width, 0.5 * self.height);
        [
            Vector2::new(-hw, -hh),
            Vector2::new(hw, -hh),
            Vector2::new(hw, hh),
            Vector2::new(-hw, hh),
        ]
        .map(|v| Point::from(c + rot * v))
    }
}

/// For each hull edge, take the bounding box of all hull points in that edge's
/// frame and keep the smallest one.
///
/// A 1-point hull gives a zero-size rect at that point; an empty hull gives
/// the default. A 2-point hull gives a zero-height rect along the segment.
pub fn min_area_rect(hull: &[Point]) -> MinAreaRect {
    match hull {
        [] => return MinAreaRect::default(),
        [p] => {
            return MinAreaRect {
                center: *p,
                ..MinAreaRect::default()
            }
        }
        _ => {}
    }
    let mut best: Option<(f64, MinAreaRect)> = None;
    for (_, a, b) in edges(hull) {
        let d = b.to_vec() - a.to_vec();
        if d.norm() < EPS {
            continue;
        }
        let angle = d.y.atan2(d.x);
        let to_frame = Rotation2::new(-angle);
        let (mut lo, mut hi) = (
            Vector2::new(f64::INFINITY, f64::INFINITY),
            Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        );
        for p in hull {
            let q = to_frame * p.to_vec();
            lo = lo.inf(&q);
            hi = hi.sup(&q);
        }
        let size = hi - lo;
        let area = size.x * size.y;
        if best.as_ref().is_none_or(|(a_best, _)| area < *a_best) {
            let center = to_frame.inverse() * ((lo + hi) * 0.5);
            best = Some((
                area,
                MinAreaRect {
                    center: center.into(),
                    width: size.x,
                    height: size.y,
                    angle,
                },
            ));
        }
    }
    best.map(|(_, r)| r).unwrap_or(MinAreaRect {
        center: hull[0],
        ..MinAreaRect::default()
    })
}
