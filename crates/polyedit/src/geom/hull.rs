//! Graham-scan convex hull.
//!
//! Pivot is the lowest (min y) then leftmost point; the rest are sorted by
//! polar angle around it with ties broken by distance, and the sweep pops on
//! any non-left turn (`cross <= 0`). Inputs of 3 or fewer points come back
//! unchanged. Collinear or duplicate input may yield a hull of ≤2 points;
//! callers treat its area and perimeter as 0.

use super::primitives::cross;
use super::types::Point;

pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() <= 3 {
        return points.to_vec();
    }
    let pivot_idx = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let pivot = points[pivot_idx];

    let mut rest: Vec<Point> = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| (i != pivot_idx).then_some(*p))
        .collect();
    rest.sort_by(|a, b| {
        let aa = (a.y - pivot.y).atan2(a.x - pivot.x);
        let bb = (b.y - pivot.y).atan2(b.x - pivot.x);
        aa.total_cmp(&bb)
            .then_with(|| pivot.distance(*a).total_cmp(&pivot.distance(*b)))
    });

    let mut hull: Vec<Point> = Vec::with_capacity(points.len());
    hull.push(pivot);
    for p in rest {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        // A duplicate of the pivot would otherwise survive as the second entry.
        if hull.len() == 1 && p == pivot {
            continue;
        }
        hull.push(p);
    }
    hull
}

/// True when `hull` has enough distinct vertices to enclose area.
#[inline]
pub fn is_proper_hull(hull: &[Point]) -> bool {
    hull.len() >= 3
}
