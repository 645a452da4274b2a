//! Split one polygon in two along an infinite line.
//!
//! Walk the closed edges, intersect each with the line through `line_start`
//! and `line_end`, and keep edges whose intersection parameter lies strictly
//! inside (0, 1). Exactly two crossing edges `i1 < i2` are required:
//!
//! - piece A = `[p1, points[i1+1 ..= i2], p2]`
//! - piece B = `[p2, points[i2+1 ..], points[..= i1], p1]`
//!
//! A line through a vertex hits the two adjacent edges at parameter 0 or 1,
//! which do not count; such slices are rejected rather than guessed at.

use crate::error::EditError;
use crate::geom::{Point, EPS};
use crate::model::{IdGen, Polygon, PolygonSet};

/// Parameter `t` along edge `ab` where it meets the infinite line `l0 l1`;
/// `None` when parallel.
fn edge_line_param(a: Point, b: Point, l0: Point, l1: Point) -> Option<f64> {
    let e = b.to_vec() - a.to_vec();
    let d = l1.to_vec() - l0.to_vec();
    let denom = e.x * d.y - e.y * d.x;
    if denom.abs() < EPS {
        return None;
    }
    let w = l0.to_vec() - a.to_vec();
    Some((w.x * d.y - w.y * d.x) / denom)
}

/// Crossing edges as `(edge index, intersection point)`, in edge order.
pub fn crossings(points: &[Point], line_start: Point, line_end: Point) -> Vec<(usize, Point)> {
    let n = points.len();
    if n < 2 || line_start.distance(line_end) < EPS {
        return Vec::new();
    }
    (0..n)
        .filter_map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            let t = edge_line_param(a, b, line_start, line_end)?;
            (t > 0.0 && t < 1.0).then(|| (i, a.lerp(b, t)))
        })
        .collect()
}

/// Split into two point sequences, or explain why not.
pub fn split_points(
    points: &[Point],
    line_start: Point,
    line_end: Point,
) -> Result<(Vec<Point>, Vec<Point>), EditError> {
    let hits = crossings(points, line_start, line_end);
    let [(i1, p1), (i2, p2)] = hits[..] else {
        return Err(EditError::SliceCrossings { found: hits.len() });
    };
    let mut a = Vec::with_capacity(i2 - i1 + 2);
    a.push(p1);
    a.extend_from_slice(&points[i1 + 1..=i2]);
    a.push(p2);

    let mut b = Vec::with_capacity(points.len() - (i2 - i1) + 2);
    b.push(p2);
    b.extend_from_slice(&points[i2 + 1..]);
    b.extend_from_slice(&points[..=i1]);
    b.push(p1);

    if a.len() < 3 || b.len() < 3 {
        return Err(EditError::SliceDegenerate);
    }
    Ok((a, b))
}

/// Slice `polygon`; both pieces get fresh ids (unique in `set`) and inherit
/// its kind and label.
pub fn slice(
    polygon: &Polygon,
    line_start: Point,
    line_end: Point,
    set: &PolygonSet,
    ids: &mut IdGen,
) -> Result<[Polygon; 2], EditError> {
    let (a, b) = split_points(&polygon.points, line_start, line_end)?;
    let mut first = polygon.with_points(a);
    first.id = ids.fresh(set);
    let mut second = polygon.with_points(b);
    // Avoid colliding with `first` as well as with the set.
    second.id = loop {
        let id = ids.fresh(set);
        if id != first.id {
            break id;
        }
    };
    Ok([first, second])
}

impl PolygonSet {
    /// New set with `polygon` replaced by its two slice pieces at the same position.
    pub fn sliced(
        &self,
        polygon: &Polygon,
        line_start: Point,
        line_end: Point,
        ids: &mut IdGen,
    ) -> Result<PolygonSet, EditError> {
        if self.get(&polygon.id).is_none() {
            return Err(EditError::UnknownPolygon(polygon.id.clone()));
        }
        let parts = slice(polygon, line_start, line_end, self, ids)?;
        self.with_split(&polygon.id, parts.to_vec())
            .ok_or_else(|| EditError::UnknownPolygon(polygon.id.clone()))
    }
}
