//! Hit testing in image space. Tolerances are already converted from pixels.

use crate::geom::{distance_to_segment, edges, Point};
use crate::model::{Polygon, PolygonId, PolygonSet};

/// Nearest edge of `polygon` to `p` as `(edge index, distance)`.
pub fn nearest_edge(polygon: &Polygon, p: Point) -> Option<(usize, f64)> {
    if polygon.points.len() < 2 {
        return None;
    }
    edges(&polygon.points)
        .map(|(i, a, b)| (i, distance_to_segment(p, a, b)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Nearest vertex of `polygon` within `tol` of `p`.
pub fn vertex_at(polygon: &Polygon, p: Point, tol: f64) -> Option<usize> {
    polygon
        .points
        .iter()
        .enumerate()
        .map(|(i, v)| (i, v.distance(p)))
        .filter(|(_, d)| *d <= tol)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Nearest vertex within `tol` over the whole set. `prefer` is searched first
/// and wins whenever it has a vertex in range.
pub fn nearest_vertex(
    set: &PolygonSet,
    p: Point,
    tol: f64,
    prefer: Option<&PolygonId>,
) -> Option<(PolygonId, usize)> {
    if let Some(poly) = prefer.and_then(|id| set.get(id)) {
        if let Some(i) = vertex_at(poly, p, tol) {
            return Some((poly.id.clone(), i));
        }
    }
    set.iter()
        .filter_map(|poly| {
            let i = vertex_at(poly, p, tol)?;
            Some((poly, i, poly.points[i].distance(p)))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(poly, i, _)| (poly.id.clone(), i))
}

/// Polygon under `p`: inside it, or within `tol` of its boundary. Among
/// several hits the smallest one wins, so holes are pickable inside their
/// outer polygon.
pub fn polygon_at<'a>(set: &'a PolygonSet, p: Point, tol: f64) -> Option<&'a Polygon> {
    set.iter()
        .filter(|poly| {
            poly.contains(p) || nearest_edge(poly, p).is_some_and(|(_, d)| d <= tol)
        })
        .min_by(|a, b| a.area().total_cmp(&b.area()))
}
