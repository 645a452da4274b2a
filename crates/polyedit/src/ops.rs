//! Vertex-level polygon edits. Each returns a new `Polygon` or a rejection.

use crate::error::EditError;
use crate::geom::Point;
use crate::model::Polygon;

/// Move vertex `index` to `to`.
pub fn move_vertex(polygon: &Polygon, index: usize, to: Point) -> Result<Polygon, EditError> {
    if index >= polygon.points.len() {
        return Err(EditError::splice(format!(
            "vertex {index} out of range for {} points",
            polygon.points.len()
        )));
    }
    let mut points = polygon.points.clone();
    points[index] = to;
    Ok(polygon.with_points(points))
}

/// Remove vertex `index`; refused if fewer than 3 points would remain.
pub fn delete_vertex(polygon: &Polygon, index: usize) -> Result<Polygon, EditError> {
    let n = polygon.points.len();
    if index >= n {
        return Err(EditError::splice(format!("vertex {index} out of range for {n} points")));
    }
    if n - 1 < 3 {
        return Err(EditError::VertexDeleteTooFew { remaining: n - 1 });
    }
    let mut points = polygon.points.clone();
    points.remove(index);
    Ok(polygon.with_points(points))
}

/// Insert `new_points` between vertices `start` and `end`, keeping every
/// existing vertex and its order.
///
/// The chain is placed right after `min(start, end)`: in click order when
/// `start < end`, reversed otherwise, so it always runs from the lower index
/// towards the higher one. Vertices joined by the closing edge (`0` and
/// `n - 1`) get the chain after `n - 1`, running from `n - 1` back to `0`.
pub fn splice_points(
    polygon: &Polygon,
    start: usize,
    end: usize,
    new_points: &[Point],
) -> Result<Polygon, EditError> {
    let n = polygon.points.len();
    if start >= n || end >= n {
        return Err(EditError::splice(format!(
            "vertex indices ({start}, {end}) out of range for {n} points"
        )));
    }
    if start == end {
        return Err(EditError::splice("start and end vertex are the same"));
    }
    if new_points.is_empty() {
        return Err(EditError::NothingToCommit);
    }
    let closing = start.min(end) == 0 && start.max(end) == n - 1;
    let mut chain = new_points.to_vec();
    let at = if closing {
        if start == 0 {
            chain.reverse();
        }
        n
    } else {
        if start > end {
            chain.reverse();
        }
        start.min(end) + 1
    };
    let mut points = polygon.points.clone();
    points.splice(at..at, chain);
    Ok(polygon.with_points(points))
}
