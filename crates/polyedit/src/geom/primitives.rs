//! Point/segment/polygon predicates and measures on closed point sequences.
//!
//! Conventions
//! - A polygon is an ordered `&[Point]` with an implicit closing edge.
//! - Orientation uses the y-up shoelace sign: positive signed area is
//!   counterclockwise. Zero-area input counts as clockwise (nothing to flip).
//! - Nothing here panics or returns NaN on short or degenerate input.

use super::types::{safe_div, BoundingBox, Point, EPS};

/// Iterate the closed edges `(points[i], points[i+1 mod n])`.
#[inline]
pub(crate) fn edges(points: &[Point]) -> impl Iterator<Item = (usize, Point, Point)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (i, points[i], points[(i + 1) % n]))
}

#[inline]
pub(crate) fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Even-odd ray casting. Horizontal and zero-length edges never toggle parity.
pub fn point_in_polygon(p: Point, points: &[Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    for (_, a, b) in edges(points) {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Euclidean distance from `p` to the closed segment `vw`.
pub fn distance_to_segment(p: Point, v: Point, w: Point) -> f64 {
    let l2 = (w.x - v.x).powi(2) + (w.y - v.y).powi(2);
    if l2 < EPS {
        return p.distance(v);
    }
    let t = ((p.x - v.x) * (w.x - v.x) + (p.y - v.y) * (w.y - v.y)) / l2;
    p.distance(v.lerp(w, t.clamp(0.0, 1.0)))
}

/// Twice the signed shoelace area (positive = counterclockwise in y-up).
fn shoelace2(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    edges(points).map(|(_, a, b)| a.x * b.y - b.x * a.y).sum()
}

/// Shoelace area, reported as an absolute value; 0 for fewer than 3 points.
pub fn signed_area(points: &[Point]) -> f64 {
    (0.5 * shoelace2(points)).abs()
}

/// Sum of closed edge lengths; 0 for fewer than 2 points.
pub fn perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    edges(points).map(|(_, a, b)| a.distance(b)).sum()
}

#[inline]
pub fn is_clockwise(points: &[Point]) -> bool {
    shoelace2(points) <= 0.0
}

/// Return the points in clockwise order, reversing only when needed.
pub fn ensure_clockwise(points: &[Point]) -> Vec<Point> {
    let mut out = points.to_vec();
    if !is_clockwise(points) {
        out.reverse();
    }
    out
}

pub fn bounding_box(points: &[Point]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };
    points.iter().skip(1).fold(
        BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        },
        |bb, p| BoundingBox {
            min_x: bb.min_x.min(p.x),
            min_y: bb.min_y.min(p.y),
            max_x: bb.max_x.max(p.x),
            max_y: bb.max_y.max(p.y),
        },
    )
}

/// Intersection of segments `p1p2` and `p3p4`; `None` when parallel or disjoint.
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let a1 = p2.y - p1.y;
    let b1 = p1.x - p2.x;
    let c1 = a1 * p1.x + b1 * p1.y;
    let a2 = p4.y - p3.y;
    let b2 = p3.x - p4.x;
    let c2 = a2 * p3.x + b2 * p3.y;
    let det = a1 * b2 - a2 * b1;
    if det.abs() < EPS {
        return None;
    }
    let ip = Point::new((b2 * c1 - b1 * c2) / det, (a1 * c2 - a2 * c1) / det);
    let within = |a: Point, b: Point| {
        let tol = 1e-9;
        a.x.min(b.x) - tol <= ip.x
            && ip.x <= a.x.max(b.x) + tol
            && a.y.min(b.y) - tol <= ip.y
            && ip.y <= a.y.max(b.y) + tol
    };
    (within(p1, p2) && within(p3, p4)).then_some(ip)
}

/// True if either polygon has a vertex inside the other or any edges cross.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    if a.iter().any(|&p| point_in_polygon(p, b)) || b.iter().any(|&p| point_in_polygon(p, a)) {
        return true;
    }
    edges(a).any(|(_, p1, p2)| {
        edges(b).any(|(_, p3, p4)| segment_intersection(p1, p2, p3, p4).is_some())
    })
}

/// Area-weighted centroid; falls back to the vertex mean for zero-area input.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let a2 = shoelace2(points);
    if a2.abs() < EPS {
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Point::new(sx / n, sy / n);
    }
    let (cx, cy) = edges(points).fold((0.0, 0.0), |(cx, cy), (_, a, b)| {
        let f = a.x * b.y - b.x * a.y;
        (cx + (a.x + b.x) * f, cy + (a.y + b.y) * f)
    });
    Point::new(safe_div(cx, 3.0 * a2), safe_div(cy, 3.0 * a2))
}

/// Douglas–Peucker simplification of a closed polygon.
///
/// Tolerance is `epsilon` percent of the perimeter. The result keeps at least
/// 3 points; if simplification would go below that, the input is returned.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 3 || !(epsilon > 0.0) {
        return points.to_vec();
    }
    let tol = epsilon * perimeter(points) * 0.01;
    // Split the ring at vertex 0 and the vertex farthest from it.
    let far = (1..points.len())
        .max_by(|&i, &j| points[0].distance(points[i]).total_cmp(&points[0].distance(points[j])))
        .unwrap_or(1);
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[far] = true;
    dp_mark(points, 0, far, tol, &mut keep);
    let tail: Vec<Point> = points[far..]
        .iter()
        .copied()
        .chain(std::iter::once(points[0]))
        .collect();
    let mut keep_tail = vec![false; tail.len()];
    dp_mark(&tail, 0, tail.len() - 1, tol, &mut keep_tail);
    for (k, flag) in keep_tail.iter().enumerate().take(tail.len() - 1) {
        if *flag {
            keep[far + k] = true;
        }
    }
    let out: Vec<Point> = points
        .iter()
        .zip(&keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect();
    if out.len() < 3 {
        points.to_vec()
    } else {
        out
    }
}

fn dp_mark(points: &[Point], lo: usize, hi: usize, tol: f64, keep: &mut [bool]) {
    if hi <= lo + 1 {
        return;
    }
    let (mut idx, mut dmax) = (lo, 0.0);
    for k in (lo + 1)..hi {
        let d = distance_to_segment(points[k], points[lo], points[hi]);
        if d > dmax {
            idx = k;
            dmax = d;
        }
    }
    if dmax > tol {
        keep[idx] = true;
        dp_mark(points, lo, idx, tol, keep);
        dp_mark(points, idx, hi, tol, keep);
    }
}
