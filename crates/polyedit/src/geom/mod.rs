//! 2D geometry on closed, human-drawn point sequences.
//!
//! Purpose
//! - Provide the predicates and measures the editor and the metrics need:
//!   hit tests, distances, areas, winding, convex hull, minimum-area rectangle.
//! - Behave deterministically on degenerate input: short, collinear or
//!   duplicate points yield finite fallbacks, never panics.
//!
//! Code cross-refs: `crate::metrics`, `crate::slice`, `crate::editor::hit`

mod hull;
mod primitives;
mod rect;
mod types;

pub use hull::{convex_hull, is_proper_hull};
pub use primitives::{
    bounding_box, centroid, distance_to_segment, ensure_clockwise, is_clockwise, perimeter,
    point_in_polygon, polygons_intersect, segment_intersection, signed_area, simplify,
};
pub(crate) use primitives::edges;
pub use rect::{min_area_rect, MinAreaRect};
pub use types::{safe_div, BoundingBox, Point, Size, EPS};
