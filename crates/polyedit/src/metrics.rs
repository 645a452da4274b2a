//! Shape descriptors of one external polygon with holes, for scientific export.
//!
//! Order of computation
//! 1. area (outer shoelace minus every hole), perimeter (outer only),
//!    equivalent diameter.
//! 2. convex hull of the outer points → convex perimeter and area
//!    (both 0 when the hull has fewer than 3 points).
//! 3. ratios: circularity (convex perimeter), compactness (raw perimeter),
//!    convexity, solidity, sphericity.
//! 4. minimum-area rectangle over the hull → Feret max/min/aspect ratio.
//! 5. principal axes from the vertex covariance (closed-form 2×2 eigenvalues).
//!
//! Every ratio uses `geom::safe_div`; all fields are finite for any input.
//! Holes are matched by kind only: every internal polygon passed in is
//! subtracted, whether or not the outer polygon actually encloses it.

use std::f64::consts::PI;

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::geom::{
    self, convex_hull, ensure_clockwise, is_proper_hull, min_area_rect, safe_div, MinAreaRect,
    Point,
};
use crate::model::{Polygon, PolygonId, PolygonSet};

/// Numeric record handed to export collaborators.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMetrics {
    pub area: f64,
    pub perimeter: f64,
    pub equivalent_diameter: f64,
    pub convex_perimeter: f64,
    pub convex_area: f64,
    pub circularity: f64,
    pub compactness: f64,
    pub convexity: f64,
    pub solidity: f64,
    pub sphericity: f64,
    pub feret_diameter_max: f64,
    pub feret_diameter_min: f64,
    pub feret_aspect_ratio: f64,
    pub major_axis_length: f64,
    pub minor_axis_length: f64,
    pub eccentricity: f64,
    /// Major-axis direction in degrees, in (-90, 90].
    pub orientation: f64,
    pub centroid: Point,
    pub min_area_rect: MinAreaRect,
}

/// Principal axes of a point cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Axes {
    pub major: f64,
    pub minor: f64,
    /// Radians.
    pub angle: f64,
}

/// Axis lengths `2·sqrt(λ)` from the eigenvalues of the population covariance
/// of `points`, via trace and determinant.
pub fn principal_axes(points: &[Point]) -> Axes {
    if points.is_empty() {
        return Axes::default();
    }
    let n = points.len() as f64;
    let mean = points
        .iter()
        .fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.to_vec())
        / n;
    let cov = points.iter().fold(Matrix2::zeros(), |acc, p| {
        let d = p.to_vec() - mean;
        acc + d * d.transpose()
    }) / n;
    let half_tr = 0.5 * cov.trace();
    let disc = (half_tr * half_tr - cov.determinant()).max(0.0).sqrt();
    let l1 = (half_tr + disc).max(0.0);
    let l2 = (half_tr - disc).max(0.0);
    Axes {
        major: 2.0 * l1.sqrt(),
        minor: 2.0 * l2.sqrt(),
        angle: 0.5 * (2.0 * cov[(0, 1)]).atan2(cov[(0, 0)] - cov[(1, 1)]),
    }
}

/// Compute the full record for `polygon`, subtracting every polygon in `holes`.
pub fn compute<'a>(polygon: &Polygon, holes: impl IntoIterator<Item = &'a Polygon>) -> ShapeMetrics {
    let points = &polygon.points;
    let hole_area: f64 = holes.into_iter().map(Polygon::area).sum();
    let area = geom::signed_area(points) - hole_area;
    let perimeter = geom::perimeter(points);
    let equivalent_diameter = (4.0 * area.max(0.0) / PI).sqrt();

    let hull = convex_hull(&ensure_clockwise(points));
    let (convex_perimeter, convex_area) = if is_proper_hull(&hull) {
        (geom::perimeter(&hull), geom::signed_area(&hull))
    } else {
        (0.0, 0.0)
    };

    let circularity = safe_div(4.0 * PI * area, convex_perimeter * convex_perimeter);
    let compactness = safe_div(4.0 * PI * area, perimeter * perimeter);
    let convexity = safe_div(convex_perimeter, perimeter);
    let solidity = safe_div(area, convex_area);
    let sphericity = safe_div(PI * equivalent_diameter, perimeter);

    let rect = min_area_rect(&hull);
    let feret_diameter_max = rect.width.max(rect.height);
    let feret_diameter_min = rect.width.min(rect.height);
    let feret_aspect_ratio = safe_div(feret_diameter_max, feret_diameter_min);

    let axes = principal_axes(points);
    let eccentricity = {
        let r = safe_div(axes.minor, axes.major);
        if axes.major > 0.0 {
            (1.0 - r * r).max(0.0).sqrt()
        } else {
            0.0
        }
    };

    ShapeMetrics {
        area,
        perimeter,
        equivalent_diameter,
        convex_perimeter,
        convex_area,
        circularity,
        compactness,
        convexity,
        solidity,
        sphericity,
        feret_diameter_max,
        feret_diameter_min,
        feret_aspect_ratio,
        major_axis_length: axes.major,
        minor_axis_length: axes.minor,
        eccentricity,
        orientation: axes.angle.to_degrees(),
        centroid: geom::centroid(points),
        min_area_rect: rect,
    }
}

impl PolygonSet {
    /// Metrics for one polygon, with every hole in the set subtracted.
    pub fn metrics_for(&self, id: &PolygonId) -> Option<ShapeMetrics> {
        let polygon = self.get(id)?;
        Some(compute(polygon, self.holes()))
    }

    /// One record per external polygon, in set order.
    pub fn metrics(&self) -> Vec<(PolygonId, ShapeMetrics)> {
        self.externals()
            .map(|p| (p.id.clone(), compute(p, self.holes())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PolygonKind;

    fn poly(id: &str, kind: PolygonKind, pts: &[(f64, f64)]) -> Polygon {
        Polygon::new(
            PolygonId::new(id),
            pts.iter().copied().map(Point::from).collect(),
            kind,
        )
    }

    fn square(side: f64) -> Polygon {
        poly(
            "sq",
            PolygonKind::External,
            &[(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)],
        )
    }

    fn assert_all_finite(m: &ShapeMetrics) {
        let fields = [
            m.area,
            m.perimeter,
            m.equivalent_diameter,
            m.convex_perimeter,
            m.convex_area,
            m.circularity,
            m.compactness,
            m.convexity,
            m.solidity,
            m.sphericity,
            m.feret_diameter_max,
            m.feret_diameter_min,
            m.feret_aspect_ratio,
            m.major_axis_length,
            m.minor_axis_length,
            m.eccentricity,
            m.orientation,
            m.centroid.x,
            m.centroid.y,
        ];
        assert!(fields.iter().all(|v| v.is_finite()), "{m:?}");
    }

    #[test]
    fn square_reference_values() {
        let m = compute(&square(10.0), []);
        assert!((m.area - 100.0).abs() < 1e-9);
        assert!((m.perimeter - 40.0).abs() < 1e-9);
        assert!((m.equivalent_diameter - 11.283_791_670_955_125).abs() < 1e-9);
        assert!((m.convex_area - 100.0).abs() < 1e-9);
        assert!((m.convex_perimeter - 40.0).abs() < 1e-9);
        assert!((m.solidity - 1.0).abs() < 1e-9);
        assert!((m.convexity - 1.0).abs() < 1e-9);
        assert!((m.circularity - PI / 4.0).abs() < 1e-9);
        assert!((m.compactness - m.circularity).abs() < 1e-9);
        assert!((m.feret_diameter_max - 10.0).abs() < 1e-9);
        assert!((m.feret_diameter_min - 10.0).abs() < 1e-9);
        assert!((m.feret_aspect_ratio - 1.0).abs() < 1e-9);
        assert!((m.major_axis_length - m.minor_axis_length).abs() < 1e-9);
        // vertex covariance of the square is 25·I → axis 2·5
        assert!((m.major_axis_length - 10.0).abs() < 1e-9);
        assert!(m.eccentricity.abs() < 1e-6);
        assert!((m.centroid.x - 5.0).abs() < 1e-9);
        assert_all_finite(&m);
    }

    #[test]
    fn concave_polygon_has_lower_solidity() {
        let l_shape = poly(
            "l",
            PolygonKind::External,
            &[
                (0.0, 0.0),
                (10.0, 0.0),
                (10.0, 5.0),
                (5.0, 5.0),
                (5.0, 10.0),
                (0.0, 10.0),
            ],
        );
        let m = compute(&l_shape, []);
        assert!((m.area - 75.0).abs() < 1e-9);
        assert!((m.convex_area - 87.5).abs() < 1e-9);
        assert!(m.solidity < 1.0);
        assert!(m.convexity < 1.0);
        // circularity uses the shorter convex perimeter
        assert!(m.circularity > m.compactness);
        assert_all_finite(&m);
    }

    #[test]
    fn holes_are_always_subtracted() {
        let hole = poly(
            "h",
            PolygonKind::Internal,
            &[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)],
        );
        // not enclosed, still subtracted
        let stray = poly(
            "s",
            PolygonKind::Internal,
            &[(50.0, 50.0), (51.0, 50.0), (51.0, 51.0), (50.0, 51.0)],
        );
        let outer = square(10.0);
        let set = PolygonSet::from_polygons(vec![outer, hole, stray]);
        let all = set.metrics();
        assert_eq!(all.len(), 1);
        let m = &all[0].1;
        assert!((m.area - 95.0).abs() < 1e-9);
        assert!((m.perimeter - 40.0).abs() < 1e-9);
        assert!((m.solidity - 0.95).abs() < 1e-9);
        assert_eq!(set.metrics_for(&PolygonId::new("sq")).as_ref(), Some(m));
    }

    #[test]
    fn rectangle_feret_and_axes() {
        let r = poly(
            "r",
            PolygonKind::External,
            &[(0.0, 0.0), (20.0, 0.0), (20.0, 5.0), (0.0, 5.0)],
        );
        let m = compute(&r, []);
        assert!((m.feret_diameter_max - 20.0).abs() < 1e-9);
        assert!((m.feret_diameter_min - 5.0).abs() < 1e-9);
        assert!((m.feret_aspect_ratio - 4.0).abs() < 1e-9);
        assert!(m.major_axis_length > m.minor_axis_length);
        assert!(m.orientation.abs() < 1e-9);
        assert!(m.eccentricity > 0.9);
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        let cases: Vec<Vec<(f64, f64)>> = vec![
            vec![],
            vec![(3.0, 3.0)],
            vec![(0.0, 0.0), (5.0, 0.0)],
            vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)],
            vec![(1.0, 1.0); 4],
        ];
        for pts in cases {
            let m = compute(&poly("d", PolygonKind::External, &pts), []);
            assert_all_finite(&m);
            assert_eq!(m.convex_area, 0.0);
            assert_eq!(m.solidity, 0.0);
        }
        // hole larger than the outer polygon: negative area, still finite
        let big_hole = poly(
            "h",
            PolygonKind::Internal,
            &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
        );
        let m = compute(&square(1.0), [&big_hole]);
        assert!(m.area < 0.0);
        assert_eq!(m.equivalent_diameter, 0.0);
        assert_all_finite(&m);
    }
}
