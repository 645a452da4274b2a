//! Polygon data model: immutable polygon values and the per-image polygon set.
//!
//! - `Polygon` values are never mutated in place; every edit builds a new one.
//! - `PolygonSet` is ordered and unique by id. Hole ownership is not stored:
//!   holes are found by filtering on `PolygonKind::Internal`.
//! - `PolygonSet::from_json` is the lenient loader for externally supplied
//!   data; malformed fields are coerced, logged and never rejected.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geom::{self, Point, Size};

/// Opaque unique polygon token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonId(pub String);

impl PolygonId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outer boundary or hole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonKind {
    #[default]
    External,
    Internal,
}

/// Closed contour with an implicit closing edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: PolygonId,
    pub points: Vec<Point>,
    #[serde(rename = "type", default)]
    pub kind: PolygonKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Polygon {
    pub fn new(id: PolygonId, points: Vec<Point>, kind: PolygonKind) -> Self {
        Self {
            id,
            points,
            kind,
            label: None,
        }
    }

    /// At least 3 points.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
    }

    #[inline]
    pub fn is_hole(&self) -> bool {
        self.kind == PolygonKind::Internal
    }

    /// Same id, kind and label with a new point sequence.
    pub fn with_points(&self, points: Vec<Point>) -> Self {
        Self {
            id: self.id.clone(),
            points,
            kind: self.kind,
            label: self.label.clone(),
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        geom::signed_area(&self.points)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        geom::point_in_polygon(p, &self.points)
    }
}

/// Fresh-id source. Seeded for reproducible sessions, entropy otherwise.
#[derive(Clone, Debug)]
pub struct IdGen {
    rng: StdRng,
}

impl IdGen {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Draw an id not present in `taken`.
    pub fn fresh(&mut self, taken: &PolygonSet) -> PolygonId {
        loop {
            let id = PolygonId(format!("poly-{:016x}", self.rng.gen::<u64>()));
            if taken.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Ordered polygons of one image, unique by id. Deserializing goes through
/// `from_polygons`, so repeated ids keep their first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolygonList")]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

#[derive(Deserialize)]
struct PolygonList {
    #[serde(default)]
    polygons: Vec<Polygon>,
}

impl From<PolygonList> for PolygonSet {
    fn from(list: PolygonList) -> Self {
        PolygonSet::from_polygons(list.polygons)
    }
}

impl PolygonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, keeping the first polygon for each repeated id.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut seen = HashSet::new();
        let polygons = polygons
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        Self { polygons }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn get(&self, id: &PolygonId) -> Option<&Polygon> {
        self.polygons.iter().find(|p| &p.id == id)
    }

    pub fn position(&self, id: &PolygonId) -> Option<usize> {
        self.polygons.iter().position(|p| &p.id == id)
    }

    pub fn externals(&self) -> impl Iterator<Item = &Polygon> {
        self.polygons.iter().filter(|p| !p.is_hole())
    }

    /// Every internal polygon in the set, regardless of which outer one encloses it.
    pub fn holes(&self) -> impl Iterator<Item = &Polygon> {
        self.polygons.iter().filter(|p| p.is_hole())
    }

    /// New set with `polygon` appended; `None` if its id is taken.
    pub fn with_added(&self, polygon: Polygon) -> Option<Self> {
        if self.get(&polygon.id).is_some() {
            return None;
        }
        let mut polygons = self.polygons.clone();
        polygons.push(polygon);
        Some(Self { polygons })
    }

    /// New set with the polygon of the same id swapped for `polygon`.
    pub fn with_replaced(&self, polygon: Polygon) -> Option<Self> {
        let idx = self.position(&polygon.id)?;
        let mut polygons = self.polygons.clone();
        polygons[idx] = polygon;
        Some(Self { polygons })
    }

    pub fn with_removed(&self, id: &PolygonId) -> Option<Self> {
        let idx = self.position(id)?;
        let mut polygons = self.polygons.clone();
        polygons.remove(idx);
        Some(Self { polygons })
    }

    /// New set with `id` removed and `parts` inserted at its position.
    pub fn with_split(&self, id: &PolygonId, parts: Vec<Polygon>) -> Option<Self> {
        let idx = self.position(id)?;
        if parts
            .iter()
            .any(|p| &p.id != id && self.get(&p.id).is_some())
        {
            return None;
        }
        let mut polygons = self.polygons.clone();
        polygons.splice(idx..=idx, parts);
        Some(Self { polygons })
    }

    /// Lenient decode of loader output.
    ///
    /// Accepts either a bare array of polygons or `{"polygons": [...]}`.
    /// Coercions: non-numeric or non-finite coordinates become 0, points given
    /// as `[x, y]` pairs are accepted, an unknown or missing `type` is
    /// external, a missing or repeated id gets a fresh one. Non-object entries
    /// are skipped.
    pub fn from_json(value: &Value, ids: &mut IdGen) -> Self {
        let entries: &[Value] = match value {
            Value::Array(a) => a,
            Value::Object(o) => match o.get("polygons") {
                Some(Value::Array(a)) => a,
                _ => &[],
            },
            _ => &[],
        };
        let mut set = PolygonSet::new();
        for (k, entry) in entries.iter().enumerate() {
            let Value::Object(obj) = entry else {
                tracing::warn!(index = k, "skipping non-object polygon entry");
                continue;
            };
            let points = match obj.get("points") {
                Some(Value::Array(pts)) => pts.iter().map(coerce_point).collect(),
                _ => {
                    tracing::warn!(index = k, "polygon without points array");
                    Vec::new()
                }
            };
            let kind = match obj.get("type").and_then(Value::as_str) {
                Some("internal") => PolygonKind::Internal,
                Some("external") => PolygonKind::External,
                other => {
                    tracing::warn!(index = k, kind = ?other, "coercing polygon type to external");
                    PolygonKind::External
                }
            };
            let id = match obj.get("id") {
                Some(Value::String(s)) if !s.is_empty() => Some(PolygonId::new(s.clone())),
                Some(Value::Number(n)) => Some(PolygonId::new(n.to_string())),
                _ => None,
            };
            let id = match id {
                Some(id) if set.get(&id).is_none() => id,
                _ => {
                    let fresh = ids.fresh(&set);
                    tracing::warn!(index = k, id = %fresh, "assigned fresh polygon id");
                    fresh
                }
            };
            let label = obj
                .get("label")
                .or_else(|| obj.get("class"))
                .and_then(Value::as_str)
                .map(str::to_owned);
            set.polygons.push(Polygon {
                id,
                points,
                kind,
                label,
            });
        }
        set
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

fn coerce_coord(v: Option<&Value>) -> f64 {
    v.and_then(Value::as_f64)
        .filter(|x| x.is_finite())
        .unwrap_or(0.0)
}

fn coerce_point(v: &Value) -> Point {
    match v {
        Value::Object(o) => Point::new(coerce_coord(o.get("x")), coerce_coord(o.get("y"))),
        Value::Array(a) => Point::new(coerce_coord(a.first()), coerce_coord(a.get(1))),
        _ => {
            tracing::warn!(value = %v, "coercing malformed point to origin");
            Point::default()
        }
    }
}

/// Everything the loader hands over for one image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentationData {
    pub polygons: PolygonSet,
    pub image: Size,
}

impl SegmentationData {
    /// Decode `{"polygons": [...], "imageWidth": w, "imageHeight": h}` (or a
    /// nested `"image": {"width", "height"}`); missing sizes become 0.
    pub fn from_json(value: &Value, ids: &mut IdGen) -> Self {
        let polygons = PolygonSet::from_json(value, ids);
        let image = match value.get("image") {
            Some(img) => Size::new(
                coerce_coord(img.get("width")),
                coerce_coord(img.get("height")),
            ),
            None => Size::new(
                coerce_coord(value.get("imageWidth")),
                coerce_coord(value.get("imageHeight")),
            ),
        };
        Self { polygons, image }
    }

    /// Canonical form accepted back by `from_json`.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "polygons": self.polygons.as_slice(),
            "image": self.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sq(id: &str, kind: PolygonKind) -> Polygon {
        Polygon::new(
            PolygonId::new(id),
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ],
            kind,
        )
    }

    #[test]
    fn set_is_unique_by_id_and_edits_are_copies() {
        let set = PolygonSet::from_polygons(vec![
            sq("a", PolygonKind::External),
            sq("a", PolygonKind::Internal),
            sq("h", PolygonKind::Internal),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.externals().count(), 1);
        assert_eq!(set.holes().count(), 1);
        assert!(set.with_added(sq("h", PolygonKind::External)).is_none());

        let removed = set.with_removed(&PolygonId::new("a")).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(set.len(), 2);

        let split = set
            .with_split(
                &PolygonId::new("a"),
                vec![sq("b", PolygonKind::External), sq("c", PolygonKind::External)],
            )
            .unwrap();
        let ids: Vec<&str> = split.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "h"]);
    }

    #[test]
    fn loader_coerces_malformed_input() {
        let mut ids = IdGen::new(Some(7));
        let data = json!({
            "polygons": [
                {"id": "p1", "points": [{"x": 1, "y": 2}, {"x": "bad"}, [3.5, 4]], "type": "external"},
                {"id": "p1", "points": [], "type": "internal"},
                {"points": [{"x": 0, "y": 0}], "type": "weird"},
                "garbage",
                {"id": 42, "points": null}
            ],
            "imageWidth": 640,
            "imageHeight": 480
        });
        let loaded = SegmentationData::from_json(&data, &mut ids);
        let set = &loaded.polygons;
        assert_eq!(set.len(), 4);
        let first = &set.as_slice()[0];
        assert_eq!(
            first.points,
            vec![Point::new(1.0, 2.0), Point::new(0.0, 0.0), Point::new(3.5, 4.0)]
        );
        // repeated id gets a fresh one, kind kept
        assert_ne!(set.as_slice()[1].id, first.id);
        assert!(set.as_slice()[1].is_hole());
        assert_eq!(set.as_slice()[2].kind, PolygonKind::External);
        assert_eq!(set.as_slice()[3].id.as_str(), "42");
        assert!(set.as_slice()[3].points.is_empty());
        assert_eq!(loaded.image, Size::new(640.0, 480.0));
    }

    #[test]
    fn saved_json_loads_back_unchanged() {
        let data = SegmentationData {
            polygons: PolygonSet::from_polygons(vec![
                sq("a", PolygonKind::External),
                sq("h", PolygonKind::Internal),
            ]),
            image: Size::new(20.0, 10.0),
        };
        let mut ids = IdGen::new(Some(3));
        assert_eq!(SegmentationData::from_json(&data.to_json(), &mut ids), data);
    }

    #[test]
    fn seeded_ids_are_reproducible() {
        let set = PolygonSet::new();
        let a = IdGen::new(Some(1)).fresh(&set);
        let b = IdGen::new(Some(1)).fresh(&set);
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("poly-"));
    }

    #[test]
    fn deserialize_drops_repeated_ids() {
        let v = json!({"polygons": [
            serde_json::to_value(sq("a", PolygonKind::External)).unwrap(),
            serde_json::to_value(sq("a", PolygonKind::Internal)).unwrap(),
            serde_json::to_value(sq("b", PolygonKind::External)).unwrap(),
        ]});
        let set: PolygonSet = serde_json::from_value(v).unwrap();
        let ids: Vec<&str> = set.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(!set.get(&PolygonId::new("a")).unwrap().is_hole());
        let back: PolygonSet = serde_json::from_value(serde_json::to_value(&set).unwrap()).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn serde_uses_type_field() {
        let p = sq("a", PolygonKind::Internal);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "internal");
        let back: Polygon = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
    }
}
