//! Interactive editing state machine.
//!
//! Purpose
//! - Own the complete editor state `{mode, polygons, gesture, history, view}`
//!   as one explicit value and interpret input events against it.
//! - Commit every finished edit as a new immutable `PolygonSet` snapshot
//!   (exactly one history entry per commit); gestures in progress never touch
//!   the committed set.
//!
//! Flow
//! - Event (screen coords) → `Transform::screen_to_image` → per-mode handler
//!   → `commit` (history push) → caller reads `polygons()` / `display_polygons()`.
//! - `transition(&state, event)` is the pure form; `Editor::handle` is the
//!   in-place form used by it.
//!
//! Mode summary
//! - View: click selects the polygon under the pointer (or clears selection);
//!   Delete removes the selected polygon.
//! - EditVertices: press on a vertex starts a drag committed on release;
//!   double-click deletes the vertex (≥3 must remain); Shift+click switches to
//!   AddPoints anchored at that vertex.
//! - AddPoints: clicks collect TempPoints; clicking another vertex of the same
//!   polygon splices them in between the two vertices.
//! - CreatePolygon: clicks collect TempPoints; clicking near the first point
//!   (or Enter) with ≥3 points commits a new external polygon.
//! - Slice: click a polygon, then two clicks define the cutting line.
//! - DeletePolygon: click removes the polygon under the pointer.
//!
//! Escape cancels a live drag (staying in EditVertices) or otherwise discards
//! TempPoints and returns to View. It never rewinds committed history.

pub mod hit;
mod types;

use std::borrow::Cow;
use std::sync::Arc;

pub use types::{EditMode, Event, Interaction, Key, Modifiers, Outcome};

use crate::cfg::EditorCfg;
use crate::error::EditError;
use crate::geom::{Point, Size};
use crate::history::History;
use crate::model::{IdGen, Polygon, PolygonId, PolygonKind, PolygonSet, SegmentationData};
use crate::ops;
use crate::transform::Transform;

/// Full editor state. Cloning yields an independent copy; committed snapshots
/// are immutable and shared between copies, so a clone costs the transient
/// state plus one pointer per history entry.
#[derive(Clone, Debug)]
pub struct Editor {
    cfg: EditorCfg,
    mode: EditMode,
    polygons: Arc<PolygonSet>,
    loaded: Arc<PolygonSet>,
    image: Size,
    selected: Option<PolygonId>,
    interaction: Interaction,
    temp_points: Vec<Point>,
    history: History<Arc<PolygonSet>>,
    transform: Transform,
    ids: IdGen,
    revision: u64,
}

/// Pure transition: `(state, event) -> (state', result)`. The input state
/// and the result share every committed snapshot.
pub fn transition(state: &Editor, event: Event) -> (Editor, Result<Outcome, EditError>) {
    let mut next = state.clone();
    let res = next.handle(event);
    (next, res)
}

impl Editor {
    pub fn new(cfg: EditorCfg) -> Self {
        let ids = IdGen::new(cfg.id_seed);
        let empty = Arc::new(PolygonSet::new());
        let history = History::new(empty.clone(), cfg.history_limit);
        Self {
            cfg,
            mode: EditMode::View,
            polygons: empty.clone(),
            loaded: empty,
            image: Size::default(),
            selected: None,
            interaction: Interaction::Idle,
            temp_points: Vec::new(),
            history,
            transform: Transform::identity(),
            ids,
            revision: 0,
        }
    }

    // ----------------------------------------------------------------------
    // Load/commit boundary
    // ----------------------------------------------------------------------

    /// Replace everything with freshly loaded data (image switch). History
    /// restarts with the loaded set as its only entry.
    pub fn load(&mut self, data: SegmentationData) {
        tracing::debug!(polygons = data.polygons.len(), "load segmentation data");
        let set = Arc::new(data.polygons);
        self.image = data.image;
        self.loaded = set.clone();
        self.history.reset(set.clone());
        self.polygons = set;
        self.mode = EditMode::View;
        self.selected = None;
        self.cancel_gesture();
        self.revision += 1;
    }

    /// Lenient load straight from loader JSON.
    pub fn load_json(&mut self, value: &serde_json::Value) {
        let data = SegmentationData::from_json(value, &mut self.ids);
        self.load(data);
    }

    /// Discard all edits and history, returning to the set as loaded.
    pub fn reset(&mut self) {
        let data = SegmentationData {
            polygons: PolygonSet::clone(&self.loaded),
            image: self.image,
        };
        self.load(data);
    }

    fn commit(&mut self, next: PolygonSet) -> Outcome {
        let next = Arc::new(next);
        self.history.push(next.clone());
        self.polygons = next;
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            polygons = self.polygons.len(),
            history = self.history.len(),
            "commit"
        );
        Outcome::Committed
    }

    // ----------------------------------------------------------------------
    // Accessors
    // ----------------------------------------------------------------------

    /// Last committed set; what persistence should save.
    pub fn polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    /// Committed set with any live vertex drag applied, for rendering.
    pub fn display_polygons(&self) -> Cow<'_, PolygonSet> {
        if let Interaction::Dragging {
            polygon,
            vertex,
            current,
            ..
        } = &self.interaction
        {
            let moved = self
                .polygons
                .get(polygon)
                .and_then(|p| ops::move_vertex(p, *vertex, *current).ok())
                .and_then(|p| self.polygons.with_replaced(p));
            if let Some(set) = moved {
                return Cow::Owned(set);
            }
        }
        Cow::Borrowed(&*self.polygons)
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&PolygonId> {
        self.selected.as_ref()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn temp_points(&self) -> &[Point] {
        &self.temp_points
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, t: Transform) {
        self.transform = Transform::new(
            self.cfg.zoom.clamp(t.zoom),
            t.translate_x,
            t.translate_y,
        );
    }

    /// Fit the loaded image into `viewport`.
    pub fn fit_to(&mut self, viewport: Size) {
        self.transform = Transform::fit(self.image, viewport, &self.cfg.zoom);
    }

    pub fn image(&self) -> Size {
        self.image
    }

    pub fn cfg(&self) -> &EditorCfg {
        &self.cfg
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Bumped whenever the committed set changes (commit, undo, redo, load).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ----------------------------------------------------------------------
    // Event dispatch
    // ----------------------------------------------------------------------

    /// Apply one event. Rejections leave the committed set untouched.
    pub fn handle(&mut self, event: Event) -> Result<Outcome, EditError> {
        tracing::trace!(?event, mode = ?self.mode, "event");
        let res = match event {
            Event::SelectMode { mode } => Ok(self.select_mode(mode)),
            Event::Undo => Ok(self.undo()),
            Event::Redo => Ok(self.redo()),
            Event::Wheel { pos, factor } => {
                let next = self.transform.zoom_at(pos, factor, &self.cfg.zoom);
                Ok(self.set_view(next))
            }
            Event::Pan { dx, dy } => {
                let next = self.transform.pan(dx, dy);
                Ok(self.set_view(next))
            }
            Event::Key { key } => self.on_key(key),
            Event::PointerDown {
                pos,
                clicks,
                modifiers,
            } => {
                let p = self.transform.screen_to_image(pos);
                match self.mode {
                    EditMode::View => Ok(self.view_down(p)),
                    EditMode::EditVertices => self.edit_vertices_down(p, clicks, modifiers),
                    EditMode::AddPoints => self.add_points_down(p),
                    EditMode::CreatePolygon => Ok(self.create_down(p)),
                    EditMode::Slice => self.slice_down(p),
                    EditMode::DeletePolygon => Ok(self.delete_down(p)),
                }
            }
            Event::PointerMove { pos } => {
                let p = self.transform.screen_to_image(pos);
                Ok(self.pointer_move(p))
            }
            Event::PointerUp { pos } => {
                let p = self.transform.screen_to_image(pos);
                self.pointer_up(p)
            }
        };
        if let Err(e) = &res {
            tracing::warn!(error = %e, mode = ?self.mode, "edit rejected");
        }
        res
    }

    fn set_view(&mut self, next: Transform) -> Outcome {
        if next == self.transform {
            return Outcome::Ignored;
        }
        self.transform = next;
        Outcome::Changed
    }

    fn cancel_gesture(&mut self) {
        self.temp_points.clear();
        self.interaction = match self.mode {
            EditMode::Slice => Interaction::Slicing { target: None },
            _ => Interaction::Idle,
        };
    }

    fn enter_mode(&mut self, mode: EditMode) {
        if mode != self.mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "mode change");
        }
        self.mode = mode;
        self.cancel_gesture();
    }

    fn select_mode(&mut self, mode: EditMode) -> Outcome {
        self.enter_mode(mode);
        Outcome::Changed
    }

    fn restore(&mut self, snapshot: Arc<PolygonSet>) -> Outcome {
        self.polygons = snapshot;
        if let Some(id) = &self.selected {
            if self.polygons.get(id).is_none() {
                self.selected = None;
            }
        }
        self.revision += 1;
        Outcome::Restored
    }

    fn undo(&mut self) -> Outcome {
        self.cancel_gesture();
        match self.history.undo().cloned() {
            Some(s) => self.restore(s),
            None => Outcome::Ignored,
        }
    }

    fn redo(&mut self) -> Outcome {
        self.cancel_gesture();
        match self.history.redo().cloned() {
            Some(s) => self.restore(s),
            None => Outcome::Ignored,
        }
    }

    #[inline]
    fn vertex_tol(&self) -> f64 {
        self.transform.screen_len_to_image(self.cfg.vertex_hit_px)
    }

    #[inline]
    fn edge_tol(&self) -> f64 {
        self.transform.screen_len_to_image(self.cfg.edge_hit_px)
    }

    fn on_key(&mut self, key: Key) -> Result<Outcome, EditError> {
        match key {
            Key::Escape => {
                if matches!(self.interaction, Interaction::Dragging { .. }) {
                    self.interaction = Interaction::Idle;
                    return Ok(Outcome::Changed);
                }
                self.enter_mode(EditMode::View);
                Ok(Outcome::Changed)
            }
            Key::Enter if self.mode == EditMode::CreatePolygon => {
                if self.temp_points.len() >= 3 {
                    Ok(self.close_new_polygon())
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            Key::Delete if self.mode == EditMode::View => {
                let Some(id) = self.selected.clone() else {
                    return Ok(Outcome::Ignored);
                };
                let next = self
                    .polygons
                    .with_removed(&id)
                    .ok_or(EditError::UnknownPolygon(id))?;
                self.selected = None;
                Ok(self.commit(next))
            }
            _ => Ok(Outcome::Ignored),
        }
    }

    // ----------------------------------------------------------------------
    // Per-mode pointer handling
    // ----------------------------------------------------------------------

    fn view_down(&mut self, p: Point) -> Outcome {
        let hit = hit::polygon_at(&self.polygons, p, self.edge_tol()).map(|poly| poly.id.clone());
        if hit == self.selected {
            return Outcome::Ignored;
        }
        self.selected = hit;
        Outcome::Changed
    }

    fn edit_vertices_down(
        &mut self,
        p: Point,
        clicks: u8,
        modifiers: Modifiers,
    ) -> Result<Outcome, EditError> {
        let Some((id, vertex)) =
            hit::nearest_vertex(&self.polygons, p, self.vertex_tol(), self.selected.as_ref())
        else {
            return Ok(self.view_down(p));
        };
        self.selected = Some(id.clone());
        if modifiers.shift {
            self.enter_mode(EditMode::AddPoints);
            self.interaction = Interaction::AddingPoints {
                polygon: id,
                start_vertex: vertex,
            };
            return Ok(Outcome::Changed);
        }
        let polygon = self
            .polygons
            .get(&id)
            .ok_or_else(|| EditError::UnknownPolygon(id.clone()))?;
        if clicks >= 2 {
            self.interaction = Interaction::Idle;
            let edited = ops::delete_vertex(polygon, vertex)?;
            let next = self
                .polygons
                .with_replaced(edited)
                .ok_or(EditError::UnknownPolygon(id))?;
            return Ok(self.commit(next));
        }
        let origin = polygon.points[vertex];
        self.interaction = Interaction::Dragging {
            polygon: id,
            vertex,
            origin,
            current: origin,
        };
        Ok(Outcome::Changed)
    }

    fn pointer_move(&mut self, p: Point) -> Outcome {
        match &mut self.interaction {
            Interaction::Dragging { current, .. } => {
                *current = p;
                Outcome::Changed
            }
            _ => Outcome::Ignored,
        }
    }

    fn pointer_up(&mut self, p: Point) -> Result<Outcome, EditError> {
        let Interaction::Dragging {
            polygon,
            vertex,
            origin,
            ..
        } = std::mem::take(&mut self.interaction)
        else {
            return Ok(Outcome::Ignored);
        };
        if p == origin {
            return Ok(Outcome::Changed);
        }
        let source = self
            .polygons
            .get(&polygon)
            .ok_or_else(|| EditError::UnknownPolygon(polygon.clone()))?;
        let moved = ops::move_vertex(source, vertex, p)?;
        let next = self
            .polygons
            .with_replaced(moved)
            .ok_or(EditError::UnknownPolygon(polygon))?;
        Ok(self.commit(next))
    }

    fn add_points_down(&mut self, p: Point) -> Result<Outcome, EditError> {
        let tol = self.vertex_tol();
        let anchor = match &self.interaction {
            Interaction::AddingPoints {
                polygon,
                start_vertex,
            } => Some((polygon.clone(), *start_vertex)),
            _ => None,
        };
        let Some((polygon, start)) = anchor else {
            // No anchor yet: the first vertex click sets it.
            let Some((id, vertex)) =
                hit::nearest_vertex(&self.polygons, p, tol, self.selected.as_ref())
            else {
                return Ok(Outcome::Ignored);
            };
            self.selected = Some(id.clone());
            self.temp_points.clear();
            self.interaction = Interaction::AddingPoints {
                polygon: id,
                start_vertex: vertex,
            };
            return Ok(Outcome::Changed);
        };
        let target = self
            .polygons
            .get(&polygon)
            .ok_or_else(|| EditError::UnknownPolygon(polygon.clone()))?;
        match hit::vertex_at(target, p, tol) {
            Some(end) if end != start => {
                let edited = ops::splice_points(target, start, end, &self.temp_points)?;
                let next = self
                    .polygons
                    .with_replaced(edited)
                    .ok_or(EditError::UnknownPolygon(polygon))?;
                self.enter_mode(EditMode::View);
                Ok(self.commit(next))
            }
            Some(_) => Ok(Outcome::Ignored),
            None => {
                self.temp_points.push(p);
                Ok(Outcome::Changed)
            }
        }
    }

    fn create_down(&mut self, p: Point) -> Outcome {
        let close_tol = self.transform.screen_len_to_image(self.cfg.close_radius_px);
        if self.temp_points.len() >= 3 && self.temp_points[0].distance(p) <= close_tol {
            return self.close_new_polygon();
        }
        self.temp_points.push(p);
        Outcome::Changed
    }

    fn close_new_polygon(&mut self) -> Outcome {
        let points = std::mem::take(&mut self.temp_points);
        let id = self.ids.fresh(&self.polygons);
        let polygon = Polygon::new(id.clone(), points, PolygonKind::External);
        let Some(next) = self.polygons.with_added(polygon) else {
            return Outcome::Ignored;
        };
        self.selected = Some(id);
        self.enter_mode(EditMode::View);
        self.commit(next)
    }

    fn slice_down(&mut self, p: Point) -> Result<Outcome, EditError> {
        let target = match &self.interaction {
            Interaction::Slicing { target } => target.clone(),
            _ => None,
        };
        let Some(target) = target else {
            let hit = hit::polygon_at(&self.polygons, p, self.edge_tol()).map(|poly| poly.id.clone());
            return Ok(match hit {
                Some(id) => {
                    self.selected = Some(id.clone());
                    self.temp_points.clear();
                    self.interaction = Interaction::Slicing { target: Some(id) };
                    Outcome::Changed
                }
                None => Outcome::Ignored,
            });
        };
        if self.temp_points.is_empty() {
            self.temp_points.push(p);
            return Ok(Outcome::Changed);
        }
        let line_start = self.temp_points[0];
        self.temp_points.clear();
        let polygon = self
            .polygons
            .get(&target)
            .cloned()
            .ok_or_else(|| EditError::UnknownPolygon(target.clone()))?;
        let next = self.polygons.sliced(&polygon, line_start, p, &mut self.ids)?;
        self.selected = None;
        self.enter_mode(EditMode::View);
        Ok(self.commit(next))
    }

    fn delete_down(&mut self, p: Point) -> Outcome {
        let Some(id) = hit::polygon_at(&self.polygons, p, self.edge_tol()).map(|poly| poly.id.clone())
        else {
            return Outcome::Ignored;
        };
        let Some(next) = self.polygons.with_removed(&id) else {
            return Outcome::Ignored;
        };
        if self.selected.as_ref() == Some(&id) {
            self.selected = None;
        }
        self.commit(next)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorCfg::default())
    }
}
