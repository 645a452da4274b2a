//! Polygon segmentation editing core.
//!
//! Layers (bottom-up)
//! - `geom`: points, orientation, containment, hull, minimum-area rectangle.
//! - `model`: polygon identity and immutable `PolygonSet` snapshots; lenient loader.
//! - `metrics`, `slice`, `ops`: pure computations over polygons.
//! - `transform`, `history`, `editor`: view mapping, undo/redo, and the
//!   interaction state machine that drives edits from input events.
//!
//! Nothing here renders or persists; callers feed events in and read the
//! committed `PolygonSet` back out.

pub mod cfg;
pub mod editor;
pub mod error;
pub mod geom;
pub mod history;
pub mod metrics;
pub mod model;
pub mod ops;
pub mod slice;
pub mod transform;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::EditError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::EditorCfg;
    pub use crate::editor::{transition, EditMode, Editor, Event, Interaction, Key, Modifiers, Outcome};
    pub use crate::error::EditError;
    pub use crate::geom::{BoundingBox, Point, Size};
    pub use crate::history::History;
    pub use crate::metrics::ShapeMetrics;
    pub use crate::model::{IdGen, Polygon, PolygonId, PolygonKind, PolygonSet, SegmentationData};
    pub use crate::transform::{Transform, ZoomLimits};
}
