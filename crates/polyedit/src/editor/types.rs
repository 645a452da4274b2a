//! Editor modes, input events and transient gesture state.

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::model::PolygonId;

/// Exactly one mode is active; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    View,
    EditVertices,
    AddPoints,
    CreatePolygon,
    Slice,
    DeletePolygon,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Delete,
}

/// Input event. Pointer positions are in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SelectMode {
        mode: EditMode,
    },
    PointerDown {
        pos: Point,
        /// 1 for a single click, 2 for the second press of a double click.
        #[serde(default = "one")]
        clicks: u8,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Point,
    },
    PointerUp {
        pos: Point,
    },
    Key {
        key: Key,
    },
    /// Zoom by `factor` around `pos`.
    Wheel {
        pos: Point,
        factor: f64,
    },
    Pan {
        dx: f64,
        dy: f64,
    },
    Undo,
    Redo,
}

fn one() -> u8 {
    1
}

impl Event {
    pub fn click(x: f64, y: f64) -> Self {
        Event::PointerDown {
            pos: Point::new(x, y),
            clicks: 1,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Event::PointerDown {
            pos: Point::new(x, y),
            clicks: 2,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn shift_click(x: f64, y: f64) -> Self {
        Event::PointerDown {
            pos: Point::new(x, y),
            clicks: 1,
            modifiers: Modifiers::SHIFT,
        }
    }
}

/// Per-mode scratch state between events.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Live vertex drag; only `current` changes until release.
    Dragging {
        polygon: PolygonId,
        vertex: usize,
        origin: Point,
        current: Point,
    },
    /// AddPoints sequence anchored at `start_vertex`; clicks go to TempPoints.
    AddingPoints {
        polygon: PolygonId,
        start_vertex: usize,
    },
    /// Slice gesture; `target` is set by the first click.
    Slicing { target: Option<PolygonId> },
}

impl Interaction {
    pub fn is_adding_points(&self) -> bool {
        matches!(self, Interaction::AddingPoints { .. })
    }
}

/// What an event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing applicable at this position/state.
    Ignored,
    /// Transient state changed (selection, gesture, view); no history entry.
    Changed,
    /// A new polygon set was committed and pushed to history.
    Committed,
    /// Undo/redo moved to another history entry.
    Restored,
}
