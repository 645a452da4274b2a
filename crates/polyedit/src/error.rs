//! Rejected-operation errors.
//!
//! These are the only failures the crate reports. Each one leaves the polygon
//! set at its last committed state; callers surface them to the user.

use std::fmt;

use crate::model::PolygonId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditError {
    /// The slicing line crossed the polygon boundary `found` times (exactly 2 required).
    SliceCrossings { found: usize },
    /// A slice piece ended up with fewer than 3 points.
    SliceDegenerate,
    /// Deleting a vertex would leave `remaining` points.
    VertexDeleteTooFew { remaining: usize },
    InvalidSplice { reason: String },
    UnknownPolygon(PolygonId),
    NothingToCommit,
}

impl EditError {
    pub(crate) fn splice(reason: impl Into<String>) -> Self {
        Self::InvalidSplice {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SliceCrossings { found } => {
                write!(f, "slice line must cross the polygon exactly twice (found {found})")
            }
            Self::SliceDegenerate => write!(f, "slice would produce a polygon with fewer than 3 points"),
            Self::VertexDeleteTooFew { remaining } => {
                write!(f, "cannot delete vertex: only {remaining} points would remain")
            }
            Self::InvalidSplice { reason } => write!(f, "invalid point insertion: {reason}"),
            Self::UnknownPolygon(id) => write!(f, "no polygon with id {id}"),
            Self::NothingToCommit => write!(f, "nothing to commit"),
        }
    }
}

impl std::error::Error for EditError {}
