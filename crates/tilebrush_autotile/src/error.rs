//! Configuration errors
//!
//! Only malformed brush data is an error. A mask with no authored entry is
//! reported as a [`NoMatch`](crate::matcher::NoMatch) diagnostic instead.

use crate::brush::AutotileMode;
use crate::mask::NeighborMask;
use thiserror::Error;
use tilebrush_core::{GroupId, TileId};

/// Errors raised while building or validating brushes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutotileError {
    #[error("brush '{name}' has no populated entries")]
    EmptyBrush { name: String },
    #[error("mask {mask:#010b} is not a canonical {} key", .mode.name())]
    NonCanonicalMask {
        mask: NeighborMask,
        mode: AutotileMode,
    },
    #[error("brush '{brush}' mask {mask:#010b}: tile {tile} has invalid weight {weight}")]
    InvalidWeight {
        brush: String,
        mask: NeighborMask,
        tile: TileId,
        weight: f32,
    },
    #[error("no brush registered for group {0}")]
    UnknownBrush(GroupId),
    #[error("brush {0} is registered more than once")]
    DuplicateBrush(GroupId),
    #[error("Parse error: {0}")]
    Parse(String),
}
