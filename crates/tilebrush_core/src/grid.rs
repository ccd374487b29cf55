//! Coordinates and the grid storage contract

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Virtual tile index into a tileset
pub type TileId = u32;

/// Identifies an autotile group. Cells painted with the same brush share a group.
pub type GroupId = Uuid;

/// A cell coordinate.
///
/// The grid is y-down: row 0 is the top row, so north of `(x, y)` is `(x, y - 1)`.
/// Coordinates are signed so neighbor offsets of edge cells stay representable;
/// whether a position is addressable is up to [`AutotileGrid::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The 8 surrounding positions, clockwise starting from north
    pub fn surrounding(self) -> [TilePos; 8] {
        [
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(1, 0),
            self.offset(1, 1),
            self.offset(0, 1),
            self.offset(-1, 1),
            self.offset(-1, 0),
            self.offset(-1, -1),
        ]
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

// Row-major: everything in row 0 sorts before row 1.
impl Ord for TilePos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for TilePos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Storage the autotile engine reads group membership from and writes tile choices into.
///
/// The engine never owns grid storage. Any addressable 2D structure can be
/// resolved by implementing this trait.
pub trait AutotileGrid {
    /// Whether `pos` is inside the addressable area
    fn in_bounds(&self, pos: TilePos) -> bool;

    /// The autotile group painted at `pos`, or `None` for an empty cell
    fn group_at(&self, pos: TilePos) -> Option<GroupId>;

    /// Whether `neighbor` belongs to the same autotile group as `center`.
    ///
    /// Empty cells are never in a group, not even with other empty cells.
    fn is_same_group(&self, center: TilePos, neighbor: TilePos) -> bool {
        match (self.group_at(center), self.group_at(neighbor)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// The tile currently displayed at `pos`
    fn get_tile(&self, pos: TilePos) -> Option<TileId>;

    /// Display `tile` at `pos`
    fn set_tile(&mut self, pos: TilePos, tile: TileId);
}
