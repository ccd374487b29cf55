//! Owned tile layer implementing the grid contract

use crate::grid::{AutotileGrid, GroupId, TileId, TilePos};
use serde::{Deserialize, Serialize};

/// A painted cell: the brush group it belongs to and the tile chosen for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCell {
    pub group: GroupId,
    /// `None` until the autotiler has resolved this cell
    pub tile: Option<TileId>,
}

/// A rectangular tile layer stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Cell data - None means empty
    cells: Vec<Option<TileCell>>,
}

impl TileLayer {
    /// Create an empty layer
    pub fn new(name: String, width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            name,
            width,
            height,
            cells: vec![None; size],
        }
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y as u32 * self.width + pos.x as u32) as usize)
        } else {
            None
        }
    }

    /// Get the cell at a position
    pub fn cell(&self, pos: TilePos) -> Option<&TileCell> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Paint `group` at `pos`. Returns `false` if `pos` is outside the layer.
    ///
    /// Repainting with the same group keeps the resolved tile; switching group clears it.
    pub fn paint(&mut self, pos: TilePos, group: GroupId) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        let tile = match self.cells[idx] {
            Some(cell) if cell.group == group => cell.tile,
            _ => None,
        };
        self.cells[idx] = Some(TileCell { group, tile });
        true
    }

    /// Clear the cell at `pos`. Returns `false` if `pos` is outside the layer.
    pub fn erase(&mut self, pos: TilePos) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        self.cells[idx] = None;
        true
    }

    /// Snapshot of the displayed tiles in row-major order
    pub fn tiles(&self) -> Vec<Option<TileId>> {
        self.cells.iter().map(|c| c.and_then(|c| c.tile)).collect()
    }

    /// Positions of all painted cells in row-major order
    pub fn painted_positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref().map(|_| {
                let idx = idx as u32;
                TilePos::new((idx % width) as i32, (idx / width) as i32)
            })
        })
    }
}

impl AutotileGrid for TileLayer {
    fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn group_at(&self, pos: TilePos) -> Option<GroupId> {
        self.cell(pos).map(|c| c.group)
    }

    fn get_tile(&self, pos: TilePos) -> Option<TileId> {
        self.cell(pos).and_then(|c| c.tile)
    }

    fn set_tile(&mut self, pos: TilePos, tile: TileId) {
        if let Some(idx) = self.index(pos) {
            if let Some(cell) = self.cells[idx].as_mut() {
                cell.tile = Some(tile);
            }
        }
    }
}
