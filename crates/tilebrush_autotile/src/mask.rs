//! Neighbor bitmask computation
//!
//! A cell's bitmask records which surrounding cells belong to the same
//! autotile group. The bit layout depends on the brush mode:
//!
//! ```text
//! 3x3 modes            Edge2x2
//! NW(128) N(1) NE(2)        N(1)
//!  W(64)   *   E(4)    W(8)  *  E(2)
//! SW(32) S(16) SE(8)        S(4)
//! ```
//!
//! The grid is y-down, so north is `(x, y - 1)`.

use crate::brush::AutotileMode;
use tilebrush_core::{AutotileGrid, TilePos};

/// Neighbor-occupancy bitmask. Only the low 4 bits are used in `Edge2x2` mode.
pub type NeighborMask = u8;

/// Direction flags for the 3x3 modes
pub mod neighbors {
    use super::NeighborMask;

    pub const N: NeighborMask = 0b0000_0001; // North
    pub const NE: NeighborMask = 0b0000_0010; // Northeast (corner)
    pub const E: NeighborMask = 0b0000_0100; // East
    pub const SE: NeighborMask = 0b0000_1000; // Southeast (corner)
    pub const S: NeighborMask = 0b0001_0000; // South
    pub const SW: NeighborMask = 0b0010_0000; // Southwest (corner)
    pub const W: NeighborMask = 0b0100_0000; // West
    pub const NW: NeighborMask = 0b1000_0000; // Northwest (corner)

    pub const ORTHOGONAL: NeighborMask = N | E | S | W;
    pub const DIAGONAL: NeighborMask = NE | SE | SW | NW;
}

/// Direction flags for `Edge2x2` mode
pub mod edges {
    use super::NeighborMask;

    pub const N: NeighborMask = 0b0001;
    pub const E: NeighborMask = 0b0010;
    pub const S: NeighborMask = 0b0100;
    pub const W: NeighborMask = 0b1000;

    pub const ALL: NeighborMask = N | E | S | W;
}

// Offsets in bit order, least significant first
const OFFSETS_3X3: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

const OFFSETS_2X2: [(i32, i32); 4] = [
    (0, -1), // N
    (1, 0),  // E
    (0, 1),  // S
    (-1, 0), // W
];

/// Neighbor offsets sampled by `mode`, where index `i` sets bit `1 << i`
pub fn neighbor_offsets(mode: AutotileMode) -> &'static [(i32, i32)] {
    match mode {
        AutotileMode::Edge2x2 => &OFFSETS_2X2,
        AutotileMode::Minimal3x3 | AutotileMode::Complete3x3 => &OFFSETS_3X3,
    }
}

/// Calculate the raw neighbor bitmask around `center`
///
/// `is_same_group` is asked once per direction. The result is not
/// canonicalized; see [`canonicalize`](crate::matcher::canonicalize).
pub fn calculate_bitmask<F>(center: TilePos, mode: AutotileMode, is_same_group: F) -> NeighborMask
where
    F: Fn(TilePos) -> bool,
{
    neighbor_offsets(mode)
        .iter()
        .enumerate()
        .fold(0, |mask, (bit, &(dx, dy))| {
            if is_same_group(center.offset(dx, dy)) {
                mask | (1 << bit)
            } else {
                mask
            }
        })
}

/// Compute the raw bitmask of `center` from grid state.
///
/// Neighbors outside the grid count as a different group, so edge cells pick
/// the same tiles as interior cells bordered by empty space.
pub fn compute_mask<G>(grid: &G, center: TilePos, mode: AutotileMode) -> NeighborMask
where
    G: AutotileGrid + ?Sized,
{
    calculate_bitmask(center, mode, |neighbor| {
        grid.in_bounds(neighbor) && grid.is_same_group(center, neighbor)
    })
}
