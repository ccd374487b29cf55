//! Core grid types for tilebrush
//!
//! This crate provides the plain data the autotile engine operates on:
//! - `TilePos` - A cell coordinate (y-down, row-major ordering)
//! - `AutotileGrid` - The storage contract the engine reads groups from and writes tiles to
//! - `TileLayer` - A self-contained `Vec`-backed grid implementing `AutotileGrid`
//!
//! Nothing here knows about brushes or bitmasks. Hosts with their own tile
//! storage implement `AutotileGrid` directly and never touch `TileLayer`.

mod grid;
mod layer;

pub use grid::{AutotileGrid, GroupId, TileId, TilePos};
pub use layer::{TileCell, TileLayer};
