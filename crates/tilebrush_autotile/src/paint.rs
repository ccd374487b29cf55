//! Editing helpers for [`TileLayer`]
//!
//! Each helper applies an edit, marks the affected cells dirty and runs a
//! resolution pass, returning what changed.

use crate::error::AutotileError;
use crate::resolver::{AutotileResolver, ResolveOutcome};
use std::collections::BTreeMap;
use tilebrush_core::{GroupId, TileLayer, TilePos};

/// Paint a single cell and update its neighbors
pub fn paint_autotile(
    layer: &mut TileLayer,
    resolver: &mut AutotileResolver,
    pos: TilePos,
    group: GroupId,
) -> Result<BTreeMap<TilePos, ResolveOutcome>, AutotileError> {
    if resolver.brush(group).is_none() {
        return Err(AutotileError::UnknownBrush(group));
    }

    if layer.paint(pos, group) {
        resolver.mark_dirty([pos]);
    }

    Ok(resolver.resolve_dirty(layer))
}

/// Erase a cell and update its neighbors
pub fn erase_autotile(
    layer: &mut TileLayer,
    resolver: &mut AutotileResolver,
    pos: TilePos,
) -> BTreeMap<TilePos, ResolveOutcome> {
    if layer.erase(pos) {
        resolver.mark_dirty([pos]);
    }

    resolver.resolve_dirty(layer)
}

/// Paint a rectangle of cells with one group.
///
/// The rectangle is clipped to the layer. The cells just outside it are
/// updated too.
pub fn fill_autotile_region(
    layer: &mut TileLayer,
    resolver: &mut AutotileResolver,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    group: GroupId,
) -> Result<BTreeMap<TilePos, ResolveOutcome>, AutotileError> {
    if resolver.brush(group).is_none() {
        return Err(AutotileError::UnknownBrush(group));
    }

    let layer_width = i32::try_from(layer.width).unwrap_or(i32::MAX);
    let layer_height = i32::try_from(layer.height).unwrap_or(i32::MAX);
    let (min_x, max_x) = (x.max(0), x.saturating_add(width).min(layer_width));
    let (min_y, max_y) = (y.max(0), y.saturating_add(height).min(layer_height));

    if min_x < max_x && min_y < max_y {
        for cy in min_y..max_y {
            for cx in min_x..max_x {
                layer.paint(TilePos::new(cx, cy), group);
            }
        }
        resolver.mark_region_dirty(min_x, min_y, max_x - min_x, max_y - min_y);
    }

    Ok(resolver.resolve_dirty(layer))
}
