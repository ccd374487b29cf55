//! Bitmask autotile resolution
//!
//! This crate picks the tile for each painted cell from which of its
//! neighbors belong to the same brush group.
//!
//! # Features
//! - 2x2 edge (16 tile), 3x3 minimal (47 tile blob) and 3x3 complete (256 tile) brushes
//! - Weighted tile variants with reproducible seeded selection
//! - Nearest-match fallback when a brush lacks a tile for a mask
//! - Incremental resolution of dirty cells with cancellation
//!
//! # Example
//!
//! ```rust,ignore
//! use tilebrush_autotile::{
//!     paint_autotile, AutotileMode, AutotileResolver, BrushDefinition, ResolverOptions,
//! };
//! use tilebrush_core::{TileLayer, TilePos};
//! use uuid::Uuid;
//!
//! // 47 consecutive tiles starting at tile 0 of the tileset
//! let brush = BrushDefinition::with_sequential_tiles(
//!     "Grass".to_string(),
//!     Uuid::new_v4(), // tileset ID
//!     AutotileMode::Minimal3x3,
//!     0,
//! );
//! let grass = brush.id;
//!
//! let mut resolver = AutotileResolver::with_brush(brush, ResolverOptions::default())?;
//! let mut layer = TileLayer::new("Ground".to_string(), 10, 10);
//!
//! // Paint a cell; it and its neighbors are re-resolved
//! paint_autotile(&mut layer, &mut resolver, TilePos::new(5, 5), grass)?;
//! ```

pub mod brush;
pub mod config;
pub mod error;
pub mod mask;
pub mod matcher;
pub mod paint;
pub mod resolver;
pub mod selector;

// Re-export main types at crate root
pub use brush::{AutotileMode, BrushDefinition, TileEntry, TileVariant};
pub use config::{AutotileConfig, ResolverOptions, VariantSeeding};
pub use error::AutotileError;
pub use mask::{calculate_bitmask, compute_mask, edges, neighbors, NeighborMask};
pub use matcher::{canonical_masks, canonicalize, resolve, Match, NoMatch};
pub use paint::{erase_autotile, fill_autotile_region, paint_autotile};
pub use resolver::{AutotileResolver, CellState, ResolveOutcome};

// Re-export tilebrush_core
pub use tilebrush_core;

#[cfg(test)]
mod tests {
    use super::*;
    use tilebrush_core::{AutotileGrid, TileId, TileLayer, TilePos};
    use uuid::Uuid;

    fn layer_with(width: u32, height: u32, group: Uuid, cells: &[(i32, i32)]) -> TileLayer {
        let mut layer = TileLayer::new("Ground".to_string(), width, height);
        for &(x, y) in cells {
            layer.paint(TilePos::new(x, y), group);
        }
        layer
    }

    fn resolve_all(resolver: &mut AutotileResolver, layer: &mut TileLayer) {
        resolver.mark_dirty(layer.painted_positions().collect::<Vec<_>>());
        resolver.resolve_dirty(layer);
    }

    #[test]
    fn test_edge_brush_inner_corner() {
        let mut brush =
            BrushDefinition::new("Fence".to_string(), Uuid::new_v4(), AutotileMode::Edge2x2);
        brush.set_entry(0, TileEntry::single(1)).unwrap();
        brush.set_entry(edges::N, TileEntry::single(2)).unwrap();
        brush.set_entry(edges::E, TileEntry::single(3)).unwrap();
        brush.set_entry(edges::N | edges::E, TileEntry::single(30)).unwrap();
        let group = brush.id;
        let mut resolver = AutotileResolver::with_brush(brush, ResolverOptions::default()).unwrap();

        // Cell at (1,1) with neighbors to the north and east
        let mut layer = layer_with(3, 3, group, &[(1, 1), (1, 0), (2, 1)]);
        resolve_all(&mut resolver, &mut layer);

        assert_eq!(resolver.mask_at(&layer, TilePos::new(1, 1)), Some(3));
        assert_eq!(layer.get_tile(TilePos::new(1, 1)), Some(30));
    }

    #[test]
    fn test_blob_brush_surrounded_and_partial_cells() {
        let brush = BrushDefinition::with_sequential_tiles(
            "Blob".to_string(),
            Uuid::new_v4(),
            AutotileMode::Minimal3x3,
            0,
        );
        let group = brush.id;
        let masks = canonical_masks(AutotileMode::Minimal3x3);
        let tile_for =
            |mask: NeighborMask| masks.iter().position(|&m| m == mask).unwrap() as TileId;
        let mut resolver =
            AutotileResolver::with_brush(brush.clone(), ResolverOptions::default()).unwrap();

        let all: Vec<_> = (0..3).flat_map(|y| (0..3).map(move |x| (x, y))).collect();
        let mut full = layer_with(3, 3, group, &all);
        resolve_all(&mut resolver, &mut full);
        assert_eq!(full.get_tile(TilePos::new(1, 1)), Some(tile_for(0xFF)));

        // N and W present, plus corners NE, SE and SW that lack their flanking edges
        let mut resolver = AutotileResolver::with_brush(brush, ResolverOptions::default()).unwrap();
        let cells = [(1, 1), (1, 0), (0, 1), (2, 0), (2, 2), (0, 2)];
        let mut partial = layer_with(3, 3, group, &cells);
        resolve_all(&mut resolver, &mut partial);

        let raw = resolver.mask_at(&partial, TilePos::new(1, 1)).unwrap();
        assert_eq!(
            raw,
            neighbors::N | neighbors::W | neighbors::NE | neighbors::SE | neighbors::SW
        );
        assert_eq!(
            partial.get_tile(TilePos::new(1, 1)),
            Some(tile_for(neighbors::N | neighbors::W))
        );
    }

    #[test]
    fn test_same_seed_gives_identical_layers() {
        let mut brush = BrushDefinition::new(
            "Grass".to_string(),
            Uuid::new_v4(),
            AutotileMode::Complete3x3,
        );
        brush
            .set_entry(0xFF, TileEntry::single(10).with_variant(11, 1.0).with_variant(12, 2.0))
            .unwrap();
        brush.set_entry(0, TileEntry::single(1)).unwrap();
        let group = brush.id;
        let all: Vec<_> = (0..8).flat_map(|y| (0..8).map(move |x| (x, y))).collect();

        let run = |seeding: VariantSeeding| {
            let options = ResolverOptions {
                seed: 42,
                seeding,
                cache: true,
            };
            let mut resolver = AutotileResolver::with_brush(brush.clone(), options).unwrap();
            let mut layer = layer_with(8, 8, group, &all);
            resolve_all(&mut resolver, &mut layer);
            layer.tiles()
        };

        for seeding in [VariantSeeding::PerCoordinate, VariantSeeding::Sequential] {
            let first = run(seeding);
            assert_eq!(first, run(seeding));
            assert!(first.iter().all(|t| t.is_some()));
        }
    }

    #[test]
    fn test_cancelled_pass_resumes_where_it_stopped() {
        let brush = BrushDefinition::with_sequential_tiles(
            "Blob".to_string(),
            Uuid::new_v4(),
            AutotileMode::Minimal3x3,
            0,
        );
        let group = brush.id;
        let all: Vec<_> = (0..4).flat_map(|y| (0..4).map(move |x| (x, y))).collect();

        let mut reference = layer_with(4, 4, group, &all);
        let mut resolver =
            AutotileResolver::with_brush(brush.clone(), ResolverOptions::default()).unwrap();
        resolve_all(&mut resolver, &mut reference);

        let mut layer = layer_with(4, 4, group, &all);
        let mut resolver = AutotileResolver::with_brush(brush, ResolverOptions::default()).unwrap();
        resolver.mark_region_dirty(0, 0, 4, 4);
        let mut steps = 0;
        let first = resolver.resolve_dirty_until(&mut layer, || {
            steps += 1;
            steps > 14
        });

        assert!(!resolver.is_clean());
        assert!(first.len() < 16);
        assert_eq!(resolver.state(TilePos::new(3, 3)), CellState::Dirty);
        assert_eq!(layer.get_tile(TilePos::new(3, 3)), None);

        resolver.resolve_dirty(&mut layer);
        assert!(resolver.is_clean());
        assert_eq!(layer.tiles(), reference.tiles());
    }

    #[test]
    fn test_missing_masks_do_not_stop_a_bulk_pass() {
        let mut brush = BrushDefinition::new(
            "Sparse".to_string(),
            Uuid::new_v4(),
            AutotileMode::Complete3x3,
        );
        brush.set_entry(0, TileEntry::single(0)).unwrap();
        brush.set_entry(0xFF, TileEntry::single(255)).unwrap();
        let group = brush.id;
        let mut resolver = AutotileResolver::with_brush(brush, ResolverOptions::default()).unwrap();

        let all: Vec<_> = (0..5).flat_map(|y| (0..5).map(move |x| (x, y))).collect();
        let mut layer = layer_with(5, 5, group, &all);
        resolver.mark_dirty(layer.painted_positions().collect::<Vec<_>>());
        let outcomes = resolver.resolve_dirty(&mut layer);

        assert_eq!(outcomes.len(), 25);
        assert!(layer.tiles().iter().all(|t| t.is_some()));
        assert!(outcomes[&TilePos::new(2, 2)].no_match().is_none());
        let corner = outcomes[&TilePos::new(0, 0)].no_match().unwrap();
        assert_eq!(corner.requested, neighbors::E | neighbors::SE | neighbors::S);
        // Three bits from 0, five from 0xFF
        assert_eq!(corner.used, 0);
    }

    #[test]
    fn test_configuration_errors_surface_before_painting() {
        let json = r#"{
            "brushes": [{
                "id": "00000000-0000-0000-0000-00000000000a",
                "name": "Unfinished",
                "tileset_id": "00000000-0000-0000-0000-00000000000b",
                "mode": "Edge2x2",
                "entries": { "0": { "variants": [] } }
            }]
        }"#;

        let err = AutotileConfig::from_json(json).unwrap_err();
        assert_eq!(
            err,
            AutotileError::EmptyBrush {
                name: "Unfinished".to_string()
            }
        );
        assert_eq!(err.to_string(), "brush 'Unfinished' has no populated entries");
    }
}
