//! Brush definitions
//!
//! A brush is the authored side of autotiling: for each canonical neighbor
//! mask it lists one or more weighted tile variants.

use crate::error::AutotileError;
use crate::mask::NeighborMask;
use crate::matcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilebrush_core::TileId;
use uuid::Uuid;

/// Type of autotile brush - determines which neighbors are sampled and how masks are reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AutotileMode {
    /// 4 edge neighbors (N, E, S, W)
    /// 16 tiles, good for paths, pipes and platforms
    Edge2x2,
    /// 8 neighbors with corners only counted when both adjacent edges are present
    /// The classic 47-tile blob set
    #[default]
    Minimal3x3,
    /// 8 neighbors, every combination distinct
    /// 256 tiles, mostly useful with generated art
    Complete3x3,
}

impl AutotileMode {
    /// Number of canonical masks, including the isolated mask 0
    pub fn slot_count(&self) -> usize {
        match self {
            AutotileMode::Edge2x2 => 16,
            AutotileMode::Minimal3x3 => 47,
            AutotileMode::Complete3x3 => 256,
        }
    }

    /// Number of neighbors sampled per cell
    pub fn direction_count(&self) -> usize {
        match self {
            AutotileMode::Edge2x2 => 4,
            AutotileMode::Minimal3x3 | AutotileMode::Complete3x3 => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AutotileMode::Edge2x2 => "2x2 Edge",
            AutotileMode::Minimal3x3 => "3x3 Minimal",
            AutotileMode::Complete3x3 => "3x3 Complete",
        }
    }
}

/// One candidate tile for a mask
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileVariant {
    pub tile: TileId,
    /// Relative selection weight. Must be finite and positive.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

/// Weighted tile variants for a single mask, kept in authored order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    pub variants: Vec<TileVariant>,
}

impl TileEntry {
    pub fn new() -> Self {
        Self {
            variants: Vec::new(),
        }
    }

    /// Entry with one variant of weight 1
    pub fn single(tile: TileId) -> Self {
        Self::new().with_variant(tile, 1.0)
    }

    pub fn with_variant(mut self, tile: TileId, weight: f32) -> Self {
        self.push(tile, weight);
        self
    }

    pub fn push(&mut self, tile: TileId, weight: f32) {
        self.variants.push(TileVariant { tile, weight });
    }

    /// Whether this entry has at least one candidate
    pub fn is_populated(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.variants.iter().map(|v| v.weight).sum()
    }
}

/// An autotile brush: a mode plus a table from canonical mask to tile entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushDefinition {
    /// Group id painted onto grid cells by this brush
    pub id: Uuid,
    pub name: String,
    /// Which tileset the tile ids refer to
    pub tileset_id: Uuid,
    mode: AutotileMode,
    entries: BTreeMap<NeighborMask, TileEntry>,
}

impl BrushDefinition {
    /// Create a brush with an empty placeholder entry for every canonical mask
    pub fn new(name: String, tileset_id: Uuid, mode: AutotileMode) -> Self {
        let entries = matcher::canonical_masks(mode)
            .into_iter()
            .map(|mask| (mask, TileEntry::new()))
            .collect();
        Self {
            id: Uuid::new_v4(),
            name,
            tileset_id,
            mode,
            entries,
        }
    }

    /// Create a brush using the standard strip layout: canonical masks in
    /// ascending order map to consecutive tiles starting at `first_tile`
    pub fn with_sequential_tiles(
        name: String,
        tileset_id: Uuid,
        mode: AutotileMode,
        first_tile: TileId,
    ) -> Self {
        let mut brush = Self::new(name, tileset_id, mode);
        for (offset, entry) in brush.entries.values_mut().enumerate() {
            *entry = TileEntry::single(first_tile + offset as TileId);
        }
        brush
    }

    pub fn mode(&self) -> AutotileMode {
        self.mode
    }

    /// Replace the entry for a canonical mask
    pub fn set_entry(&mut self, mask: NeighborMask, entry: TileEntry) -> Result<(), AutotileError> {
        self.check_canonical(mask)?;
        self.entries.insert(mask, entry);
        Ok(())
    }

    /// Append a weighted variant to the entry for a canonical mask
    pub fn add_variant(
        &mut self,
        mask: NeighborMask,
        tile: TileId,
        weight: f32,
    ) -> Result<(), AutotileError> {
        self.check_canonical(mask)?;
        self.entries.entry(mask).or_default().push(tile, weight);
        Ok(())
    }

    /// Reset a mask back to an empty placeholder
    pub fn clear_entry(&mut self, mask: NeighborMask) {
        if let Some(entry) = self.entries.get_mut(&mask) {
            entry.variants.clear();
        }
    }

    /// Direct lookup by canonical mask.
    ///
    /// Raw masks are not reduced here, so a non-canonical `Minimal3x3` mask
    /// returns `None`. Unpopulated placeholders also return `None`.
    pub fn get_entry(&self, mask: NeighborMask) -> Option<&TileEntry> {
        self.entries.get(&mask).filter(|e| e.is_populated())
    }

    /// Number of canonical masks this brush can hold
    pub fn slot_count(&self) -> usize {
        self.mode.slot_count()
    }

    /// Masks that have at least one variant, ascending
    pub fn populated_masks(&self) -> impl Iterator<Item = NeighborMask> + '_ {
        self.entries
            .iter()
            .filter(|(_, e)| e.is_populated())
            .map(|(&mask, _)| mask)
    }

    /// Whether no mask has a variant yet
    pub fn is_empty(&self) -> bool {
        self.populated_masks().next().is_none()
    }

    /// Check the brush can be used for resolution
    pub fn validate(&self) -> Result<(), AutotileError> {
        for (&mask, entry) in &self.entries {
            self.check_canonical(mask)?;
            if let Some(bad) = entry
                .variants
                .iter()
                .find(|v| !v.weight.is_finite() || v.weight <= 0.0)
            {
                return Err(AutotileError::InvalidWeight {
                    brush: self.name.clone(),
                    mask,
                    tile: bad.tile,
                    weight: bad.weight,
                });
            }
        }

        if self.is_empty() {
            return Err(AutotileError::EmptyBrush {
                name: self.name.clone(),
            });
        }

        Ok(())
    }

    fn check_canonical(&self, mask: NeighborMask) -> Result<(), AutotileError> {
        if matcher::is_canonical(mask, self.mode) {
            Ok(())
        } else {
            Err(AutotileError::NonCanonicalMask {
                mask,
                mode: self.mode,
            })
        }
    }
}
