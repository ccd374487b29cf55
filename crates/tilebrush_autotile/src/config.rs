//! Autotile configuration
//!
//! This module contains the project-level brush library and resolver options.

use crate::brush::BrushDefinition;
use crate::error::AutotileError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Configuration for autotiling in a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutotileConfig {
    /// All brushes defined in the project
    pub brushes: Vec<BrushDefinition>,
}

impl AutotileConfig {
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
        }
    }

    /// Add a brush
    pub fn add_brush(&mut self, brush: BrushDefinition) {
        self.brushes.push(brush);
    }

    /// Get brush by ID
    pub fn get_brush(&self, id: Uuid) -> Option<&BrushDefinition> {
        self.brushes.iter().find(|b| b.id == id)
    }

    /// Get mutable brush by ID
    pub fn get_brush_mut(&mut self, id: Uuid) -> Option<&mut BrushDefinition> {
        self.brushes.iter_mut().find(|b| b.id == id)
    }

    /// Remove brush by ID
    pub fn remove_brush(&mut self, id: Uuid) -> Option<BrushDefinition> {
        let pos = self.brushes.iter().position(|b| b.id == id)?;
        Some(self.brushes.remove(pos))
    }

    /// Get all brushes drawing from a specific tileset
    pub fn brushes_for_tileset(&self, tileset_id: Uuid) -> Vec<&BrushDefinition> {
        self.brushes
            .iter()
            .filter(|b| b.tileset_id == tileset_id)
            .collect()
    }

    /// Validate every brush and reject duplicate ids
    pub fn validate(&self) -> Result<(), AutotileError> {
        let mut seen = HashSet::new();
        for brush in &self.brushes {
            if !seen.insert(brush.id) {
                return Err(AutotileError::DuplicateBrush(brush.id));
            }
            brush.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a brush library from JSON
    pub fn from_json(json: &str) -> Result<Self, AutotileError> {
        let config: AutotileConfig =
            serde_json::from_str(json).map_err(|e| AutotileError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Render the brush library as pretty JSON
    pub fn to_json(&self) -> Result<String, AutotileError> {
        serde_json::to_string_pretty(self).map_err(|e| AutotileError::Parse(e.to_string()))
    }
}

/// How variant draws are seeded during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VariantSeeding {
    /// Each cell draws from a generator derived from the base seed and its
    /// coordinate. The same grid state always yields the same variants.
    #[default]
    PerCoordinate,
    /// One generator seeded at the start of every pass, advanced across the
    /// pass's cells in coordinate order
    Sequential,
}

/// Options for [`AutotileResolver`](crate::AutotileResolver)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub seed: u64,
    pub seeding: VariantSeeding,
    /// Keep a cell's chosen tile while its group and mask are unchanged
    pub cache: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            seeding: VariantSeeding::default(),
            cache: true,
        }
    }
}
