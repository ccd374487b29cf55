//! Dirty-set driven autotile resolution
//!
//! Edits mark cells dirty; a resolution pass recomputes the mask of every
//! dirty cell, looks up its brush entry, picks a variant and writes the tile
//! back into the grid. Neighbors are dirtied once, when the edit is marked,
//! and resolution itself never dirties anything, so a pass always terminates.

use crate::brush::BrushDefinition;
use crate::config::{AutotileConfig, ResolverOptions, VariantSeeding};
use crate::error::AutotileError;
use crate::mask::{self, NeighborMask};
use crate::matcher::{self, NoMatch};
use crate::selector;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tilebrush_core::{AutotileGrid, GroupId, TileId, TilePos};
use tracing::{debug, trace, warn};

/// Whether a cell's tile reflects its current neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Clean,
    Dirty,
}

/// Result of resolving one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The brush had an entry for the cell's mask
    Resolved { tile: TileId, mask: NeighborMask },
    /// The brush lacks the cell's mask; a fallback entry supplied the tile
    NoMatch {
        tile: TileId,
        mask: NeighborMask,
        diagnostic: NoMatch,
    },
    /// The cell's group has no registered brush. Nothing was written, so the
    /// grid keeps whatever tile the cell showed before.
    UnknownBrush { group: GroupId },
}

impl ResolveOutcome {
    /// Tile written to the grid
    pub fn tile(&self) -> Option<TileId> {
        match self {
            ResolveOutcome::Resolved { tile, .. } | ResolveOutcome::NoMatch { tile, .. } => {
                Some(*tile)
            }
            ResolveOutcome::UnknownBrush { .. } => None,
        }
    }

    /// Raw neighbor mask the tile was chosen for
    pub fn mask(&self) -> Option<NeighborMask> {
        match self {
            ResolveOutcome::Resolved { mask, .. } | ResolveOutcome::NoMatch { mask, .. } => {
                Some(*mask)
            }
            ResolveOutcome::UnknownBrush { .. } => None,
        }
    }

    pub fn no_match(&self) -> Option<NoMatch> {
        match self {
            ResolveOutcome::NoMatch { diagnostic, .. } => Some(*diagnostic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedCell {
    group: GroupId,
    outcome: ResolveOutcome,
}

struct Evaluation {
    group: GroupId,
    outcome: ResolveOutcome,
    from_cache: bool,
}

/// Resolves dirty cells of a grid against a set of brushes.
///
/// Each cell is resolved with the brush whose id equals the cell's group.
/// One resolver serves one grid; independent grids get independent resolvers.
#[derive(Debug, Clone)]
pub struct AutotileResolver {
    brushes: HashMap<GroupId, BrushDefinition>,
    options: ResolverOptions,
    dirty: BTreeSet<TilePos>,
    cache: HashMap<TilePos, CachedCell>,
}

impl AutotileResolver {
    /// Build a resolver for every brush in `config`.
    ///
    /// Fails if any brush is empty or malformed, before any cell is painted.
    pub fn new(config: AutotileConfig, options: ResolverOptions) -> Result<Self, AutotileError> {
        config.validate()?;

        let brushes = config.brushes.into_iter().map(|b| (b.id, b)).collect();

        Ok(Self {
            brushes,
            options,
            dirty: BTreeSet::new(),
            cache: HashMap::new(),
        })
    }

    /// Build a resolver for a single brush
    pub fn with_brush(
        brush: BrushDefinition,
        options: ResolverOptions,
    ) -> Result<Self, AutotileError> {
        let mut config = AutotileConfig::new();
        config.add_brush(brush);
        Self::new(config, options)
    }

    /// Register or replace a brush. Cached tiles are dropped.
    pub fn insert_brush(&mut self, brush: BrushDefinition) -> Result<(), AutotileError> {
        brush.validate()?;
        self.brushes.insert(brush.id, brush);
        self.cache.clear();
        Ok(())
    }

    pub fn brush(&self, id: GroupId) -> Option<&BrushDefinition> {
        self.brushes.get(&id)
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Mark edited cells dirty together with their 8 neighbors
    pub fn mark_dirty<I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = TilePos>,
    {
        for pos in coords {
            self.dirty.insert(pos);
            self.dirty.extend(pos.surrounding());
        }
    }

    /// Mark an edited rectangle dirty, plus the one-cell border around it.
    ///
    /// Every position is stored, so callers clip the rectangle to their grid.
    pub fn mark_region_dirty(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        for cy in y.saturating_sub(1)..=y.saturating_add(height) {
            for cx in x.saturating_sub(1)..=x.saturating_add(width) {
                self.dirty.insert(TilePos::new(cx, cy));
            }
        }
    }

    pub fn state(&self, pos: TilePos) -> CellState {
        if self.dirty.contains(&pos) {
            CellState::Dirty
        } else {
            CellState::Clean
        }
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_clean(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Forget cached choices so the next pass draws variants again
    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
    }

    /// Raw mask of a painted cell, using the mode of its brush
    pub fn mask_at<G>(&self, grid: &G, pos: TilePos) -> Option<NeighborMask>
    where
        G: AutotileGrid + ?Sized,
    {
        let brush = self.brushes.get(&grid.group_at(pos)?)?;
        Some(mask::compute_mask(grid, pos, brush.mode()))
    }

    /// What resolving `pos` would write, without touching the grid or any resolver state.
    ///
    /// With [`VariantSeeding::Sequential`] the draw is the one `pos` would get
    /// as the first cell of a pass.
    pub fn preview<G>(&self, grid: &G, pos: TilePos) -> Option<ResolveOutcome>
    where
        G: AutotileGrid + ?Sized,
    {
        let mut rng = SmallRng::seed_from_u64(self.options.seed);
        self.evaluate(grid, pos, &mut rng).map(|e| e.outcome)
    }

    /// Resolve every dirty cell
    pub fn resolve_dirty<G>(&mut self, grid: &mut G) -> BTreeMap<TilePos, ResolveOutcome>
    where
        G: AutotileGrid + ?Sized,
    {
        self.resolve_dirty_until(grid, || false)
    }

    /// Resolve dirty cells in row-major order until `cancel` returns `true`.
    ///
    /// `cancel` is checked before each cell. Cells not reached stay dirty;
    /// every cell already written is complete on its own. Cells whose group
    /// has no brush are reported as [`ResolveOutcome::UnknownBrush`] and left
    /// untouched.
    ///
    /// Every call starts its variant generator from `options.seed`, so two
    /// passes over the same state write the same tiles.
    pub fn resolve_dirty_until<G, F>(
        &mut self,
        grid: &mut G,
        mut cancel: F,
    ) -> BTreeMap<TilePos, ResolveOutcome>
    where
        G: AutotileGrid + ?Sized,
        F: FnMut() -> bool,
    {
        let mut outcomes = BTreeMap::new();
        let mut skipped = 0usize;
        // Only drawn from with `VariantSeeding::Sequential`
        let mut rng = SmallRng::seed_from_u64(self.options.seed);

        while let Some(pos) = self.dirty.first().copied() {
            if cancel() {
                debug!(remaining = self.dirty.len(), "autotile pass cancelled");
                break;
            }
            self.dirty.remove(&pos);

            let Some(evaluation) = self.evaluate(&*grid, pos, &mut rng) else {
                // Empty or out of bounds
                self.cache.remove(&pos);
                skipped += 1;
                continue;
            };
            let outcome = evaluation.outcome;

            match (outcome, evaluation.from_cache) {
                (ResolveOutcome::UnknownBrush { group }, _) => {
                    warn!(x = pos.x, y = pos.y, %group, "no brush registered for group");
                }
                (ResolveOutcome::NoMatch { diagnostic, .. }, false) => {
                    warn!(
                        x = pos.x,
                        y = pos.y,
                        requested = diagnostic.requested,
                        used = diagnostic.used,
                        "brush has no entry for mask, using fallback"
                    );
                }
                _ => {}
            }

            match outcome.tile() {
                Some(tile) => {
                    grid.set_tile(pos, tile);
                    self.cache.insert(
                        pos,
                        CachedCell {
                            group: evaluation.group,
                            outcome,
                        },
                    );
                }
                None => {
                    self.cache.remove(&pos);
                }
            }
            outcomes.insert(pos, outcome);
        }

        debug!(
            resolved = outcomes.len(),
            skipped,
            remaining = self.dirty.len(),
            "autotile pass finished"
        );

        outcomes
    }

    fn evaluate<G>(&self, grid: &G, pos: TilePos, rng: &mut SmallRng) -> Option<Evaluation>
    where
        G: AutotileGrid + ?Sized,
    {
        if !grid.in_bounds(pos) {
            return None;
        }
        let group = grid.group_at(pos)?;
        let Some(brush) = self.brushes.get(&group) else {
            return Some(Evaluation {
                group,
                outcome: ResolveOutcome::UnknownBrush { group },
                from_cache: false,
            });
        };

        let mask = mask::compute_mask(grid, pos, brush.mode());

        if self.options.cache {
            if let Some(cached) = self.cache.get(&pos) {
                if cached.group == group
                    && cached.outcome.mask() == Some(mask)
                    && grid.get_tile(pos) == cached.outcome.tile()
                {
                    trace!(x = pos.x, y = pos.y, mask, "mask unchanged, keeping tile");
                    return Some(Evaluation {
                        group,
                        outcome: cached.outcome,
                        from_cache: true,
                    });
                }
            }
        }

        let matched = match matcher::resolve(mask, brush) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(%err, "brush cannot resolve cells");
                return None;
            }
        };

        let tile = match self.options.seeding {
            VariantSeeding::PerCoordinate => {
                selector::pick(matched.entry, &mut selector::rng_for(self.options.seed, pos))
            }
            VariantSeeding::Sequential => selector::pick(matched.entry, rng),
        }?;

        trace!(x = pos.x, y = pos.y, mask, used = matched.used, tile, "resolved cell");

        let outcome = match matched.no_match() {
            Some(diagnostic) => ResolveOutcome::NoMatch {
                tile,
                mask,
                diagnostic,
            },
            None => ResolveOutcome::Resolved { tile, mask },
        };

        Some(Evaluation {
            group,
            outcome,
            from_cache: false,
        })
    }
}
