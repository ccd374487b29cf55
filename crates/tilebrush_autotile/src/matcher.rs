//! Mask canonicalization and entry lookup with fallback
//!
//! Resolution is a pure function of the raw mask, the brush mode and the set
//! of populated masks. Table iteration order never affects the result.

use crate::brush::{AutotileMode, BrushDefinition, TileEntry};
use crate::error::AutotileError;
use crate::mask::{edges, neighbors, NeighborMask};
use serde::{Deserialize, Serialize};

/// Reduce a raw mask to the key used by brushes of `mode`
///
/// In `Minimal3x3` a corner neighbor only matters when both edges beside it
/// are present, so corner bits without both flanking edges are cleared.
pub fn canonicalize(mask: NeighborMask, mode: AutotileMode) -> NeighborMask {
    use neighbors::*;

    match mode {
        AutotileMode::Complete3x3 => mask,
        AutotileMode::Edge2x2 => mask & edges::ALL,
        AutotileMode::Minimal3x3 => {
            let mut result = mask;

            // NE corner requires N and E
            if (mask & (N | E)) != (N | E) {
                result &= !NE;
            }
            // SE corner requires S and E
            if (mask & (S | E)) != (S | E) {
                result &= !SE;
            }
            // SW corner requires S and W
            if (mask & (S | W)) != (S | W) {
                result &= !SW;
            }
            // NW corner requires N and W
            if (mask & (N | W)) != (N | W) {
                result &= !NW;
            }

            result
        }
    }
}

/// Whether `mask` is already a canonical key for `mode`
pub fn is_canonical(mask: NeighborMask, mode: AutotileMode) -> bool {
    canonicalize(mask, mode) == mask
}

/// All canonical keys for `mode` in ascending order
pub fn canonical_masks(mode: AutotileMode) -> Vec<NeighborMask> {
    (0..=NeighborMask::MAX)
        .filter(|&mask| is_canonical(mask, mode))
        .collect()
}

/// Diagnostic for a mask the brush has no entry for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoMatch {
    /// Canonical key that was looked up
    pub requested: NeighborMask,
    /// Key of the fallback entry that was used instead
    pub used: NeighborMask,
}

/// The entry chosen for a mask
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub entry: &'a TileEntry,
    /// Canonical form of the raw mask
    pub requested: NeighborMask,
    /// Key of `entry` in the brush
    pub used: NeighborMask,
}

impl Match<'_> {
    /// `Some` when a fallback entry was used because the brush lacks `requested`
    pub fn no_match(&self) -> Option<NoMatch> {
        (self.requested != self.used).then_some(NoMatch {
            requested: self.requested,
            used: self.used,
        })
    }
}

/// Find the brush entry for a raw neighbor mask.
///
/// Always yields a populated entry unless the brush has none at all.
/// Fallback order when the canonical key is missing:
/// - `Complete3x3` / `Edge2x2`: nearest populated key by Hamming distance,
///   ties going to the lowest key.
/// - `Minimal3x3`: the key with its corner bits cleared, then mask 0, then
///   the nearest populated key as above.
pub fn resolve(raw: NeighborMask, brush: &BrushDefinition) -> Result<Match<'_>, AutotileError> {
    let requested = canonicalize(raw, brush.mode());
    let used = find_key(requested, brush).ok_or_else(|| AutotileError::EmptyBrush {
        name: brush.name.clone(),
    })?;
    let entry = brush
        .get_entry(used)
        .ok_or_else(|| AutotileError::EmptyBrush {
            name: brush.name.clone(),
        })?;

    Ok(Match {
        entry,
        requested,
        used,
    })
}

fn find_key(requested: NeighborMask, brush: &BrushDefinition) -> Option<NeighborMask> {
    let populated = |mask: NeighborMask| brush.get_entry(mask).is_some();

    if populated(requested) {
        return Some(requested);
    }

    match brush.mode() {
        AutotileMode::Complete3x3 | AutotileMode::Edge2x2 => nearest_populated(requested, brush),
        AutotileMode::Minimal3x3 => [requested & neighbors::ORTHOGONAL, 0]
            .into_iter()
            .find(|&mask| populated(mask))
            .or_else(|| nearest_populated(requested, brush)),
    }
}

fn nearest_populated(target: NeighborMask, brush: &BrushDefinition) -> Option<NeighborMask> {
    brush
        .populated_masks()
        .min_by_key(|&mask| ((mask ^ target).count_ones(), mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::neighbors::*;
    use uuid::Uuid;

    fn brush(mode: AutotileMode) -> BrushDefinition {
        BrushDefinition::new("Test".to_string(), Uuid::new_v4(), mode)
    }

    fn full_brush(mode: AutotileMode) -> BrushDefinition {
        BrushDefinition::with_sequential_tiles("Full".to_string(), Uuid::new_v4(), mode, 0)
    }

    #[test]
    fn test_minimal_has_47_canonical_masks() {
        assert_eq!(canonical_masks(AutotileMode::Minimal3x3).len(), 47);
        assert_eq!(canonical_masks(AutotileMode::Edge2x2).len(), 16);
        assert_eq!(canonical_masks(AutotileMode::Complete3x3).len(), 256);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for mode in [
            AutotileMode::Edge2x2,
            AutotileMode::Minimal3x3,
            AutotileMode::Complete3x3,
        ] {
            for mask in 0..=255u8 {
                let once = canonicalize(mask, mode);
                assert_eq!(canonicalize(once, mode), once, "{:?} {:#010b}", mode, mask);
                assert!(is_canonical(once, mode));
            }
        }
    }

    #[test]
    fn test_canonicalize_keeps_surrounded() {
        assert_eq!(canonicalize(0xFF, AutotileMode::Minimal3x3), 0xFF);
    }

    #[test]
    fn test_canonicalize_clears_unsupported_corners() {
        // N and W present: only NW may survive, and it was clear already
        assert_eq!(
            canonicalize(N | W | NE | SE | SW, AutotileMode::Minimal3x3),
            N | W
        );
        assert_eq!(canonicalize(N | W, AutotileMode::Minimal3x3), N | W);
        assert_eq!(canonicalize(N | W | NW, AutotileMode::Minimal3x3), N | W | NW);
        // Lone corners never count
        assert_eq!(canonicalize(DIAGONAL, AutotileMode::Minimal3x3), 0);
    }

    #[test]
    fn test_canonicalize_edge_mode_masks_high_bits() {
        assert_eq!(canonicalize(0xF3, AutotileMode::Edge2x2), 0x03);
    }

    #[test]
    fn test_exact_match_has_no_diagnostic() {
        let b = full_brush(AutotileMode::Minimal3x3);
        let m = resolve(0xFF, &b).unwrap();
        assert_eq!(m.used, 0xFF);
        assert!(m.no_match().is_none());
    }

    #[test]
    fn test_raw_mask_is_reduced_before_lookup() {
        let b = full_brush(AutotileMode::Minimal3x3);
        let m = resolve(N | W | NE | SE | SW, &b).unwrap();
        assert_eq!(m.requested, N | W);
        assert_eq!(m.used, N | W);
        assert!(m.no_match().is_none());
    }

    #[test]
    fn test_minimal_falls_back_to_orthogonal_bits() {
        let mut b = brush(AutotileMode::Minimal3x3);
        b.set_entry(0, TileEntry::single(0)).unwrap();
        b.set_entry(N | E, TileEntry::single(5)).unwrap();

        let m = resolve(N | NE | E, &b).unwrap();
        assert_eq!(m.requested, N | NE | E);
        assert_eq!(m.used, N | E);
        assert_eq!(
            m.no_match(),
            Some(NoMatch {
                requested: N | NE | E,
                used: N | E
            })
        );
    }

    #[test]
    fn test_minimal_falls_back_to_isolated_tile() {
        let mut b = brush(AutotileMode::Minimal3x3);
        b.set_entry(0, TileEntry::single(0)).unwrap();
        b.set_entry(S, TileEntry::single(1)).unwrap();

        // N|E|S is one bit away from S, but the isolated tile comes first
        let m = resolve(N | E | S, &b).unwrap();
        assert_eq!(m.used, 0);
    }

    #[test]
    fn test_minimal_uses_nearest_when_isolated_missing() {
        let mut b = brush(AutotileMode::Minimal3x3);
        b.set_entry(N | E | S | W, TileEntry::single(7)).unwrap();

        let m = resolve(N, &b).unwrap();
        assert_eq!(m.used, N | E | S | W);
        assert!(m.entry.is_populated());
    }

    #[test]
    fn test_complete_prefers_nearest_over_isolated_tile() {
        for mode in [AutotileMode::Complete3x3, AutotileMode::Edge2x2] {
            let full = canonicalize(0xFF, mode);
            let mut b = brush(mode);
            b.set_entry(0, TileEntry::single(0)).unwrap();
            b.set_entry(full, TileEntry::single(1)).unwrap();

            // One bit short of fully surrounded
            let m = resolve(full & !N, &b).unwrap();
            assert_eq!(m.used, full, "{:?}", mode);
        }
    }

    #[test]
    fn test_complete_nearest_by_hamming_then_lowest_value() {
        let mut b = brush(AutotileMode::Complete3x3);
        b.set_entry(0, TileEntry::single(0)).unwrap();
        b.set_entry(N | E, TileEntry::single(1)).unwrap();
        b.set_entry(N | S, TileEntry::single(2)).unwrap();

        // N|E|S is distance 1 from both N|E (5) and N|S (17); lowest wins
        let m = resolve(N | E | S, &b).unwrap();
        assert_eq!(m.used, N | E);

        // N|NE|E is distance 1 from N|E, distance 3 from 0
        let m = resolve(N | NE | E, &b).unwrap();
        assert_eq!(m.used, N | E);
    }

    #[test]
    fn test_edge_mode_inner_corner() {
        let mut b = brush(AutotileMode::Edge2x2);
        b.set_entry(0, TileEntry::single(0)).unwrap();
        b.set_entry(edges::N | edges::E, TileEntry::single(3)).unwrap();

        let m = resolve(3, &b).unwrap();
        assert_eq!(m.used, 3);
        assert_eq!(m.entry.variants[0].tile, 3);
    }

    #[test]
    fn test_isolated_mask_resolves_when_defined() {
        for mode in [
            AutotileMode::Edge2x2,
            AutotileMode::Minimal3x3,
            AutotileMode::Complete3x3,
        ] {
            let mut b = brush(mode);
            b.set_entry(0, TileEntry::single(42)).unwrap();
            let m = resolve(0, &b).unwrap();
            assert_eq!(m.entry.variants[0].tile, 42);
            assert!(m.no_match().is_none());
        }
    }

    #[test]
    fn test_resolve_never_returns_empty_entry() {
        for mode in [
            AutotileMode::Edge2x2,
            AutotileMode::Minimal3x3,
            AutotileMode::Complete3x3,
        ] {
            // Sparse brush: only a handful of masks authored
            let mut b = brush(mode);
            b.set_entry(canonicalize(N | E, mode), TileEntry::single(1)).unwrap();
            for mask in 0..=255u8 {
                let m = resolve(mask, &b).unwrap();
                assert!(m.entry.is_populated(), "{:?} {:#010b}", mode, mask);
            }
        }
    }

    #[test]
    fn test_empty_brush_is_an_error() {
        let b = brush(AutotileMode::Complete3x3);
        assert!(matches!(
            resolve(0, &b),
            Err(AutotileError::EmptyBrush { .. })
        ));
    }
}
