//! Weighted variant selection
//!
//! The random source is always passed in by the caller, so resolution is
//! reproducible for a fixed seed.

use crate::brush::TileEntry;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tilebrush_core::{TileId, TilePos};

/// Pick one tile from `entry` proportionally to its variant weights.
///
/// Variants are walked in authored order, so the same draw always maps to
/// the same tile. A single-variant entry returns without drawing. Returns
/// `None` only for an unpopulated entry.
pub fn pick(entry: &TileEntry, rng: &mut impl Rng) -> Option<TileId> {
    match entry.variants.as_slice() {
        [] => None,
        [only] => Some(only.tile),
        variants => {
            let total = entry.total_weight();
            if !total.is_finite() || total <= 0.0 {
                // Unvalidated data; keep the first authored variant
                return Some(variants[0].tile);
            }

            let draw = rng.gen_range(0.0..total);
            let mut running = 0.0;
            for variant in variants {
                running += variant.weight;
                if running > draw {
                    return Some(variant.tile);
                }
            }

            // Float round-off can leave the draw just past the last bucket
            variants.last().map(|v| v.tile)
        }
    }
}

/// Derive an independent seed for one coordinate from a base seed.
///
/// splitmix64 finalizer over the packed coordinate.
pub fn seed_for(seed: u64, pos: TilePos) -> u64 {
    let packed = ((pos.x as u32 as u64) << 32) | pos.y as u32 as u64;
    let mut z = seed ^ packed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Generator seeded for a single coordinate
pub fn rng_for(seed: u64, pos: TilePos) -> SmallRng {
    SmallRng::seed_from_u64(seed_for(seed, pos))
}
