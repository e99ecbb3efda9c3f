//! Seeded randomness and selection helpers
//!
//! A run is driven by a single `Pcg32` so that identical seeds and inputs
//! replay identically.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Build the run RNG from a seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Draw up to `count` unique numbers in `[1, max]`, skipping anything in `exclude`.
///
/// The count is clamped to the numbers actually available.
pub fn draw_unique<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    max: u32,
    exclude: &HashSet<u32>,
) -> Vec<u32> {
    let pool: Vec<u32> = (1..=max).filter(|n| !exclude.contains(n)).collect();
    draw_from_pool(rng, pool, count)
}

/// Draw up to `count` unique numbers from `[min, max]` that are also within
/// `[1, limit]` and not in `taken`.
pub fn draw_from_range<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min: u32,
    max: u32,
    limit: u32,
    taken: &HashSet<u32>,
) -> Vec<u32> {
    let lo = min.max(1);
    let hi = max.min(limit);
    if lo > hi {
        return Vec::new();
    }
    let pool: Vec<u32> = (lo..=hi).filter(|n| !taken.contains(n)).collect();
    draw_from_pool(rng, pool, count)
}

/// Remove `count` random entries from `pool` (without replacement)
pub fn draw_from_pool<R: Rng + ?Sized, T>(rng: &mut R, mut pool: Vec<T>, count: usize) -> Vec<T> {
    let count = count.min(pool.len());
    let mut drawn = Vec::with_capacity(count);
    while drawn.len() < count {
        let idx = rng.random_range(0..pool.len());
        drawn.push(pool.swap_remove(idx));
    }
    drawn
}

/// Roulette selection over integer weights.
///
/// Returns `None` when there is nothing to pick from or every weight is zero.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[u32]) -> Option<usize> {
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for (i, &w) in weights.iter().enumerate() {
        let w = w as u64;
        if roll < w {
            return Some(i);
        }
        roll -= w;
    }
    None
}

/// Bernoulli roll; probabilities outside [0, 1] saturate
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability <= 0.0 {
        return false;
    }
    if probability >= 1.0 {
        return true;
    }
    rng.random::<f64>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_draw_unique_respects_exclusions() {
        let mut rng = seeded(7);
        let exclude: HashSet<u32> = (1..=10).collect();
        let drawn = draw_unique(&mut rng, 5, 20, &exclude);
        assert_eq!(drawn.len(), 5);
        assert!(drawn.iter().all(|n| (11..=20).contains(n)));
        let unique: HashSet<u32> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_draw_unique_clamps_to_available() {
        let mut rng = seeded(7);
        let exclude: HashSet<u32> = (1..=8).collect();
        let drawn = draw_unique(&mut rng, 5, 10, &exclude);
        assert_eq!(drawn.len(), 2);
    }

    #[test]
    fn test_draw_from_range_clips_to_grid() {
        let mut rng = seeded(3);
        let taken = HashSet::from([41]);
        let drawn = draw_from_range(&mut rng, 5, 40, 45, 42, &taken);
        let mut drawn = drawn;
        drawn.sort();
        assert_eq!(drawn, vec![40, 42]);
    }

    #[test]
    fn test_draw_from_range_outside_grid_is_empty() {
        let mut rng = seeded(3);
        let drawn = draw_from_range(&mut rng, 1, 70, 80, 60, &HashSet::new());
        assert!(drawn.is_empty());
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = seeded(11);
        for _ in 0..100 {
            assert_eq!(weighted_index(&mut rng, &[0, 3, 0]), Some(1));
        }
        assert_eq!(weighted_index(&mut rng, &[]), None);
        assert_eq!(weighted_index(&mut rng, &[0, 0]), None);
    }

    #[test]
    fn test_chance_saturates() {
        let mut rng = seeded(5);
        assert!(!chance(&mut rng, 0.0));
        assert!(chance(&mut rng, 1.0));
    }

    proptest! {
        #[test]
        fn prop_draw_unique_in_bounds(seed in any::<u64>(), count in 0usize..40, max in 1u32..80) {
            let mut rng = seeded(seed);
            let drawn = draw_unique(&mut rng, count, max, &HashSet::new());
            prop_assert_eq!(drawn.len(), count.min(max as usize));
            let unique: HashSet<u32> = drawn.iter().copied().collect();
            prop_assert_eq!(unique.len(), drawn.len());
            prop_assert!(drawn.iter().all(|&n| n >= 1 && n <= max));
        }
    }
}
