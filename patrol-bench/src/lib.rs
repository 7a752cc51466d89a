//! Fixtures shared by the patrol benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use patrol_core::types::{Location, MonumentCategory, MonumentTier, WaypointCandidate};

/// A reproducible map of `count` monuments scattered over a square world.
#[must_use]
pub fn synthetic_map(count: usize, world_size: f32, seed: u64) -> Vec<WaypointCandidate> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = world_size / 2.0;
    (0..count)
        .map(|i| {
            let category = MonumentCategory::ALL[i % MonumentCategory::ALL.len()];
            let tiers = MonumentTier::from_bits_truncate(1 << (i % 3));
            let position = Location::new(
                rng.gen_range(-half..half),
                rng.gen_range(0.0..60.0),
                rng.gen_range(-half..half),
            );
            let name = format!("assets/monument/synthetic_{i}.prefab");
            WaypointCandidate::new(name, category, position)
                .with_tiers(tiers)
                .with_safe_zone(i % 17 == 0)
        })
        .collect()
}
