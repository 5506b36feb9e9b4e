//! Random sampling used for per-droplet variation.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the randomized emission parameters.
///
/// Backed by a ChaCha stream so tests can seed it; in normal use it is seeded
/// from the operating system and the simulation is deliberately not
/// reproducible.
#[derive(Debug, Clone)]
pub struct DropletRng {
    rng: ChaCha8Rng,
}

impl DropletRng {
    /// Seeds the generator from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[min, max]`. Returns `min` for a degenerate range.
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        let t: f32 = self.rng.gen();
        min + (max - min) * t
    }

    /// Uniform pick from `items`, or `None` when the slice is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.gen_range(0..items.len()))
    }
}

impl Default for DropletRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
