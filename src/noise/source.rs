//! Seeded single-octave Perlin noise in the plane.

use std::fmt;

use glam::DVec2;
use ::noise::{NoiseFn, Perlin};

/// A deterministic 2D coherent noise function.
///
/// Identical seeds and coordinates always produce identical values, so one
/// source can be handed to every stage that needs noise and to the sampler.
/// Values are zero on integer lattice points.
#[derive(Clone)]
pub struct NoiseSource {
    seed: u32,
    perlin: Perlin,
}

impl NoiseSource {
    /// Creates a noise source from a 64-bit seed.
    ///
    /// The seed is folded into the 32-bit seed the permutation table expects.
    pub fn new(seed: u64) -> Self {
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            seed: folded,
            perlin: Perlin::new(folded),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Samples noise at `(x, y)`.
    ///
    /// # Returns
    /// A value in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Samples noise for a batch of positions, each scaled by `frequency`.
    pub fn sample_batch(&self, positions: &[DVec2], frequency: DVec2) -> Vec<f64> {
        positions
            .iter()
            .map(|p| self.sample(p.x * frequency.x, p.y * frequency.y))
            .collect()
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new(42)
    }
}

impl PartialEq for NoiseSource {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
    }
}

impl fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseSource").field("seed", &self.seed).finish()
    }
}
