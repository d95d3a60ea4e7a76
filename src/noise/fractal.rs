//! Layered octave sums for small-scale terrain detail.

use serde::{Deserialize, Serialize};

use super::NoiseSource;

/// One layer of a detail noise sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    /// Multiplier applied to world coordinates before sampling.
    pub frequency: f64,
    /// Weight of this layer in the sum.
    pub amplitude: f64,
}

impl NoiseOctave {
    pub const fn new(frequency: f64, amplitude: f64) -> Self {
        Self { frequency, amplitude }
    }
}

/// Sums `(noise(x*f, y*f) + 1) * amplitude` over all octaves.
///
/// Each term is shifted into [0, 2] before weighting, so the result lies in
/// `[0, 2 * sum(amplitude)]` and never subtracts from the base terrain.
pub fn sample_octaves(noise: &NoiseSource, x: f64, y: f64, octaves: &[NoiseOctave]) -> f64 {
    octaves
        .iter()
        .map(|o| (noise.sample(x * o.frequency, y * o.frequency) + 1.0) * o.amplitude)
        .sum()
}
