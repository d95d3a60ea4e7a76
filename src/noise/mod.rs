//! Coherent 2D noise used for base elevation and sampler perturbation.
//!
//! Uses the `noise` crate's Perlin noise underneath.

mod fractal;
mod source;

pub use fractal::{NoiseOctave, sample_octaves};
pub use source::NoiseSource;
