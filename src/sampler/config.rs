//! Sampler configuration parameters.

use serde::{Deserialize, Serialize};

use crate::noise::NoiseOctave;

/// Configuration for point queries against a finished graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Noise frequency of the coordinate warp across the map width.
    pub warp_frequency_x: f64,
    /// Noise frequency of the coordinate warp across the map height.
    pub warp_frequency_y: f64,
    /// Largest warp offset, in map units. Both axes move by the same amount.
    pub warp_amplitude: f64,
    /// Multiplier applied to interpolated elevation.
    pub elevation_scale: f64,
    /// Detail layers added inland, weighted by distance from water.
    pub detail_octaves: Vec<NoiseOctave>,
    /// Slack allowed on barycentric weights when picking a triangle.
    pub barycentric_tolerance: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            warp_frequency_x: 100.0,
            warp_frequency_y: 100.0,
            warp_amplitude: 4.0,
            elevation_scale: 20.0,
            detail_octaves: vec![NoiseOctave::new(0.25, 2.0), NoiseOctave::new(0.5, 1.0)],
            barycentric_tolerance: 1e-6,
        }
    }
}

impl SamplerConfig {
    /// Straight cell borders and no inland detail.
    pub fn smooth() -> Self {
        Self {
            warp_amplitude: 0.0,
            detail_octaves: Vec::new(),
            ..Self::default()
        }
    }
}
