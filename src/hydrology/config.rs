//! Hydrology configuration.

use serde::{Deserialize, Serialize};

/// Parameters for water detection, elevation and river tracing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrologyConfig {
    /// Base noise is sampled at `(x / width * f, y / height * f)`.
    pub base_noise_frequency: f64,
    /// Corners above this elevation may spawn a river.
    pub river_elevation: f64,
    /// Chance that an eligible corner spawns a river (0.0-1.0).
    pub river_probability: f64,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            base_noise_frequency: 6.0,
            river_elevation: 0.25,
            river_probability: 0.1,
        }
    }
}

impl HydrologyConfig {
    /// Larger landmasses and more rivers.
    pub fn wet() -> Self {
        Self {
            base_noise_frequency: 4.0,
            river_probability: 0.25,
            ..Default::default()
        }
    }

    /// Fragmented islands and few rivers.
    pub fn arid() -> Self {
        Self {
            base_noise_frequency: 9.0,
            river_probability: 0.03,
            ..Default::default()
        }
    }
}
