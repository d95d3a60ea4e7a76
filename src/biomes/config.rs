//! Biome decision-table thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds for the biome decision table.
///
/// All climate inputs are normalized to [0, 1] by the climate stage, so the
/// thresholds are fractions of the observed maxima.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Below this temperature every land cell is polar.
    pub polar_temperature: f64,
    /// Below this temperature land is taiga or tundra.
    pub cold_temperature: f64,
    /// Above this temperature land is jungle, savanna, beach or desert.
    pub hot_temperature: f64,
    /// Moisture above which cold land is taiga and temperate land is forest.
    pub wet_moisture: f64,
    /// Moisture above which hot land is jungle.
    pub jungle_moisture: f64,
    /// Temperate cells closer than this to the coast may be beach.
    pub beach_coast_distance: f64,
    /// Temperate cells lower than this may be beach.
    pub beach_elevation: f64,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            polar_temperature: 0.25,
            cold_temperature: 0.5,
            hot_temperature: 0.75,
            wet_moisture: 0.5,
            jungle_moisture: 0.75,
            beach_coast_distance: 0.1,
            beach_elevation: 0.05,
        }
    }
}
