//! World configuration and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::BiomeConfig;
use crate::hydrology::HydrologyConfig;
use crate::sampler::SamplerConfig;

/// Rejected world configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid dimensions: {0} x {1} (both must be finite and positive)")]
    InvalidDimensions(f64, f64),
    #[error("Invalid site count: {0} (need at least 3)")]
    InvalidSiteCount(usize),
    #[error("Invalid relaxation factor: {0} (must be in (0, 1])")]
    InvalidRelaxation(f64),
    #[error("Invalid river probability: {0} (must be in [0, 1])")]
    InvalidRiverProbability(f64),
    #[error("Config file error: {0}")]
    Load(String),
}

/// Everything needed to generate a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Number of Voronoi cells.
    pub site_count: usize,
    /// Lloyd relaxation passes before the graph is built.
    pub lloyd_iterations: usize,
    /// Fraction of the way each site moves toward its centroid per pass.
    pub lloyd_omega: f64,
    /// Seed for site placement, noise and river spawning.
    pub seed: u64,
    pub hydrology: HydrologyConfig,
    pub biomes: BiomeConfig,
    pub sampler: SamplerConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            site_count: 1000,
            lloyd_iterations: 0,
            lloyd_omega: 1.0,
            seed: 42,
            hydrology: HydrologyConfig::default(),
            biomes: BiomeConfig::default(),
            sampler: SamplerConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Quick preview: few cells, no relaxation.
    pub fn small(seed: u64) -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            site_count: 250,
            seed,
            ..Self::default()
        }
    }

    /// Dense, relaxed tessellation with more even cells.
    pub fn detailed(seed: u64) -> Self {
        Self {
            width: 1600.0,
            height: 1600.0,
            site_count: 8000,
            lloyd_iterations: 2,
            lloyd_omega: 1.0,
            seed,
            ..Self::default()
        }
    }

    /// Checks every field a generation run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim_ok = |v: f64| v.is_finite() && v > 0.0;
        if !dim_ok(self.width) || !dim_ok(self.height) {
            return Err(ConfigError::InvalidDimensions(self.width, self.height));
        }
        if self.site_count < 3 {
            return Err(ConfigError::InvalidSiteCount(self.site_count));
        }
        if !(self.lloyd_omega > 0.0 && self.lloyd_omega <= 1.0) {
            return Err(ConfigError::InvalidRelaxation(self.lloyd_omega));
        }
        let p = self.hydrology.river_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidRiverProbability(p));
        }
        Ok(())
    }

    /// Reads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Load(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Load(e.to_string()))
    }
}
