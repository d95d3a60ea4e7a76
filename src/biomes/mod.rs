//! Biome classification.
//!
//! Maps each cell's water flag, normalized temperature and moisture, coast
//! flag, coast distance and elevation to one [`Biome`] through a fixed
//! decision table.

mod config;

pub use config::BiomeConfig;

use serde::{Deserialize, Serialize};

use crate::graph::{Cell, WorldGraph};

/// Biome tag assigned to each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Water,
    Polar,
    Tundra,
    Taiga,
    Forest,
    Grassland,
    Jungle,
    Savanna,
    Beach,
    Desert,
}

impl Biome {
    pub const ALL: [Biome; 10] = [
        Biome::Water,
        Biome::Polar,
        Biome::Tundra,
        Biome::Taiga,
        Biome::Forest,
        Biome::Grassland,
        Biome::Jungle,
        Biome::Savanna,
        Biome::Beach,
        Biome::Desert,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Biome::Water => "Water",
            Biome::Polar => "Polar",
            Biome::Tundra => "Tundra",
            Biome::Taiga => "Taiga",
            Biome::Forest => "Forest",
            Biome::Grassland => "Grassland",
            Biome::Jungle => "Jungle",
            Biome::Savanna => "Savanna",
            Biome::Beach => "Beach",
            Biome::Desert => "Desert",
        }
    }

    /// Looks a biome up by display name, ignoring case.
    pub fn from_name(name: &str) -> Option<Biome> {
        Biome::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }

    /// Representative RGB color for map rendering.
    pub fn color(self) -> [u8; 3] {
        match self {
            Biome::Water => [0x33, 0x99, 0xdd],
            Biome::Polar => [0xdd, 0xdd, 0xdd],
            Biome::Tundra => [0x55, 0x99, 0x88],
            Biome::Taiga => [0x66, 0xbb, 0x99],
            Biome::Forest => [0x44, 0xbb, 0x77],
            Biome::Grassland => [0x66, 0xdd, 0x88],
            Biome::Jungle => [0x33, 0xdd, 0x66],
            Biome::Savanna => [0xdd, 0xff, 0x88],
            Biome::Beach => [0xff, 0xff, 0xaa],
            Biome::Desert => [0xff, 0xdd, 0x88],
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the decision table looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeInputs {
    pub water: bool,
    pub temperature: f64,
    pub moisture: f64,
    pub coast: bool,
    pub distance_from_coast: f64,
    pub z: f64,
}

impl BiomeInputs {
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            water: cell.water,
            temperature: cell.temperature,
            moisture: cell.moisture,
            coast: cell.coast,
            distance_from_coast: cell.distance_from_coast,
            z: cell.z,
        }
    }
}

/// Classifies one cell. Rules are checked in order; the first match wins.
pub fn classify(inputs: &BiomeInputs, cfg: &BiomeConfig) -> Biome {
    let t = inputs.temperature;
    let m = inputs.moisture;

    if inputs.water {
        return Biome::Water;
    }
    if t < cfg.polar_temperature {
        return Biome::Polar;
    }
    if t < cfg.cold_temperature {
        return if m > cfg.wet_moisture { Biome::Taiga } else { Biome::Tundra };
    }
    if t > cfg.hot_temperature {
        if m > cfg.jungle_moisture {
            return Biome::Jungle;
        }
        if m > cfg.wet_moisture {
            return Biome::Savanna;
        }
        if inputs.coast {
            return Biome::Beach;
        }
        return Biome::Desert;
    }

    // Temperate band.
    if inputs.distance_from_coast < cfg.beach_coast_distance && inputs.z < cfg.beach_elevation {
        return Biome::Beach;
    }
    if m > cfg.wet_moisture {
        return Biome::Forest;
    }
    Biome::Grassland
}

/// Assigns a biome to every cell of the graph.
pub fn assign_biomes(graph: &mut WorldGraph, cfg: &BiomeConfig) {
    for cell in &mut graph.cells {
        cell.biome = Some(classify(&BiomeInputs::from_cell(cell), cfg));
    }
}
