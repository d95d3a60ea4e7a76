//! Hydrology: ocean, coastline, elevation, rivers and distance fields.
//!
//! The steps must run in the order of [`run_hydrology`]; each one reads
//! fields the previous step wrote.

mod config;
pub mod distance;
pub mod elevation;
pub mod rivers;
pub mod water;

pub use config::HydrologyConfig;

use rand::Rng;

use crate::graph::WorldGraph;
use crate::noise::NoiseSource;

/// Counts gathered while running the hydrology steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrologySummary {
    pub water_cells: usize,
    pub coast_edges: usize,
    pub rivers: usize,
    pub river_edges: usize,
}

/// Runs every hydrology step on a freshly built graph.
pub fn run_hydrology<R: Rng>(
    graph: &mut WorldGraph,
    noise: &NoiseSource,
    rng: &mut R,
    cfg: &HydrologyConfig,
) -> HydrologySummary {
    water::seed_water(graph, noise, cfg.base_noise_frequency);
    water::flood_ocean(graph);
    let coast_edges = water::mark_coastline(graph);

    distance::compute_coast_distance(graph);
    elevation::assign_corner_elevation(graph);
    elevation::assign_cell_elevation(graph);
    elevation::assign_downslope(graph);

    let river_count = rivers::make_rivers(graph, cfg.river_elevation, cfg.river_probability, rng);
    distance::compute_water_distances(graph);

    HydrologySummary {
        water_cells: graph.water_cell_count(),
        coast_edges,
        rivers: river_count,
        river_edges: graph.river_edge_count(),
    }
}
