//! Ocean detection and coastline marking.

use glam::DVec2;

use crate::graph::traverse::flood_fill_cells;
use crate::graph::{CellId, WorldGraph};
use crate::noise::NoiseSource;

/// Samples base noise into `cell.z` and seeds every boundary cell as water.
pub fn seed_water(graph: &mut WorldGraph, noise: &NoiseSource, frequency: f64) {
    let scale = DVec2::new(frequency / graph.width, frequency / graph.height);
    let positions: Vec<DVec2> = graph.cells.iter().map(|c| c.position).collect();
    let base = noise.sample_batch(&positions, scale);

    for (i, z) in base.into_iter().enumerate() {
        let bounding = graph.is_bounding_cell(CellId(i));
        let cell = &mut graph.cells[i];
        cell.z = z;
        cell.water = bounding;
    }
}

/// Grows the ocean inward from the boundary.
///
/// Starting at the first boundary cell, every connected cell with negative
/// base noise (or already water) becomes water.
///
/// # Returns
/// Number of cells reached by the fill.
pub fn flood_ocean(graph: &mut WorldGraph) -> usize {
    let Some(start) = graph.cell_ids().find(|&c| graph.is_bounding_cell(c)) else {
        return 0;
    };

    let filled = flood_fill_cells(graph, start, |c| {
        let cell = graph.cell(c);
        cell.z < 0.0 || cell.water
    });

    for c in &filled {
        graph.cells[c.index()].water = true;
    }
    filled.len()
}

/// Marks coastal edges, corners and cells.
///
/// An edge is coastal only when it has two cells that disagree on water.
///
/// # Returns
/// Number of coastal edges.
pub fn mark_coastline(graph: &mut WorldGraph) -> usize {
    let mut count = 0;
    for i in 0..graph.edges.len() {
        let edge = &graph.edges[i];
        let coast = match edge.to_cell {
            Some(to) => graph.cells[edge.from_cell.index()].water != graph.cells[to.index()].water,
            None => false,
        };
        graph.edges[i].coast = coast;
        if coast {
            count += 1;
        }
    }

    for i in 0..graph.corners.len() {
        let coast = graph.corners[i]
            .edges
            .iter()
            .any(|e| graph.edges[e.index()].coast);
        graph.corners[i].coast = coast;
    }

    for i in 0..graph.cells.len() {
        let coast = graph.cells[i]
            .edges
            .iter()
            .any(|e| graph.edges[e.index()].coast);
        graph.cells[i].coast = coast;
    }

    count
}
