//! Corner and cell elevation from coast distance, and edge downslope.

use crate::graph::{CornerId, WorldGraph};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Elevation profile over normalized coast distance `d`.
///
/// Rises sharply at the shoreline and flattens into a plateau inland.
pub fn elevation_profile(d: f64) -> f64 {
    (sigmoid(30.0 * d) - 0.5 + sigmoid(8.0 * d - 4.0)).powi(3)
}

/// Sets every corner's `z` from its coast distance. Sea corners are negated.
pub fn assign_corner_elevation(graph: &mut WorldGraph) {
    let sea: Vec<bool> = graph.corner_ids().map(|c| graph.is_sea_corner(c)).collect();
    for (corner, is_sea) in graph.corners.iter_mut().zip(sea) {
        let z = elevation_profile(corner.distance_from_coast);
        corner.z = if is_sea { -z } else { z };
    }
}

/// Sets every cell's `z` to its most extreme corner value, then normalizes
/// by the largest magnitude over all cells.
pub fn assign_cell_elevation(graph: &mut WorldGraph) {
    let corners = &graph.corners;
    for cell in &mut graph.cells {
        let mut z = 0.0_f64;
        for c in &cell.corners {
            let cz = corners[c.index()].z;
            if cz.abs() > z.abs() {
                z = cz;
            }
        }
        cell.z = z;
    }

    let max = graph.cells.iter().map(|c| c.z.abs()).fold(0.0, f64::max);
    if max > 0.0 {
        for cell in &mut graph.cells {
            cell.z /= max;
        }
    }
}

/// Points every edge at its lower endpoint. Ties go to `to_corner`.
pub fn assign_downslope(graph: &mut WorldGraph) {
    let corners = &graph.corners;
    for edge in &mut graph.edges {
        let from: CornerId = edge.from_corner;
        let to: CornerId = edge.to_corner;
        edge.downslope = Some(if corners[from.index()].z < corners[to.index()].z {
            from
        } else {
            to
        });
    }
}
