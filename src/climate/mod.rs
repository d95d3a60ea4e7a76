//! Climate: latitude, moisture and temperature per cell.
//!
//! Reads the hydrology fields (elevation, water, coast and freshwater
//! distances) and writes only the three climate fields.

mod moisture;
mod temperature;

pub use moisture::{assign_moisture, moisture_index};
pub use temperature::{assign_temperature, temperature_index};

use rayon::prelude::*;

use crate::graph::WorldGraph;

/// Latitude of a y coordinate: -1 at the top edge, +1 at the bottom.
pub fn latitude(y: f64, height: f64) -> f64 {
    (y / height) * 2.0 - 1.0
}

/// Sets `cell.latitude` from each cell's site.
pub fn assign_latitude(graph: &mut WorldGraph) {
    let height = graph.height;
    graph
        .cells
        .par_iter_mut()
        .for_each(|cell| cell.latitude = latitude(cell.position.y, height));
}

/// Runs latitude, moisture and temperature in order.
pub fn run_climate(graph: &mut WorldGraph) {
    assign_latitude(graph);
    assign_moisture(graph);
    assign_temperature(graph);
}

/// Divides every value by the maximum over `values` when that maximum is
/// positive.
pub(crate) fn normalize_by_max<'a>(values: impl Iterator<Item = &'a mut f64>) {
    let values: Vec<&mut f64> = values.collect();
    let max = values.iter().map(|v| **v).fold(0.0_f64, f64::max);
    if max > 0.0 {
        for v in values {
            *v /= max;
        }
    }
}
