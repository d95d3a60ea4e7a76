//! Moisture from freshwater proximity and latitude.

use rayon::prelude::*;

use super::normalize_by_max;
use crate::graph::WorldGraph;

/// Unnormalized moisture for a cell.
///
/// Falls off with the square of freshwater distance and toward the poles.
pub fn moisture_index(distance_from_freshwater: f64, latitude: f64) -> f64 {
    let polar = (1.0 - latitude.abs()).powi(4);
    (1.0 - distance_from_freshwater * distance_from_freshwater) * (1.0 - polar)
}

/// Writes `cell.moisture`, normalized by the largest value.
pub fn assign_moisture(graph: &mut WorldGraph) {
    graph.cells.par_iter_mut().for_each(|cell| {
        cell.moisture = moisture_index(cell.distance_from_freshwater, cell.latitude);
    });
    normalize_by_max(graph.cells.iter_mut().map(|c| &mut c.moisture));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn river_banks_are_wettest() {
        assert!(moisture_index(0.0, 0.5) > moisture_index(0.5, 0.5));
        assert_eq!(moisture_index(1.0, 0.5), 0.0);
    }

    #[test]
    fn equator_is_dry() {
        // (1 - |lat|)^4 is 1 at the equator.
        assert_eq!(moisture_index(0.0, 0.0), 0.0);
        assert_eq!(moisture_index(0.0, 1.0), 1.0);
    }
}
