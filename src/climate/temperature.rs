//! Temperature from latitude, elevation and coast distance.

use rayon::prelude::*;

use super::normalize_by_max;
use crate::graph::WorldGraph;

/// Unnormalized land temperature.
///
/// Warmest at the middle latitude band, cooling with altitude. Coast
/// distance below ~0.71 is floored at 0.5 so shores stay temperate.
pub fn temperature_index(latitude: f64, z: f64, distance_from_coast: f64) -> f64 {
    let altitude = 1.0 - z.max(0.0);
    (1.0 - latitude * latitude) * altitude * altitude * (distance_from_coast * distance_from_coast).max(0.5)
}

/// Writes `cell.temperature`. Water is 0; land is normalized by the land
/// maximum.
pub fn assign_temperature(graph: &mut WorldGraph) {
    graph.cells.par_iter_mut().for_each(|cell| {
        cell.temperature = if cell.water {
            0.0
        } else {
            temperature_index(cell.latitude, cell.z, cell.distance_from_coast)
        };
    });
    normalize_by_max(
        graph
            .cells
            .iter_mut()
            .filter(|c| !c.water)
            .map(|c| &mut c.temperature),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poles_are_frozen() {
        assert_eq!(temperature_index(1.0, 0.2, 0.5), 0.0);
        assert_eq!(temperature_index(-1.0, 0.2, 0.5), 0.0);
    }

    #[test]
    fn peaks_are_colder() {
        let low = temperature_index(0.0, 0.1, 0.9);
        let high = temperature_index(0.0, 0.8, 0.9);
        assert!(low > high);
        assert_eq!(temperature_index(0.0, 1.0, 0.9), 0.0);
    }

    #[test]
    fn coast_floor() {
        // Below the floor, coast distance does not matter.
        assert_eq!(temperature_index(0.0, 0.0, 0.1), temperature_index(0.0, 0.0, 0.5));
        assert_eq!(temperature_index(0.0, 0.0, 0.0), 0.5);
        assert_eq!(temperature_index(0.0, 0.0, 1.0), 1.0);
    }
}
