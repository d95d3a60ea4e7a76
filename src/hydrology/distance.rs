//! Coast, water and freshwater distance fields.
//!
//! All three fields are relaxed outward from their seed corners with a plain
//! FIFO queue, so on irregular tessellations the result can exceed the true
//! shortest path. They are normalized to [0, 1] afterwards.

use crate::graph::traverse::propagate_distance;
use crate::graph::WorldGraph;

/// Divides finite entries by their maximum; unreached entries become 1.
///
/// Leaves finite values untouched when the maximum is zero.
pub fn normalize_distances(dist: &mut [f64]) {
    let max = dist
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .fold(0.0_f64, f64::max);

    for d in dist.iter_mut() {
        if !d.is_finite() {
            *d = 1.0;
        } else if max > 0.0 {
            *d /= max;
        }
    }
}

/// Computes normalized distance to the nearest coastal corner.
///
/// Writes `corner.distance_from_coast` and, as the maximum over each
/// cell's corners, `cell.distance_from_coast`.
pub fn compute_coast_distance(graph: &mut WorldGraph) {
    let mut dist: Vec<f64> = graph
        .corners
        .iter()
        .map(|c| if c.coast { 0.0 } else { f64::INFINITY })
        .collect();

    propagate_distance(graph, &mut dist, |_| false);
    normalize_distances(&mut dist);

    for (corner, d) in graph.corners.iter_mut().zip(&dist) {
        corner.distance_from_coast = *d;
    }
    for cell in &mut graph.cells {
        cell.distance_from_coast = cell
            .corners
            .iter()
            .map(|c| dist[c.index()])
            .fold(0.0, f64::max);
    }
}

/// Computes normalized distance to any water and to freshwater (rivers).
///
/// Neither walk enters a water corner, so water bodies absorb the front.
/// Corners the freshwater walk never reaches, including open sea, get 1.
pub fn compute_water_distances(graph: &mut WorldGraph) {
    let is_water: Vec<bool> = graph.corner_ids().map(|c| graph.is_water_corner(c)).collect();
    let is_fresh: Vec<bool> = graph
        .corner_ids()
        .map(|c| graph.is_freshwater_corner(c))
        .collect();

    let seeded = |flags: &[bool]| -> Vec<f64> {
        flags
            .iter()
            .map(|&f| if f { 0.0 } else { f64::INFINITY })
            .collect()
    };

    let mut water = seeded(&is_water);
    propagate_distance(graph, &mut water, |c| is_water[c.index()]);
    normalize_distances(&mut water);

    let mut fresh = seeded(&is_fresh);
    propagate_distance(graph, &mut fresh, |c| is_water[c.index()]);
    normalize_distances(&mut fresh);

    for (i, corner) in graph.corners.iter_mut().enumerate() {
        corner.distance_from_water = water[i];
        corner.distance_from_freshwater = fresh[i];
    }
    for cell in &mut graph.cells {
        let (mut dw, mut df) = (0.0_f64, 0.0_f64);
        for c in &cell.corners {
            dw = dw.max(water[c.index()]);
            df = df.max(fresh[c.index()]);
        }
        cell.distance_from_water = dw;
        cell.distance_from_freshwater = df;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_scales_by_max() {
        let mut d = vec![0.0, 2.0, 4.0];
        normalize_distances(&mut d);
        assert_eq!(d, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_unreached_is_one() {
        let mut d = vec![0.0, f64::INFINITY, 3.0];
        normalize_distances(&mut d);
        assert_eq!(d, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_normalize_all_zero() {
        let mut d = vec![0.0, 0.0];
        normalize_distances(&mut d);
        assert_eq!(d, vec![0.0, 0.0]);

        let mut none = vec![f64::INFINITY; 3];
        normalize_distances(&mut none);
        assert_eq!(none, vec![1.0; 3]);
    }
}
