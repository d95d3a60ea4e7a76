//! River tracing along edge downslopes.

use std::collections::HashSet;

use rand::Rng;

use crate::graph::{CornerId, EdgeId, WorldGraph};

/// Traces one river from `source` and marks its edges.
///
/// At each corner the river follows the incident edge whose downslope corner
/// is lowest, skipping edges that point back at the current corner and
/// corners this trace already passed. Ties keep the first edge found. The
/// trace stops at a sea corner or when no candidate remains, so it takes at
/// most `corners.len()` steps even across flat plateaus.
///
/// # Returns
/// The edges marked by this trace, in order.
pub fn trace_river(graph: &mut WorldGraph, source: CornerId) -> Vec<EdgeId> {
    let mut path = Vec::new();
    let mut visited: HashSet<CornerId> = HashSet::new();
    let mut current = source;

    loop {
        if graph.is_sea_corner(current) {
            break;
        }
        visited.insert(current);

        let mut best: Option<(EdgeId, CornerId, f64)> = None;
        for &edge_id in &graph.corner(current).edges {
            let Some(down) = graph.edge(edge_id).downslope else {
                continue;
            };
            if down == current || visited.contains(&down) {
                continue;
            }
            let z = graph.corner(down).z;
            if best.map_or(true, |(_, _, best_z)| z < best_z) {
                best = Some((edge_id, down, z));
            }
        }

        let Some((edge_id, next, _)) = best else {
            break;
        };
        graph.edges[edge_id.index()].river = true;
        path.push(edge_id);
        current = next;
    }

    path
}

/// Spawns rivers from high corners.
///
/// Corners are considered in index order; each one above `min_elevation`
/// draws from `rng` and starts a trace with probability `probability`.
///
/// # Returns
/// Number of rivers traced.
pub fn make_rivers<R: Rng>(graph: &mut WorldGraph, min_elevation: f64, probability: f64, rng: &mut R) -> usize {
    let mut rivers = 0;
    for i in 0..graph.corners.len() {
        if graph.corners[i].z > min_elevation && rng.random::<f64>() < probability {
            trace_river(graph, CornerId(i));
            rivers += 1;
        }
    }
    rivers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::hydrology::elevation::assign_downslope;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn land_graph() -> WorldGraph {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut g = GraphBuilder::new(300.0, 300.0).build_random(200, &mut rng).unwrap();
        for cell in &mut g.cells {
            cell.water = false;
        }
        g
    }

    #[test]
    fn plateau_trace_terminates() {
        let mut g = land_graph();
        for corner in &mut g.corners {
            corner.z = 0.5;
        }
        assign_downslope(&mut g);

        let path = trace_river(&mut g, CornerId(0));
        assert!(path.len() <= g.corners.len());

        let mut unique = path.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), path.len(), "a trace never repeats an edge");
    }

    #[test]
    fn descending_trace_follows_lowest_neighbor() {
        let mut g = land_graph();
        // Elevation falls toward the top-left; the y term breaks ties along
        // vertical boundary edges.
        for corner in &mut g.corners {
            corner.z = (corner.position.x + 0.37 * corner.position.y) / 420.0;
        }
        assign_downslope(&mut g);

        let source = g
            .corner_ids()
            .max_by(|a, b| g.corner(*a).z.total_cmp(&g.corner(*b).z))
            .unwrap();
        let path = trace_river(&mut g, source);
        assert!(!path.is_empty());

        // Each step lands strictly lower than the corner before it.
        let mut current = source;
        for e in &path {
            let edge = g.edge(*e);
            assert!(edge.river);
            let next = edge.other_corner(current);
            assert!(g.corner(next).z < g.corner(current).z);
            current = next;
        }
        assert!(path.len() <= g.corners.len());
    }

    #[test]
    fn trace_stops_at_sea() {
        let mut g = land_graph();
        for cell in &mut g.cells {
            cell.water = true;
        }
        for corner in &mut g.corners {
            corner.z = 1.0 - corner.position.distance(DVec2::new(150.0, 150.0)) / 300.0;
        }
        assign_downslope(&mut g);
        assert!(trace_river(&mut g, CornerId(0)).is_empty());
    }

    #[test]
    fn rivers_are_reproducible() {
        let run = || {
            let mut g = land_graph();
            for corner in &mut g.corners {
                corner.z = corner.position.y / 300.0;
            }
            assign_downslope(&mut g);
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            make_rivers(&mut g, 0.25, 0.3, &mut rng);
            g.edges.iter().map(|e| e.river).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
