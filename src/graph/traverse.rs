//! Worklist traversals shared by the hydrology stage.

use std::collections::VecDeque;

use super::entities::{CellId, CornerId, Edge, WorldGraph};

/// Multi-source walk over the corner/edge graph.
///
/// Starting from every corner in `frontier`, each dequeued corner visits its
/// incident edges and hands `(current, edge, neighbor)` to `accept`. When
/// `accept` returns true the neighbor is enqueued again. The walk ends when
/// the queue is empty.
///
/// `accept` must only return true when it strictly improved some value for
/// the neighbor, otherwise the walk does not terminate.
pub fn propagate<I, F>(graph: &WorldGraph, frontier: I, mut accept: F)
where
    I: IntoIterator<Item = CornerId>,
    F: FnMut(CornerId, &Edge, CornerId) -> bool,
{
    let mut queue: VecDeque<CornerId> = frontier.into_iter().collect();

    while let Some(current) = queue.pop_front() {
        for &edge_id in &graph.corner(current).edges {
            let edge = graph.edge(edge_id);
            let neighbor = edge.other_corner(current);
            if accept(current, edge, neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
}

/// Relaxes `dist` outward from the seeds already holding finite values.
///
/// Corners for which `blocked` returns true are never entered. Used for the
/// coast, water and freshwater distance fields.
pub fn propagate_distance<B>(graph: &WorldGraph, dist: &mut [f64], blocked: B)
where
    B: Fn(CornerId) -> bool,
{
    let seeds: Vec<CornerId> = graph
        .corner_ids()
        .filter(|c| dist[c.index()].is_finite())
        .collect();

    propagate(graph, seeds, |current, edge, neighbor| {
        if blocked(neighbor) {
            return false;
        }
        let candidate = dist[current.index()] + edge.length;
        if candidate < dist[neighbor.index()] {
            dist[neighbor.index()] = candidate;
            true
        } else {
            false
        }
    });
}

/// Flood fill over cell adjacency with an explicit stack.
///
/// Each cell is visited at most once. Cells rejected by `pred` are marked
/// visited but not expanded. Returns the accepted cells in visit order.
pub fn flood_fill_cells<P>(graph: &WorldGraph, start: CellId, pred: P) -> Vec<CellId>
where
    P: Fn(CellId) -> bool,
{
    let mut visited = vec![false; graph.cells.len()];
    let mut accepted = Vec::new();
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        if visited[cell.index()] {
            continue;
        }
        visited[cell.index()] = true;
        if !pred(cell) {
            continue;
        }
        accepted.push(cell);
        stack.extend(graph.cell_neighbors(cell).filter(|n| !visited[n.index()]));
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use glam::DVec2;

    fn grid_graph() -> WorldGraph {
        // Jittered 6x6 lattice: small enough to reason about, irregular enough
        // to avoid co-circular sites.
        let mut sites = Vec::new();
        for j in 0..6 {
            for i in 0..6 {
                let jitter = ((i * 7 + j * 13) % 5) as f64 * 0.7;
                sites.push(DVec2::new(10.0 + i as f64 * 20.0 + jitter, 10.0 + j as f64 * 20.0 - jitter));
            }
        }
        GraphBuilder::new(120.0, 120.0).build_from_sites(sites).unwrap()
    }

    #[test]
    fn test_distance_zero_at_seed_and_monotone() {
        let graph = grid_graph();
        let mut dist = vec![f64::INFINITY; graph.corners.len()];
        dist[0] = 0.0;
        propagate_distance(&graph, &mut dist, |_| false);

        assert_eq!(dist[0], 0.0);
        assert!(dist.iter().all(|d| d.is_finite()), "graph should be connected");

        // Triangle inequality along every edge after relaxation.
        for edge in &graph.edges {
            let a = dist[edge.from_corner.index()];
            let b = dist[edge.to_corner.index()];
            assert!(a <= b + edge.length + 1e-9);
            assert!(b <= a + edge.length + 1e-9);
        }
    }

    #[test]
    fn test_blocked_corners_are_never_entered() {
        let graph = grid_graph();
        let mut dist = vec![f64::INFINITY; graph.corners.len()];
        dist[0] = 0.0;
        let blocked: Vec<CornerId> = graph.corner(CornerId(0)).edges.iter()
            .map(|&e| graph.edge(e).other_corner(CornerId(0)))
            .collect();
        propagate_distance(&graph, &mut dist, |c| blocked.contains(&c));
        for c in &blocked {
            assert!(dist[c.index()].is_infinite());
        }
    }

    #[test]
    fn test_flood_fill_respects_predicate() {
        let graph = grid_graph();
        let left_half = |c: CellId| graph.cell(c).position.x < 60.0;
        let filled = flood_fill_cells(&graph, CellId(0), left_half);

        assert!(!filled.is_empty());
        for c in &filled {
            assert!(graph.cell(*c).position.x < 60.0);
        }
        let mut unique = filled.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), filled.len(), "cells must be visited once");
    }

    #[test]
    fn test_flood_fill_rejected_start() {
        let graph = grid_graph();
        let filled = flood_fill_cells(&graph, CellId(0), |_| false);
        assert!(filled.is_empty());
    }
}
