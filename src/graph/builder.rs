//! Builds the cell/corner/edge graph from a Voronoi tessellation.

use std::collections::HashMap;

use glam::DVec2;
use rand::Rng;

use super::entities::{Cell, CellId, Corner, CornerId, Edge, EdgeId, WorldGraph};
use super::voronoi::{lloyd_relaxation, tessellate};
use super::GraphError;

/// Corners closer than this (in map units) are treated as the same vertex.
const CORNER_QUANTUM: f64 = 1e-6;

/// Builds [`WorldGraph`]s inside a fixed rectangle.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    width: f64,
    height: f64,
    lloyd_iterations: usize,
    lloyd_omega: f64,
}

impl GraphBuilder {
    /// Creates a builder for the rectangle `[0, width] x [0, height]`.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            lloyd_iterations: 0,
            lloyd_omega: 1.0,
        }
    }

    /// Sets the number of relaxation passes and the step fraction per pass.
    pub fn with_relaxation(mut self, iterations: usize, omega: f64) -> Self {
        self.lloyd_iterations = iterations;
        self.lloyd_omega = omega;
        self
    }

    /// Scatters `site_count` uniform random sites and builds the graph.
    pub fn build_random<R: Rng>(&self, site_count: usize, rng: &mut R) -> Result<WorldGraph, GraphError> {
        self.check_bounds()?;
        let sites: Vec<DVec2> = (0..site_count)
            .map(|_| {
                DVec2::new(
                    rng.random::<f64>() * self.width,
                    rng.random::<f64>() * self.height,
                )
            })
            .collect();
        self.build_from_sites(sites)
    }

    /// Builds the graph from caller-supplied sites.
    ///
    /// One cell is created per site, in the order given.
    pub fn build_from_sites(&self, mut sites: Vec<DVec2>) -> Result<WorldGraph, GraphError> {
        self.check_bounds()?;
        if sites.len() < 3 {
            return Err(GraphError::TooFewSites(sites.len()));
        }

        let mut polygons = tessellate(self.width, self.height, &sites)?;
        for _ in 0..self.lloyd_iterations {
            lloyd_relaxation(&mut sites, &polygons, self.lloyd_omega);
            polygons = tessellate(self.width, self.height, &sites)?;
        }

        let graph = assemble(self.width, self.height, &sites, &polygons);
        log::debug!(
            "Built graph: {} cells, {} corners, {} edges",
            graph.cells.len(),
            graph.corners.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    fn check_bounds(&self) -> Result<(), GraphError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(GraphError::InvalidBounds(self.width, self.height));
        }
        Ok(())
    }
}

fn corner_key(p: DVec2) -> (i64, i64) {
    (
        (p.x / CORNER_QUANTUM).round() as i64,
        (p.y / CORNER_QUANTUM).round() as i64,
    )
}

/// Deduplicates polygon vertices into corners and polygon sides into edges.
fn assemble(width: f64, height: f64, sites: &[DVec2], polygons: &[Vec<DVec2>]) -> WorldGraph {
    let mut cells: Vec<Cell> = sites.iter().map(|&s| Cell::new(s)).collect();
    let mut corners: Vec<Corner> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();

    let mut corner_lookup: HashMap<(i64, i64), CornerId> = HashMap::new();
    let mut edge_lookup: HashMap<(CornerId, CornerId), EdgeId> = HashMap::new();

    for (ci, polygon) in polygons.iter().enumerate() {
        let cell_id = CellId(ci);
        if polygon.is_empty() {
            log::warn!("Cell {} has an empty polygon", ci);
            continue;
        }

        // Resolve corners, dropping consecutive duplicates produced by clipping.
        let mut ring: Vec<CornerId> = Vec::with_capacity(polygon.len());
        for &p in polygon {
            let id = *corner_lookup.entry(corner_key(p)).or_insert_with(|| {
                corners.push(Corner::new(p));
                CornerId(corners.len() - 1)
            });
            if ring.last() != Some(&id) {
                ring.push(id);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        for &corner in &ring {
            let touching = &mut corners[corner.index()].cells;
            if !touching.contains(&cell_id) {
                touching.push(cell_id);
            }
        }

        if ring.len() >= 2 {
            for i in 0..ring.len() {
                let from = ring[i];
                let to = ring[(i + 1) % ring.len()];
                if from == to {
                    continue;
                }
                let key = if from < to { (from, to) } else { (to, from) };

                let edge_id = match edge_lookup.get(&key) {
                    Some(&existing) => {
                        let edge = &mut edges[existing.index()];
                        if edge.from_cell != cell_id && edge.to_cell.is_none() {
                            edge.to_cell = Some(cell_id);
                        } else if edge.from_cell != cell_id && edge.to_cell != Some(cell_id) {
                            log::warn!("Edge {:?} seen by a third cell {}", existing, ci);
                        }
                        existing
                    }
                    None => {
                        let id = EdgeId(edges.len());
                        let length = corners[from.index()]
                            .position
                            .distance(corners[to.index()].position);
                        edges.push(Edge {
                            from_corner: from,
                            to_corner: to,
                            from_cell: cell_id,
                            to_cell: None,
                            length,
                            coast: false,
                            river: false,
                            downslope: None,
                        });
                        corners[from.index()].edges.push(id);
                        corners[to.index()].edges.push(id);
                        edge_lookup.insert(key, id);
                        id
                    }
                };

                let cell_edges = &mut cells[ci].edges;
                if !cell_edges.contains(&edge_id) {
                    cell_edges.push(edge_id);
                }
            }
        }

        cells[ci].corners = ring;
    }

    WorldGraph {
        width,
        height,
        cells,
        corners,
        edges,
    }
}
