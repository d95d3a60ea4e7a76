//! Planar cell/corner/edge graph built from a Voronoi tessellation.
//!
//! Entities live in one arena per type and refer to each other through
//! [`CellId`], [`CornerId`] and [`EdgeId`]. A graph is built once and only its
//! per-entity fields change afterwards, stage by stage.

mod builder;
mod entities;
pub mod traverse;
pub mod voronoi;

use thiserror::Error;

pub use builder::GraphBuilder;
pub use entities::{Cell, CellId, Corner, CornerId, Edge, EdgeId, WorldGraph};

/// Errors that can occur while building a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Not enough sites for a tessellation: {0} (need at least 3)")]
    TooFewSites(usize),
    #[error("Invalid map bounds: {0} x {1}")]
    InvalidBounds(f64, f64),
    #[error("Voronoi tessellation failed for {0} sites")]
    Tessellation(usize),
}
