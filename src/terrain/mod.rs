//! World facade.
//!
//! Ties configuration, graph construction, the generation pipeline and the
//! sampler together behind one query surface.

mod config;
mod world;

pub use config::{ConfigError, WorldConfig};
pub use world::{CellReport, World, WorldError};
