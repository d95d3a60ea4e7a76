//! Procedural Voronoi terrain generator.
//!
//! Builds a planar graph of cells, corners and edges from a Voronoi
//! tessellation, then runs hydrology, climate and biome stages over it.
//! The finished [`World`] answers elevation and color queries at arbitrary
//! coordinates and can be exported as PNG maps.

pub mod biomes;
pub mod climate;
pub mod export;
pub mod graph;
pub mod hydrology;
pub mod noise;
pub mod pipeline;
pub mod sampler;
pub mod terrain;

pub use biomes::{Biome, BiomeConfig};
pub use graph::{Cell, CellId, Corner, CornerId, Edge, EdgeId, GraphBuilder, GraphError, WorldGraph};
pub use hydrology::HydrologyConfig;
pub use noise::NoiseSource;
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageContext, StageId};
pub use sampler::{Sampler, SamplerConfig};
pub use terrain::{CellReport, ConfigError, World, WorldConfig, WorldError};
