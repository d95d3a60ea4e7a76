//! Pipeline module for orchestrating world generation stages.
//!
//! Each stage fills in one layer of the graph; the pipeline checks that a
//! stage's dependencies ran before it.

mod stage;

pub use stage::{
    BiomeStage, ClimateStage, GenerationStage, HydrologyStage, Pipeline, PipelineError, StageContext,
    StageId,
};
