//! Generation stage trait and pipeline orchestration.

use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;
use thiserror::Error;

use crate::biomes::{assign_biomes, BiomeConfig};
use crate::climate::run_climate;
use crate::graph::WorldGraph;
use crate::hydrology::{run_hydrology, HydrologyConfig};
use crate::noise::NoiseSource;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Water, coastline, elevation, rivers and distance fields.
    Hydrology,
    /// Latitude, moisture and temperature.
    Climate,
    /// Biome classification.
    Biomes,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Hydrology => "hydrology",
            StageId::Climate => "climate",
            StageId::Biomes => "biomes",
        }
    }
}

/// Shared state threaded through every stage.
///
/// One noise source and one RNG per generation, so a seed fully determines
/// the result.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub noise: NoiseSource,
    pub rng: ChaCha8Rng,
}

impl StageContext {
    pub fn new(noise: NoiseSource, rng: ChaCha8Rng) -> Self {
        Self { noise, rng }
    }

    /// Creates a context whose noise and RNG both derive from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(NoiseSource::new(seed), ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// One step of world generation.
///
/// A stage writes only its own fields on the graph and may read any field
/// written by the stages it depends on.
pub trait GenerationStage: Send + Sync {
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the graph in place.
    fn execute(&self, graph: &mut WorldGraph, ctx: &mut StageContext) -> Result<(), PipelineError>;
}

/// Orchestrates generation stages in insertion order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrology, climate and biomes with the given settings.
    pub fn standard(hydrology: HydrologyConfig, biomes: BiomeConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(HydrologyStage::new(hydrology))
            .add_stage(ClimateStage)
            .add_stage(BiomeStage::new(biomes));
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given graph.
    pub fn run(&self, graph: &mut WorldGraph, ctx: &mut StageContext) -> Result<(), PipelineError> {
        self.run_with_callbacks(graph, ctx, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `on_stage_start` - Called with (name, index, total) before each stage
    /// * `on_stage_complete` - Called with (name, index, total) after each stage
    pub fn run_with_callbacks<F1, F2>(
        &self,
        graph: &mut WorldGraph,
        ctx: &mut StageContext,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            log::info!("Running stage '{}' ({}/{})", stage.name(), i + 1, total);
            stage.execute(graph, ctx)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Water, coastline, elevation and river stage.
pub struct HydrologyStage {
    pub config: HydrologyConfig,
}

impl HydrologyStage {
    pub fn new(config: HydrologyConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for HydrologyStage {
    fn id(&self) -> StageId {
        StageId::Hydrology
    }

    fn name(&self) -> &str {
        "Hydrology"
    }

    fn execute(&self, graph: &mut WorldGraph, ctx: &mut StageContext) -> Result<(), PipelineError> {
        if graph.cells.is_empty() {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                "graph has no cells".to_string(),
            ));
        }

        let summary = run_hydrology(graph, &ctx.noise, &mut ctx.rng, &self.config);
        log::debug!(
            "Hydrology: {} water cells, {} coast edges, {} rivers over {} edges",
            summary.water_cells,
            summary.coast_edges,
            summary.rivers,
            summary.river_edges
        );
        Ok(())
    }
}

/// Latitude, moisture and temperature stage.
pub struct ClimateStage;

impl GenerationStage for ClimateStage {
    fn id(&self) -> StageId {
        StageId::Climate
    }

    fn name(&self) -> &str {
        "Climate"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Hydrology]
    }

    fn execute(&self, graph: &mut WorldGraph, _ctx: &mut StageContext) -> Result<(), PipelineError> {
        run_climate(graph);
        Ok(())
    }
}

/// Biome classification stage.
pub struct BiomeStage {
    pub config: BiomeConfig,
}

impl BiomeStage {
    pub fn new(config: BiomeConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for BiomeStage {
    fn id(&self) -> StageId {
        StageId::Biomes
    }

    fn name(&self) -> &str {
        "Biome Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Climate]
    }

    fn execute(&self, graph: &mut WorldGraph, _ctx: &mut StageContext) -> Result<(), PipelineError> {
        assign_biomes(graph, &self.config);
        if log::log_enabled!(log::Level::Debug) {
            let land = graph.cells.iter().filter(|c| !c.water).count();
            log::debug!("Biomes assigned to {} cells ({} land)", graph.cells.len(), land);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::graph::GraphBuilder;

    fn graph(seed: u64) -> WorldGraph {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        GraphBuilder::new(400.0, 400.0).build_random(300, &mut rng).unwrap()
    }

    #[test]
    fn test_stage_id_name() {
        assert_eq!(StageId::Hydrology.name(), "hydrology");
        assert_eq!(StageId::Biomes.name(), "biomes");
    }

    #[test]
    fn test_standard_pipeline_assigns_every_biome() {
        let pipeline = Pipeline::standard(HydrologyConfig::default(), BiomeConfig::default());
        assert_eq!(pipeline.stage_count(), 3);

        let mut g = graph(3);
        pipeline.run(&mut g, &mut StageContext::from_seed(3)).unwrap();

        for cell in &g.cells {
            let biome = cell.biome.expect("biome assigned");
            assert_eq!(biome == Biome::Water, cell.water);
        }
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(BiomeStage::new(BiomeConfig::default()));

        let mut g = graph(4);
        let err = pipeline.run(&mut g, &mut StageContext::from_seed(4)).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingDependency("Biome Classification".into(), "climate".into())
        );
        assert!(g.cells.iter().all(|c| c.biome.is_none()));
    }

    #[test]
    fn test_pipeline_with_callbacks() {
        let pipeline = Pipeline::standard(HydrologyConfig::default(), BiomeConfig::default());
        let mut g = graph(5);
        let mut started = Vec::new();
        let mut completed = 0;

        pipeline
            .run_with_callbacks(
                &mut g,
                &mut StageContext::from_seed(5),
                |name, _, total| {
                    assert_eq!(total, 3);
                    started.push(name.to_string());
                },
                |_, _, _| completed += 1,
            )
            .unwrap();

        assert_eq!(started, vec!["Hydrology", "Climate", "Biome Classification"]);
        assert_eq!(completed, 3);
    }

    #[test]
    fn test_same_seed_same_world() {
        let pipeline = Pipeline::standard(HydrologyConfig::default(), BiomeConfig::default());
        let run = || {
            let mut g = graph(6);
            pipeline.run(&mut g, &mut StageContext::from_seed(6)).unwrap();
            g.edges.iter().map(|e| e.river).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
