//! The finished world: graph, sampler and selection state.

use std::fmt;

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use super::config::{ConfigError, WorldConfig};
use crate::biomes::Biome;
use crate::graph::{Cell, CellId, GraphBuilder, GraphError, WorldGraph};
use crate::noise::NoiseSource;
use crate::pipeline::{Pipeline, PipelineError, StageContext};
use crate::sampler::Sampler;

/// Any failure while generating or querying a world.
#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Image buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// A generated world and its query surface.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    graph: WorldGraph,
    sampler: Sampler,
    selected: Option<CellId>,
    highlighted: Option<CellId>,
}

impl World {
    /// Builds the graph and runs hydrology, climate and biomes.
    ///
    /// The config is validated before any work starts.
    pub fn generate(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        log::info!(
            "Generating {}x{} world with {} sites (seed {})",
            config.width,
            config.height,
            config.site_count,
            config.seed
        );

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let noise = NoiseSource::new(config.seed);

        let mut graph = GraphBuilder::new(config.width, config.height)
            .with_relaxation(config.lloyd_iterations, config.lloyd_omega)
            .build_random(config.site_count, &mut rng)?;
        log::debug!(
            "Graph: {} cells, {} corners, {} edges",
            graph.cells.len(),
            graph.corners.len(),
            graph.edges.len()
        );

        let mut ctx = StageContext::new(noise.clone(), rng);
        Pipeline::standard(config.hydrology.clone(), config.biomes.clone()).run(&mut graph, &mut ctx)?;

        let sampler = Sampler::new(&graph, noise, config.sampler.clone());
        log::info!("World ready");

        Ok(Self {
            config,
            graph,
            sampler,
            selected: None,
            highlighted: None,
        })
    }

    /// Replaces this world with a freshly generated one.
    ///
    /// On error the current world is left untouched.
    pub fn regenerate(&mut self, config: WorldConfig) -> Result<(), WorldError> {
        *self = Self::generate(config)?;
        Ok(())
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn graph(&self) -> &WorldGraph {
        &self.graph
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn width(&self) -> f64 {
        self.graph.width
    }

    pub fn height(&self) -> f64 {
        self.graph.height
    }

    /// Cell owning `(x, y)` after warping. `None` outside the map.
    pub fn cell(&self, x: f64, y: f64) -> Option<&Cell> {
        self.sampler.locate(x, y).map(|id| self.graph.cell(id))
    }

    /// Terrain height at `(x, y)`; 0 outside the map.
    pub fn elevation(&self, x: f64, y: f64) -> f64 {
        self.sampler.elevation(&self.graph, x, y)
    }

    /// Biome color at `(x, y)`; water outside the map.
    pub fn color(&self, x: f64, y: f64) -> [u8; 3] {
        self.sampler.color(&self.graph, x, y)
    }

    /// Fills an RGBA buffer by sampling [`World::color`] on a regular grid
    /// spanning `[x0, x1) x [y0, y1)`.
    ///
    /// Rows are sampled in parallel.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_to_image(
        &self,
        buffer: &mut [u8],
        width: usize,
        height: usize,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> Result<(), WorldError> {
        let expected = width * height * 4;
        if buffer.len() != expected {
            return Err(WorldError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        let dx = (x1 - x0) / width as f64;
        let dy = (y1 - y0) / height as f64;
        buffer
            .par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(j, row)| {
                let y = y0 + j as f64 * dy;
                for (i, px) in row.chunks_exact_mut(4).enumerate() {
                    let [r, g, b] = self.color(x0 + i as f64 * dx, y);
                    px.copy_from_slice(&[r, g, b, 255]);
                }
            });
        Ok(())
    }

    /// Cell with the site nearest to `(x, y)`, without warping.
    ///
    /// Points outside the map are clamped onto it first.
    fn nearest(&self, x: f64, y: f64) -> Option<CellId> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let p = DVec2::new(x.clamp(0.0, self.width()), y.clamp(0.0, self.height()));
        self.sampler.nearest_cell(p.x, p.y)
    }

    pub fn select(&mut self, x: f64, y: f64) {
        self.selected = self.nearest(x, y);
    }

    pub fn highlight(&mut self, x: f64, y: f64) {
        self.highlighted = self.nearest(x, y);
    }

    pub fn selected(&self) -> Option<&Cell> {
        self.selected.map(|id| self.graph.cell(id))
    }

    pub fn highlighted(&self) -> Option<&Cell> {
        self.highlighted.map(|id| self.graph.cell(id))
    }

    /// Readout for the selected cell.
    pub fn selected_report(&self) -> Option<CellReport> {
        self.selected().map(CellReport::from_cell)
    }
}

/// Summary of one cell's attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub biome: Biome,
    pub moisture: f64,
    pub elevation: f64,
    pub latitude: f64,
    pub temperature: f64,
    pub distance_from_coast: f64,
    pub distance_from_water: f64,
    pub distance_from_freshwater: f64,
}

impl CellReport {
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            biome: cell.biome_or_water(),
            moisture: cell.moisture,
            elevation: cell.z,
            latitude: cell.latitude,
            temperature: cell.temperature,
            distance_from_coast: cell.distance_from_coast,
            distance_from_water: cell.distance_from_water,
            distance_from_freshwater: cell.distance_from_freshwater,
        }
    }
}

impl fmt::Display for CellReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Biome: {}", self.biome)?;
        writeln!(f, "Moisture: {:.3}", self.moisture)?;
        writeln!(f, "Elevation: {:.3}", self.elevation)?;
        writeln!(f, "Latitude: {:.3}", self.latitude)?;
        writeln!(f, "Temperature: {:.3}", self.temperature)?;
        writeln!(f, "Distance from coast: {:.3}", self.distance_from_coast)?;
        writeln!(f, "Distance from water: {:.3}", self.distance_from_water)?;
        write!(f, "Distance from freshwater: {:.3}", self.distance_from_freshwater)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// The reference 800x800, 1000-site world, generated once.
    fn reference() -> &'static World {
        static WORLD: OnceLock<World> = OnceLock::new();
        WORLD.get_or_init(|| World::generate(WorldConfig::default()).unwrap())
    }

    #[test]
    fn test_reference_world_shape() {
        let world = reference();
        let g = world.graph();
        assert_eq!(g.cells.len(), 1000);
        assert!(g.water_cell_count() >= 1);
        assert!(g.cells.iter().all(|c| c.biome.is_some()));
    }

    #[test]
    fn test_edge_invariants() {
        let g = reference().graph();
        for edge in &g.edges {
            assert_ne!(edge.from_corner, edge.to_corner);
            if edge.coast {
                let to = edge.to_cell.expect("coastal edge has two cells");
                assert_ne!(g.cell(edge.from_cell).water, g.cell(to).water);
            }
        }
        for corner in &g.corners {
            assert!(!corner.edges.is_empty());
            if corner.cells.len() < 2 {
                let p = corner.position;
                let on_border = p.x.abs() < 1e-6
                    || p.y.abs() < 1e-6
                    || (p.x - g.width).abs() < 1e-6
                    || (p.y - g.height).abs() < 1e-6;
                assert!(on_border, "lone corner at {:?} is not on the border", p);
            }
        }
    }

    #[test]
    fn test_distances_in_unit_range() {
        let g = reference().graph();
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        for c in &g.cells {
            assert!(unit(c.distance_from_coast) && unit(c.distance_from_water) && unit(c.distance_from_freshwater));
        }
        for c in &g.corners {
            assert!(unit(c.distance_from_coast) && unit(c.distance_from_water) && unit(c.distance_from_freshwater));
        }
    }

    #[test]
    fn test_elevation_queries() {
        let world = reference();
        assert_eq!(world.elevation(-1.0, 0.0), 0.0);
        assert_eq!(world.elevation(0.0, 801.0), 0.0);
        assert!(world.elevation(0.0, 0.0).is_finite());

        for i in 0..50 {
            let (x, y) = (i as f64 * 15.7, 800.0 - i as f64 * 11.3);
            let z = world.elevation(x, y);
            assert!(z.is_finite());
            assert_eq!(z, world.elevation(x, y));
        }
    }

    #[test]
    fn test_color_and_cell_queries() {
        let world = reference();
        assert_eq!(world.color(-5.0, 10.0), Biome::Water.color());
        assert_eq!(world.color(10.0, 900.0), Biome::Water.color());
        assert!(world.cell(-5.0, 10.0).is_none());

        let cell = world.cell(400.0, 400.0).expect("inside the map");
        assert_eq!(world.color(400.0, 400.0), cell.biome_or_water().color());
    }

    #[test]
    fn test_draw_to_image() {
        let world = reference();
        let (w, h) = (16, 8);
        let mut buffer = vec![0u8; w * h * 4];
        world.draw_to_image(&mut buffer, w, h, 0.0, 0.0, 800.0, 800.0).unwrap();

        for j in 0..h {
            for i in 0..w {
                let k = (i + w * j) * 4;
                let (x, y) = (i as f64 * 50.0, j as f64 * 100.0);
                assert_eq!(&buffer[k..k + 3], &world.color(x, y));
                assert_eq!(buffer[k + 3], 255);
            }
        }

        let mut short = vec![0u8; 10];
        assert!(matches!(
            world.draw_to_image(&mut short, w, h, 0.0, 0.0, 800.0, 800.0),
            Err(WorldError::BufferSize { expected: 512, actual: 10 })
        ));
    }

    #[test]
    fn test_select_and_highlight() {
        let mut world = World::generate(WorldConfig::small(3)).unwrap();
        assert!(world.selected().is_none());

        world.select(100.0, 100.0);
        let p = DVec2::new(100.0, 100.0);
        let selected = world.selected().expect("selection set");
        let best = world
            .graph()
            .cells
            .iter()
            .map(|c| c.position.distance_squared(p))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(selected.position.distance_squared(p), best);

        world.highlight(-50.0, 10.0);
        assert!(world.highlighted().is_some());
        world.highlight(f64::NAN, 10.0);
        assert!(world.highlighted().is_none());

        let report = world.selected_report().unwrap();
        let text = report.to_string();
        assert!(text.starts_with("Biome: "));
        assert!(text.contains("Distance from freshwater"));
    }

    #[test]
    fn test_regenerate_failure_keeps_world() {
        let mut world = World::generate(WorldConfig::small(4)).unwrap();
        let before = world.graph().cells.len();

        let bad = WorldConfig {
            site_count: 0,
            ..WorldConfig::small(4)
        };
        assert!(matches!(world.regenerate(bad), Err(WorldError::Config(_))));
        assert_eq!(world.graph().cells.len(), before);

        world.regenerate(WorldConfig { site_count: 120, ..WorldConfig::small(5) }).unwrap();
        assert_eq!(world.graph().cells.len(), 120);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = World::generate(WorldConfig::small(11)).unwrap();
        let b = World::generate(WorldConfig::small(11)).unwrap();
        for (ca, cb) in a.graph().cells.iter().zip(&b.graph().cells) {
            assert_eq!(ca.position, cb.position);
            assert_eq!(ca.biome, cb.biome);
        }
        assert_eq!(a.elevation(123.0, 45.0), b.elevation(123.0, 45.0));
    }
}
