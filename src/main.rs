//! Worldmap CLI - Voronoi terrain generator.
//!
//! Generate a planar world of Voronoi cells with rivers, climate and biomes,
//! then export map layers and heightmaps as PNG.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use worldmap::export::{export_heightmap_png, export_map_png, HeightmapOptions, MapLayer, MapOptions};
use worldmap::hydrology::HydrologyConfig;
use worldmap::terrain::{World, WorldConfig};

/// Procedural Voronoi terrain generator.
#[derive(Parser)]
#[command(name = "worldmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a world and export it as PNG images.
    Generate {
        #[command(flatten)]
        world: WorldArgs,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "world")]
        name: String,

        /// Map layer to render.
        #[arg(short, long, default_value = "biomes")]
        layer: LayerArg,

        /// Draw rivers over the map.
        #[arg(long)]
        rivers: bool,

        /// Also export a 16-bit heightmap.
        #[arg(long)]
        heightmap: bool,

        /// Output image size in pixels (defaults to the map size).
        #[arg(long)]
        image_size: Option<u32>,
    },
    /// Print what lies at one point of a generated world.
    Inspect {
        #[command(flatten)]
        world: WorldArgs,

        /// X coordinate in map units.
        #[arg(long)]
        x: f64,

        /// Y coordinate in map units.
        #[arg(long)]
        y: f64,
    },
}

/// World construction options shared by every subcommand.
#[derive(Args)]
struct WorldArgs {
    /// JSON world config; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in map units.
    #[arg(long)]
    width: Option<f64>,

    /// Map height in map units.
    #[arg(long)]
    height: Option<f64>,

    /// Number of Voronoi cells.
    #[arg(long)]
    sites: Option<usize>,

    /// Lloyd relaxation passes.
    #[arg(long)]
    lloyd_iters: Option<usize>,

    /// Lloyd relaxation factor in (0, 1].
    #[arg(long)]
    lloyd_omega: Option<f64>,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start from a named preset instead of the defaults.
    #[arg(long)]
    preset: Option<Preset>,

    /// Hydrology tuning; overrides the config file's section.
    #[arg(long)]
    hydrology: Option<HydrologyPreset>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// 400x400, 250 cells.
    Small,
    /// 1600x1600, 8000 relaxed cells.
    Detailed,
}

#[derive(Clone, Copy, ValueEnum)]
enum HydrologyPreset {
    Default,
    /// Larger landmasses and more rivers.
    Wet,
    /// Broken coastlines and few rivers.
    Arid,
}

impl From<HydrologyPreset> for HydrologyConfig {
    fn from(preset: HydrologyPreset) -> Self {
        match preset {
            HydrologyPreset::Default => HydrologyConfig::default(),
            HydrologyPreset::Wet => HydrologyConfig::wet(),
            HydrologyPreset::Arid => HydrologyConfig::arid(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Biomes,
    Moisture,
    Temperature,
    Elevation,
}

impl From<LayerArg> for MapLayer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Biomes => MapLayer::Biomes,
            LayerArg::Moisture => MapLayer::Moisture,
            LayerArg::Temperature => MapLayer::Temperature,
            LayerArg::Elevation => MapLayer::Elevation,
        }
    }
}

impl WorldArgs {
    /// Builds the config: preset or file first, then flag overrides.
    fn to_config(&self) -> Result<WorldConfig, String> {
        let time_seed = || {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        };

        let mut cfg = match (&self.config, self.preset) {
            (Some(path), _) => WorldConfig::from_json_file(path).map_err(|e| e.to_string())?,
            (None, Some(Preset::Small)) => WorldConfig::small(self.seed.unwrap_or_else(time_seed)),
            (None, Some(Preset::Detailed)) => WorldConfig::detailed(self.seed.unwrap_or_else(time_seed)),
            (None, None) => WorldConfig {
                seed: self.seed.unwrap_or_else(time_seed),
                ..WorldConfig::default()
            },
        };

        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.height {
            cfg.height = v;
        }
        if let Some(v) = self.sites {
            cfg.site_count = v;
        }
        if let Some(v) = self.lloyd_iters {
            cfg.lloyd_iterations = v;
        }
        if let Some(v) = self.lloyd_omega {
            cfg.lloyd_omega = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.hydrology {
            cfg.hydrology = v.into();
        }

        cfg.validate().map_err(|e| e.to_string())?;
        Ok(cfg)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            world,
            output,
            name,
            layer,
            rivers,
            heightmap,
            image_size,
        } => run_generate(&world, output, name, layer.into(), rivers, heightmap, image_size),
        Commands::Inspect { world, x, y } => run_inspect(&world, x, y),
    }
}

fn build_world(args: &WorldArgs) -> World {
    let config = match args.to_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Size: {}x{}", config.width, config.height);
    println!("Cells: {}", config.site_count);
    println!("Seed: {}", config.seed);

    let start = Instant::now();
    match World::generate(config) {
        Ok(world) => {
            println!("Generation completed in {:.2?}", start.elapsed());
            world
        }
        Err(e) => {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_generate(
    args: &WorldArgs,
    output: PathBuf,
    name: String,
    layer: MapLayer,
    rivers: bool,
    heightmap: bool,
    image_size: Option<u32>,
) {
    println!("Worldmap - Voronoi Terrain Generator");
    println!("====================================");
    println!("Output: {}", output.display());

    let world = build_world(args);
    let graph = world.graph();
    println!(
        "Water cells: {} / {}, river edges: {}",
        graph.water_cell_count(),
        graph.cells.len(),
        graph.river_edge_count()
    );

    if let Err(e) = std::fs::create_dir_all(&output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    let (width, height) = match image_size {
        Some(size) => (size, size),
        None => {
            let auto = HeightmapOptions::for_world(&world);
            (auto.width, auto.height)
        }
    };

    println!("\nExporting...");
    let export_start = Instant::now();

    let map_path = output.join(format!("{}_{}.png", name, layer.name()));
    let map_options = MapOptions {
        width,
        height,
        layer,
        rivers,
        ..Default::default()
    };
    if let Err(e) = export_map_png(&world, &map_path, &map_options) {
        eprintln!("Error exporting map: {}", e);
        std::process::exit(1);
    }
    println!("  Exported {}", map_path.display());

    if heightmap {
        let path = output.join(format!("{}_height.png", name));
        let options = HeightmapOptions {
            width,
            height,
            ..Default::default()
        };
        match export_heightmap_png(&world, &path, &options) {
            Ok((min, max)) => {
                println!("  Exported {}", path.display());
                println!("  Height range: [{:.4}, {:.4}]", min, max);
            }
            Err(e) => {
                eprintln!("Error exporting heightmap: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
}

fn run_inspect(args: &WorldArgs, x: f64, y: f64) {
    let mut world = build_world(args);

    println!("\nPoint ({}, {})", x, y);
    println!("Elevation: {:.4}", world.elevation(x, y));
    let [r, g, b] = world.color(x, y);
    println!("Color: #{:02x}{:02x}{:02x}", r, g, b);

    world.select(x, y);
    match world.selected_report() {
        Some(report) => println!("\nNearest cell\n{}", report),
        None => {
            eprintln!("Error: no cell at ({}, {})", x, y);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_args(argv: &[&str]) -> WorldArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Generate { world, .. } | Commands::Inspect { world, .. } => world,
        }
    }

    #[test]
    fn hydrology_flag_selects_preset() {
        let wet = world_args(&["worldmap", "generate", "--seed", "3", "--hydrology", "wet"]);
        assert_eq!(wet.to_config().unwrap().hydrology, HydrologyConfig::wet());

        let arid = world_args(&["worldmap", "inspect", "--x", "1", "--y", "2", "--seed", "3", "--hydrology", "arid"]);
        assert_eq!(arid.to_config().unwrap().hydrology, HydrologyConfig::arid());

        let plain = world_args(&["worldmap", "generate", "--seed", "3"]);
        assert_eq!(plain.to_config().unwrap().hydrology, HydrologyConfig::default());
    }

    #[test]
    fn hydrology_flag_applies_on_top_of_preset() {
        let args = world_args(&["worldmap", "generate", "--preset", "small", "--seed", "8", "--hydrology", "arid"]);
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.site_count, WorldConfig::small(8).site_count);
        assert_eq!(cfg.hydrology, HydrologyConfig::arid());
    }

    #[test]
    fn unknown_hydrology_preset_is_rejected() {
        assert!(Cli::try_parse_from(["worldmap", "generate", "--hydrology", "swamp"]).is_err());
    }

    #[test]
    fn flag_overrides_are_validated() {
        let args = world_args(&["worldmap", "generate", "--seed", "1", "--lloyd-omega", "0"]);
        assert!(args.to_config().is_err());
    }
}
