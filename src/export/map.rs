//! Colored map export: biomes, or a climate layer tinted over them.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::biomes::Biome;
use crate::graph::{Cell, WorldGraph};
use crate::terrain::World;

/// Which cell attribute colors the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapLayer {
    #[default]
    Biomes,
    Moisture,
    Temperature,
    Elevation,
}

impl MapLayer {
    pub const ALL: [MapLayer; 4] = [
        MapLayer::Biomes,
        MapLayer::Moisture,
        MapLayer::Temperature,
        MapLayer::Elevation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapLayer::Biomes => "biomes",
            MapLayer::Moisture => "moisture",
            MapLayer::Temperature => "temperature",
            MapLayer::Elevation => "elevation",
        }
    }

    /// Color of `cell` on this layer.
    ///
    /// Climate layers blend the biome color 95% toward a tint whose
    /// lightness follows the attribute.
    pub fn cell_color(self, cell: &Cell) -> [u8; 3] {
        let base = cell.biome_or_water().color();
        match self {
            MapLayer::Biomes => base,
            MapLayer::Moisture => mix(base, lighten([0x66, 0x99, 0xbb], 1.0 - cell.moisture), 0.95),
            MapLayer::Temperature => mix(base, lighten([0xff, 0x88, 0x55], -cell.temperature), 0.95),
            MapLayer::Elevation => mix(base, lighten([0x88, 0x88, 0x88], cell.z * 2.0), 0.95),
        }
    }
}

impl FromStr for MapLayer {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapLayer::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExportError::UnknownLayer(s.to_string()))
    }
}

/// Linear blend from `a` to `b` by `t`.
fn mix(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8;
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])]
}

/// Moves a color toward white for positive `amount`, toward black for
/// negative. One unit covers about a third of the way.
fn lighten(c: [u8; 3], amount: f64) -> [u8; 3] {
    let t = (amount.abs() * 0.35).min(1.0);
    if amount >= 0.0 {
        mix(c, [255, 255, 255], t)
    } else {
        mix(c, [0, 0, 0], t)
    }
}

/// Color used for river overlays.
pub const RIVER_COLOR: [u8; 3] = [0x66, 0x99, 0xee];

/// Options for map export.
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub width: u32,
    pub height: u32,
    pub layer: MapLayer,
    /// Draw river edges on top of the layer.
    pub rivers: bool,
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            layer: MapLayer::Biomes,
            rivers: false,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Byte length of a `width` x `height` RGB buffer, computed in `usize`.
fn rgb_buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(3)
}

/// Renders one layer of the world into an RGB image.
pub fn render_map(world: &World, options: &MapOptions) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>, ExportError> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidSize(width, height));
    }

    let dx = world.width() / width as f64;
    let dy = world.height() / height as f64;
    let len = rgb_buffer_len(width, height).ok_or(ExportError::InvalidSize(width, height))?;
    let mut pixels = vec![0u8; len];
    pixels
        .par_chunks_mut(width as usize * 3)
        .enumerate()
        .for_each(|(j, row)| {
            let y = j as f64 * dy;
            for (i, px) in row.chunks_exact_mut(3).enumerate() {
                let color = world
                    .cell(i as f64 * dx, y)
                    .map_or(Biome::Water.color(), |c| options.layer.cell_color(c));
                px.copy_from_slice(&color);
            }
        });

    let mut img = ImageBuffer::from_raw(width, height, pixels).ok_or(ExportError::InvalidSize(width, height))?;
    if options.rivers {
        draw_rivers(&mut img, world.graph());
    }
    Ok(img)
}

/// Draws every river edge as a one-pixel line.
pub fn draw_rivers(img: &mut ImageBuffer<Rgb<u8>, Vec<u8>>, graph: &WorldGraph) {
    let sx = img.width() as f64 / graph.width;
    let sy = img.height() as f64 / graph.height;
    for edge in graph.edges.iter().filter(|e| e.river) {
        let a = graph.corner(edge.from_corner).position;
        let b = graph.corner(edge.to_corner).position;
        draw_line(img, (a.x * sx, a.y * sy), (b.x * sx, b.y * sy), RIVER_COLOR);
    }
}

fn draw_line(img: &mut ImageBuffer<Rgb<u8>, Vec<u8>>, from: (f64, f64), to: (f64, f64), color: [u8; 3]) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0) as u32;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = (from.0 + (to.0 - from.0) * t).floor();
        let y = (from.1 + (to.1 - from.1) * t).floor();
        if x >= 0.0 && y >= 0.0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

/// Exports one layer of the world as an RGB PNG.
pub fn export_map_png(world: &World, path: &Path, options: &MapOptions) -> Result<(), ExportError> {
    let img = render_map(world, options)?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), img.width(), img.height(), image::ExtendedColorType::Rgb8)?;

    log::debug!("Wrote {} map to {}", options.layer.name(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::WorldConfig;
    use tempfile::tempdir;

    #[test]
    fn test_layer_names() {
        for layer in MapLayer::ALL {
            assert_eq!(layer.name().parse::<MapLayer>().unwrap(), layer);
        }
        assert_eq!("Moisture".parse::<MapLayer>().unwrap(), MapLayer::Moisture);
        assert!(matches!("rain".parse::<MapLayer>(), Err(ExportError::UnknownLayer(_))));
    }

    #[test]
    fn test_mix_and_lighten() {
        assert_eq!(mix([0, 0, 0], [200, 100, 50], 0.5), [100, 50, 25]);
        assert_eq!(mix([10, 20, 30], [0, 0, 0], 0.0), [10, 20, 30]);
        assert_eq!(lighten([100, 100, 100], 0.0), [100, 100, 100]);
        assert!(lighten([100, 100, 100], 1.0)[0] > 100);
        assert!(lighten([100, 100, 100], -1.0)[0] < 100);
    }

    #[test]
    fn test_biome_layer_matches_world_color() {
        let world = World::generate(WorldConfig::small(2)).unwrap();
        let options = MapOptions {
            width: 20,
            height: 10,
            ..Default::default()
        };
        let img = render_map(&world, &options).unwrap();
        for (i, j) in [(0, 0), (7, 3), (19, 9)] {
            let (x, y) = (i as f64 * 20.0, j as f64 * 40.0);
            assert_eq!(img.get_pixel(i, j).0, world.color(x, y));
        }
    }

    #[test]
    fn test_export_all_layers() {
        let world = World::generate(WorldConfig::small(3)).unwrap();
        let dir = tempdir().unwrap();
        for layer in MapLayer::ALL {
            let path = dir.path().join(format!("{}.png", layer.name()));
            let options = MapOptions {
                width: 24,
                height: 24,
                layer,
                rivers: true,
                ..Default::default()
            };
            export_map_png(&world, &path, &options).unwrap();
            let img = image::open(&path).unwrap();
            assert_eq!((img.width(), img.height()), (24, 24));
        }
    }

    #[test]
    fn test_buffer_len_beyond_u32() {
        assert_eq!(rgb_buffer_len(24, 10), Some(720));
        assert_eq!(rgb_buffer_len(0, 10), Some(0));
        // 40000 * 40000 * 3 wraps in u32 arithmetic.
        #[cfg(target_pointer_width = "64")]
        assert_eq!(rgb_buffer_len(40_000, 40_000), Some(4_800_000_000));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(rgb_buffer_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_line_stays_inside_image() {
        let mut img = ImageBuffer::from_pixel(4, 4, Rgb([0u8, 0, 0]));
        draw_line(&mut img, (-2.0, 1.0), (10.0, 1.0), [1, 2, 3]);
        assert!((0..4).all(|x| img.get_pixel(x, 1).0 == [1, 2, 3]));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
