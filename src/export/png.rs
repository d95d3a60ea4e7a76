//! PNG export of sampled heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use rayon::prelude::*;

use super::ExportError;
use crate::terrain::World;

/// Options for heightmap export.
#[derive(Debug, Clone)]
pub struct HeightmapOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Height range mapped onto 0..=65535. `None` uses the sampled range.
    pub range: Option<(f64, f64)>,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for HeightmapOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            range: None,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl HeightmapOptions {
    /// Same pixel size as the world's map units.
    pub fn for_world(world: &World) -> Self {
        Self {
            width: world.width().round().max(1.0) as u32,
            height: world.height().round().max(1.0) as u32,
            ..Default::default()
        }
    }
}

/// Samples [`World::elevation`] on a `width x height` grid covering the map.
///
/// Row-major, one value per pixel. Rows are sampled in parallel.
pub fn sample_heightmap(world: &World, width: u32, height: u32) -> Vec<f64> {
    let dx = world.width() / width.max(1) as f64;
    let dy = world.height() / height.max(1) as f64;
    (0..height)
        .into_par_iter()
        .flat_map_iter(|j| {
            let y = j as f64 * dy;
            (0..width).map(move |i| world.elevation(i as f64 * dx, y))
        })
        .collect()
}

/// Smallest and largest finite value, or `None` for an empty slice.
fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Exports a world as a 16-bit grayscale PNG heightmap.
///
/// # Returns
/// The height range that was mapped onto the full 16-bit scale.
pub fn export_heightmap_png(
    world: &World,
    path: &Path,
    options: &HeightmapOptions,
) -> Result<(f64, f64), ExportError> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidSize(width, height));
    }

    let samples = sample_heightmap(world, width, height);
    let (min, max) = match options.range {
        Some(range) => range,
        None => finite_range(&samples).unwrap_or((0.0, 0.0)),
    };
    // A flat world still exports, as mid-grey.
    let (min, max) = if options.range.is_none() && min >= max {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    };
    if !(min < max) {
        return Err(ExportError::InvalidHeightRange(min, max));
    }

    let range = max - min;
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(width, height, |x, y| {
        let h = samples[y as usize * width as usize + x as usize];
        let normalized = ((h - min) / range).clamp(0.0, 1.0);
        Luma([(normalized * 65535.0) as u16])
    });

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    log::debug!("Wrote {}x{} heightmap to {}", width, height, path.display());
    Ok((min, max))
}
