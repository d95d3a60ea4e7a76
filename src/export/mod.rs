//! Export module for saving rendered maps to PNG files.
//!
//! Colored layer maps go out as 8-bit RGB, sampled heightmaps as 16-bit
//! grayscale.

mod map;
mod png;

use thiserror::Error;

pub use map::{draw_rivers, export_map_png, render_map, MapLayer, MapOptions, RIVER_COLOR};
pub use png::{export_heightmap_png, sample_heightmap, HeightmapOptions};

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f64, f64),
    #[error("Invalid image size: {0} x {1}")]
    InvalidSize(u32, u32),
    #[error("Unknown map layer: {0}")]
    UnknownLayer(String),
}
