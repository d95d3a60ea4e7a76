//! Planar Voronoi tessellation clipped to the map rectangle.

use glam::DVec2;
use voronoice::{BoundingBox, Point, VoronoiBuilder};

use super::GraphError;

/// Computes the clipped Voronoi polygon of every site.
///
/// Polygons are returned in site order and are not closed (the first vertex
/// is not repeated at the end).
///
/// # Arguments
/// * `width`, `height` - Rectangle `[0, width] x [0, height]`
/// * `sites` - Generating points, all inside the rectangle
pub fn tessellate(width: f64, height: f64, sites: &[DVec2]) -> Result<Vec<Vec<DVec2>>, GraphError> {
    let points: Vec<Point> = sites.iter().map(|s| Point { x: s.x, y: s.y }).collect();

    let voronoi = VoronoiBuilder::default()
        .set_sites(points)
        .set_bounding_box(BoundingBox::new(
            Point {
                x: width / 2.0,
                y: height / 2.0,
            },
            width,
            height,
        ))
        .build()
        .ok_or(GraphError::Tessellation(sites.len()))?;

    if voronoi.sites().len() != sites.len() {
        return Err(GraphError::Tessellation(sites.len()));
    }

    Ok((0..sites.len())
        .map(|i| {
            voronoi
                .cell(i)
                .iter_vertices()
                .map(|p| DVec2::new(p.x, p.y))
                .collect()
        })
        .collect())
}

/// Area-weighted centroid of a simple polygon.
///
/// Falls back to the vertex average for degenerate (zero-area) polygons.
pub fn polygon_centroid(polygon: &[DVec2]) -> Option<DVec2> {
    if polygon.is_empty() {
        return None;
    }

    let mut area2 = 0.0;
    let mut acc = DVec2::ZERO;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let cross = a.perp_dot(b);
        area2 += cross;
        acc += (a + b) * cross;
    }

    if area2.abs() < 1e-12 {
        let sum: DVec2 = polygon.iter().copied().sum();
        return Some(sum / polygon.len() as f64);
    }

    Some(acc / (3.0 * area2))
}

/// Moves each site toward its polygon centroid by `omega`.
///
/// `omega = 1` is classic Lloyd's relaxation; smaller values damp the step.
/// Sites whose polygon is empty stay where they are.
pub fn lloyd_relaxation(sites: &mut [DVec2], polygons: &[Vec<DVec2>], omega: f64) {
    for (site, polygon) in sites.iter_mut().zip(polygons) {
        if let Some(centroid) = polygon_centroid(polygon) {
            *site += (centroid - *site) * omega;
        }
    }
}
