//! Point queries against a finished graph.
//!
//! Query coordinates are warped by low-amplitude noise before point
//! location so cell borders read as ragged rather than straight. Elevation
//! is interpolated across a fan triangulation of the owning cell and gets
//! inland detail noise on top.

mod config;
mod locate;

pub use config::SamplerConfig;
pub use locate::SiteIndex;

use glam::DVec2;

use crate::biomes::Biome;
use crate::graph::{CellId, WorldGraph};
use crate::noise::{sample_octaves, NoiseSource};

/// Elevation and color lookups for arbitrary coordinates.
#[derive(Debug, Clone)]
pub struct Sampler {
    noise: NoiseSource,
    config: SamplerConfig,
    index: SiteIndex,
    width: f64,
    height: f64,
}

/// Corner values interpolated inside a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Interpolated {
    z: f64,
    distance_from_water: f64,
}

impl Sampler {
    /// Indexes the sites of `graph`.
    ///
    /// The sampler must only be used with the graph it was built from.
    pub fn new(graph: &WorldGraph, noise: NoiseSource, config: SamplerConfig) -> Self {
        let sites: Vec<DVec2> = graph.cells.iter().map(|c| c.position).collect();
        Self {
            noise,
            index: SiteIndex::new(graph.width, graph.height, &sites),
            config,
            width: graph.width,
            height: graph.height,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    fn in_bounds(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Warps `(x, y)` by the shared noise offset and clamps into the map.
    pub fn perturb(&self, x: f64, y: f64) -> DVec2 {
        let d = self.noise.sample(
            x / self.width * self.config.warp_frequency_x,
            y / self.height * self.config.warp_frequency_y,
        ) * self.config.warp_amplitude;
        DVec2::new((x + d).clamp(0.0, self.width), (y + d).clamp(0.0, self.height))
    }

    /// Cell with the site nearest to `(x, y)`, without warping.
    pub fn nearest_cell(&self, x: f64, y: f64) -> Option<CellId> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.index.nearest(DVec2::new(x, y))
    }

    /// Cell owning the warped point. `None` outside the map.
    pub fn locate(&self, x: f64, y: f64) -> Option<CellId> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.index.nearest(self.perturb(x, y))
    }

    /// Terrain height at `(x, y)`; 0 outside the map.
    ///
    /// Interpolated corner elevation scaled by `elevation_scale`, plus detail
    /// noise weighted by the interpolated distance from water. Falls back to
    /// the cell's own elevation when no triangle contains the point.
    pub fn elevation(&self, graph: &WorldGraph, x: f64, y: f64) -> f64 {
        if !self.in_bounds(x, y) {
            return 0.0;
        }
        let p = self.perturb(x, y);
        let Some(cell_id) = self.index.nearest(p) else {
            return 0.0;
        };

        match self.interpolate(graph, cell_id, p) {
            Some(v) => {
                let detail = sample_octaves(&self.noise, p.x, p.y, &self.config.detail_octaves);
                self.config.elevation_scale * v.z + detail * v.distance_from_water
            }
            None => graph.cell(cell_id).z,
        }
    }

    /// Biome color at `(x, y)`; water outside the map.
    pub fn color(&self, graph: &WorldGraph, x: f64, y: f64) -> [u8; 3] {
        self.locate(x, y)
            .map_or(Biome::Water, |id| graph.cell(id).biome_or_water())
            .color()
    }

    fn interpolate(&self, graph: &WorldGraph, cell_id: CellId, p: DVec2) -> Option<Interpolated> {
        let cell = graph.cell(cell_id);
        let mut ring: Vec<(f64, DVec2, Interpolated)> = cell
            .corners
            .iter()
            .map(|&c| {
                let corner = graph.corner(c);
                let offset = corner.position - cell.position;
                (
                    offset.y.atan2(offset.x),
                    corner.position,
                    Interpolated {
                        z: corner.z,
                        distance_from_water: corner.distance_from_water,
                    },
                )
            })
            .collect();
        if ring.len() < 3 {
            return None;
        }
        ring.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (_, a, va) = ring[0];
        ring.windows(2).skip(1).find_map(|pair| {
            let (_, b, vb) = pair[0];
            let (_, c, vc) = pair[1];
            let [wa, wb, wc] = barycentric(p, a, b, c)?;
            let tol = -self.config.barycentric_tolerance;
            (wa >= tol && wb >= tol && wc >= tol).then(|| Interpolated {
                z: wa * va.z + wb * vb.z + wc * vc.z,
                distance_from_water: wa * va.distance_from_water
                    + wb * vb.distance_from_water
                    + wc * vc.distance_from_water,
            })
        })
    }
}

/// Barycentric weights of `p` in triangle `abc`. `None` for a degenerate
/// triangle.
fn barycentric(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> Option<[f64; 3]> {
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < f64::EPSILON {
        return None;
    }
    let wa = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / det;
    let wb = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / det;
    Some([wa, wb, 1.0 - wa - wb])
}
