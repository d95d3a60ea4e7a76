//! Nearest-site lookup over a uniform bucket grid.

use glam::DVec2;

use crate::graph::CellId;

/// Spatial index over cell sites.
///
/// Sites are binned into roughly two per bucket. A query scans rings of
/// buckets outward from its own until no unscanned bucket can hold a
/// closer site, so the answer is always the exact nearest site.
#[derive(Debug, Clone)]
pub struct SiteIndex {
    sites: Vec<DVec2>,
    buckets: Vec<Vec<u32>>,
    cols: usize,
    rows: usize,
    bucket_size: DVec2,
}

impl SiteIndex {
    pub fn new(width: f64, height: f64, sites: &[DVec2]) -> Self {
        let n = sites.len().max(1) as f64;
        let aspect = (width / height).max(f64::MIN_POSITIVE);
        let cols = ((n * aspect / 2.0).sqrt().ceil() as usize).max(1);
        let rows = ((n / aspect / 2.0).sqrt().ceil() as usize).max(1);
        let bucket_size = DVec2::new(width / cols as f64, height / rows as f64);

        let mut index = Self {
            sites: sites.to_vec(),
            buckets: vec![Vec::new(); cols * rows],
            cols,
            rows,
            bucket_size,
        };
        for (i, site) in sites.iter().enumerate() {
            let (cx, cy) = index.bucket_of(*site);
            index.buckets[cy * cols + cx].push(i as u32);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    fn bucket_of(&self, p: DVec2) -> (usize, usize) {
        let cx = (p.x / self.bucket_size.x).floor().clamp(0.0, (self.cols - 1) as f64) as usize;
        let cy = (p.y / self.bucket_size.y).floor().clamp(0.0, (self.rows - 1) as f64) as usize;
        (cx, cy)
    }

    /// Returns the cell whose site is closest to `p`.
    ///
    /// Ties keep the lower cell index. `None` only for an empty index.
    pub fn nearest(&self, p: DVec2) -> Option<CellId> {
        if self.sites.is_empty() {
            return None;
        }

        let (cx, cy) = self.bucket_of(p);
        let (cx, cy) = (cx as isize, cy as isize);
        let step = self.bucket_size.x.min(self.bucket_size.y);
        let max_ring = self.cols.max(self.rows) as isize;
        let mut best: Option<(u32, f64)> = None;

        for ring in 0..=max_ring {
            for by in (cy - ring)..=(cy + ring) {
                if by < 0 || by >= self.rows as isize {
                    continue;
                }
                for bx in (cx - ring)..=(cx + ring) {
                    if bx < 0 || bx >= self.cols as isize {
                        continue;
                    }
                    // Only the perimeter of the ring is new.
                    if (by - cy).abs() != ring && (bx - cx).abs() != ring {
                        continue;
                    }
                    for &i in &self.buckets[by as usize * self.cols + bx as usize] {
                        let d = self.sites[i as usize].distance_squared(p);
                        let closer = match best {
                            None => true,
                            Some((bi, bd)) => d < bd || (d == bd && i < bi),
                        };
                        if closer {
                            best = Some((i, d));
                        }
                    }
                }
            }

            // Sites beyond this ring are at least `ring * step` away.
            if let Some((_, d)) = best {
                let reach = ring as f64 * step;
                if d <= reach * reach {
                    break;
                }
            }
        }

        best.map(|(i, _)| CellId(i as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn brute_force(sites: &[DVec2], p: DVec2) -> usize {
        let mut best = 0;
        for (i, s) in sites.iter().enumerate() {
            if s.distance_squared(p) < sites[best].distance_squared(p) {
                best = i;
            }
        }
        best
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let sites: Vec<DVec2> = (0..300)
            .map(|_| DVec2::new(rng.random::<f64>() * 800.0, rng.random::<f64>() * 500.0))
            .collect();
        let index = SiteIndex::new(800.0, 500.0, &sites);

        for _ in 0..500 {
            let p = DVec2::new(rng.random::<f64>() * 800.0, rng.random::<f64>() * 500.0);
            let found = index.nearest(p).unwrap().index();
            assert_eq!(
                sites[found].distance_squared(p),
                sites[brute_force(&sites, p)].distance_squared(p)
            );
        }
    }

    #[test]
    fn clustered_sites() {
        // All sites in one corner; queries from the far side must still
        // search far enough.
        let sites: Vec<DVec2> = (0..20)
            .map(|i| DVec2::new(1.0 + i as f64 * 0.1, 2.0))
            .collect();
        let index = SiteIndex::new(1000.0, 1000.0, &sites);
        let p = DVec2::new(999.0, 999.0);
        assert_eq!(index.nearest(p).unwrap().index(), brute_force(&sites, p));
    }

    #[test]
    fn empty_index() {
        let index = SiteIndex::new(10.0, 10.0, &[]);
        assert!(index.is_empty());
        assert_eq!(index.nearest(DVec2::new(1.0, 1.0)), None);
    }
}
