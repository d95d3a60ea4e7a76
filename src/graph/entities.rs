//! Cell, corner and edge arenas addressed by typed indices.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::biomes::Biome;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

entity_id!(
    /// Index of a [`Cell`] in [`WorldGraph::cells`].
    CellId
);
entity_id!(
    /// Index of a [`Corner`] in [`WorldGraph::corners`].
    CornerId
);
entity_id!(
    /// Index of an [`Edge`] in [`WorldGraph::edges`].
    EdgeId
);

/// One Voronoi region around a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Generating site.
    pub position: DVec2,
    /// Normalized elevation. Base noise value until the elevation step replaces it.
    pub z: f64,
    pub water: bool,
    /// True if any incident edge is a coastline.
    pub coast: bool,
    pub moisture: f64,
    pub temperature: f64,
    /// -1 at the top of the map, +1 at the bottom.
    pub latitude: f64,
    pub distance_from_coast: f64,
    pub distance_from_water: f64,
    pub distance_from_freshwater: f64,
    /// Polygon boundary in tessellation order.
    pub corners: Vec<CornerId>,
    pub edges: Vec<EdgeId>,
    /// Assigned once by the biome stage.
    pub biome: Option<Biome>,
}

impl Cell {
    pub(crate) fn new(position: DVec2) -> Self {
        Self {
            position,
            z: 0.0,
            water: false,
            coast: false,
            moisture: 0.0,
            temperature: 0.0,
            latitude: 0.0,
            distance_from_coast: 0.0,
            distance_from_water: 0.0,
            distance_from_freshwater: 0.0,
            corners: Vec::new(),
            edges: Vec::new(),
            biome: None,
        }
    }

    /// Returns the biome, or [`Biome::Water`] if classification has not run.
    pub fn biome_or_water(&self) -> Biome {
        self.biome.unwrap_or(Biome::Water)
    }
}

/// A tessellation vertex shared by neighbouring cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corner {
    pub position: DVec2,
    pub z: f64,
    pub coast: bool,
    pub distance_from_coast: f64,
    pub distance_from_water: f64,
    pub distance_from_freshwater: f64,
    pub edges: Vec<EdgeId>,
    pub cells: Vec<CellId>,
}

impl Corner {
    pub(crate) fn new(position: DVec2) -> Self {
        Self {
            position,
            z: 0.0,
            coast: false,
            distance_from_coast: 0.0,
            distance_from_water: 0.0,
            distance_from_freshwater: 0.0,
            edges: Vec::new(),
            cells: Vec::new(),
        }
    }
}

/// A polygon side between two corners.
///
/// Boundary edges lie on the outer rectangle and have no `to_cell`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from_corner: CornerId,
    pub to_corner: CornerId,
    pub from_cell: CellId,
    pub to_cell: Option<CellId>,
    /// Euclidean distance between the two corners.
    pub length: f64,
    pub coast: bool,
    pub river: bool,
    /// Lower endpoint; set by the hydrology stage.
    pub downslope: Option<CornerId>,
}

impl Edge {
    /// Returns the endpoint that is not `corner`.
    #[inline]
    pub fn other_corner(&self, corner: CornerId) -> CornerId {
        if self.from_corner == corner {
            self.to_corner
        } else {
            self.from_corner
        }
    }

    /// Returns the cell on the other side of this edge from `cell`, if any.
    #[inline]
    pub fn other_cell(&self, cell: CellId) -> Option<CellId> {
        if self.from_cell == cell {
            self.to_cell
        } else {
            Some(self.from_cell)
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.to_cell.is_none()
    }
}

/// The complete planar graph plus the rectangle it was built in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGraph {
    pub width: f64,
    pub height: f64,
    pub cells: Vec<Cell>,
    pub corners: Vec<Corner>,
    pub edges: Vec<Edge>,
}

impl WorldGraph {
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn corner(&self, id: CornerId) -> &Corner {
        &self.corners[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len()).map(CellId)
    }

    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId> {
        (0..self.corners.len()).map(CornerId)
    }

    /// True if `(x, y)` lies inside the closed bounding rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Cells sharing an edge with `cell`.
    pub fn cell_neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.cells[cell.index()]
            .edges
            .iter()
            .filter_map(move |&e| self.edges[e.index()].other_cell(cell))
    }

    /// True if the cell touches the outer rectangle.
    pub fn is_bounding_cell(&self, cell: CellId) -> bool {
        self.cells[cell.index()]
            .edges
            .iter()
            .any(|&e| self.edges[e.index()].is_boundary())
    }

    /// Coastal, or touching any water cell.
    pub fn is_sea_corner(&self, corner: CornerId) -> bool {
        let c = &self.corners[corner.index()];
        c.coast || c.cells.iter().any(|&cell| self.cells[cell.index()].water)
    }

    /// Sea, or on a river.
    pub fn is_water_corner(&self, corner: CornerId) -> bool {
        self.is_sea_corner(corner) || self.is_freshwater_corner(corner)
    }

    /// Incident to at least one river edge.
    pub fn is_freshwater_corner(&self, corner: CornerId) -> bool {
        self.corners[corner.index()]
            .edges
            .iter()
            .any(|&e| self.edges[e.index()].river)
    }

    pub fn river_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.river).count()
    }

    pub fn water_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.water).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: usize, to: usize, from_cell: usize, to_cell: Option<usize>) -> Edge {
        Edge {
            from_corner: CornerId(from),
            to_corner: CornerId(to),
            from_cell: CellId(from_cell),
            to_cell: to_cell.map(CellId),
            length: 1.0,
            coast: false,
            river: false,
            downslope: None,
        }
    }

    #[test]
    fn test_other_corner() {
        let e = edge(3, 7, 0, Some(1));
        assert_eq!(e.other_corner(CornerId(3)), CornerId(7));
        assert_eq!(e.other_corner(CornerId(7)), CornerId(3));
    }

    #[test]
    fn test_other_cell_on_boundary() {
        let e = edge(0, 1, 4, None);
        assert!(e.is_boundary());
        assert_eq!(e.other_cell(CellId(4)), None);

        let inner = edge(0, 1, 4, Some(5));
        assert_eq!(inner.other_cell(CellId(4)), Some(CellId(5)));
        assert_eq!(inner.other_cell(CellId(5)), Some(CellId(4)));
    }

    #[test]
    fn test_biome_or_water_defaults() {
        let cell = Cell::new(DVec2::ZERO);
        assert_eq!(cell.biome_or_water(), Biome::Water);
    }
}
