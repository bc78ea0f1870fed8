//! Voronoi Cell Structure
//!
//! Owned snapshot of one site's clipped cell, its Delaunay neighbors and
//! geometry helpers.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single clipped Voronoi cell
///
/// Produced by [`Voronoi::cells`](crate::Voronoi::cells). Each cell carries:
/// - The index of its site in the input
/// - The site position
/// - Neighbor connectivity from the Delaunay mesh
/// - The clipped boundary polygon
///
/// # Neighbors
///
/// Neighbors are Delaunay neighbors of the site. A neighbor whose shared
/// Voronoi edge lies entirely outside the bounds is still listed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the site this cell belongs to
    pub id: usize,

    /// Position of the site
    pub site: DVec2,

    /// Site indices of adjacent cells
    pub neighbors: Vec<usize>,

    /// Boundary polygon, counter-clockwise on screen
    ///
    /// An open ring: the first vertex is not repeated at the end.
    pub vertices: Vec<DVec2>,
}

impl VoronoiCell {
    pub fn new(id: usize, site: DVec2, neighbors: Vec<usize>, vertices: Vec<DVec2>) -> Self {
        Self {
            id,
            site,
            neighbors,
            vertices,
        }
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.contains(&other_cell_id)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Signed shoelace sum over the ring, twice the area
    fn twice_signed_area(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|k| self.vertices[k].perp_dot(self.vertices[(k + 1) % n]))
            .sum()
    }

    /// Area enclosed by the clipped polygon
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        self.twice_signed_area().abs() / 2.0
    }

    /// Area-weighted centroid of the clipped polygon
    ///
    /// Falls back to the vertex mean for degenerate polygons, and to the site
    /// for a cell without vertices.
    pub fn centroid(&self) -> DVec2 {
        let n = self.vertices.len();
        if n == 0 {
            return self.site;
        }
        let twice_area = self.twice_signed_area();
        if n < 3 || twice_area == 0.0 {
            return self.vertices.iter().copied().sum::<DVec2>() / n as f64;
        }
        let weighted: DVec2 = (0..n)
            .map(|k| {
                let (a, b) = (self.vertices[k], self.vertices[(k + 1) % n]);
                (a + b) * a.perp_dot(b)
            })
            .sum();
        weighted / (3.0 * twice_area)
    }

    /// Euclidean distance between the two sites
    #[inline]
    pub fn distance_to(&self, other: &VoronoiCell) -> f64 {
        self.site.distance(other.site)
    }
}
