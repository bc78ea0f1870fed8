//! Spatial indexing for fast position-to-site lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for nearest-site queries
///
/// Answers the same question as [`Delaunay::locate`](crate::Delaunay::locate)
/// without needing a starting hint, and includes coincident sites.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex").finish_non_exhaustive()
    }
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from site positions
    ///
    /// # Example
    ///
    /// ```
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// use rust_planar_voronoi::SpatialIndex;
    /// use glam::DVec2;
    ///
    /// let sites = vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(10.0, 0.0),
    ///     DVec2::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(DVec2::new(8.0, 1.0)), 1);
    /// # }
    /// ```
    pub fn new(sites: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = sites.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the site nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let sites = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(0.0, 100.0),
            DVec2::new(100.0, 100.0),
        ];

        let index = SpatialIndex::new(&sites);

        assert_eq!(index.find_nearest(DVec2::new(10.0, 5.0)), 0);
        assert_eq!(index.find_nearest(DVec2::new(90.0, -20.0)), 1);
        assert_eq!(index.find_nearest(DVec2::new(-5.0, 70.0)), 2);
        assert_eq!(index.find_nearest(DVec2::new(60.0, 60.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let sites = vec![DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0)];

        let index = SpatialIndex::new(&sites);

        assert_eq!(index.find_nearest(sites[0]), 0);
        assert_eq!(index.find_nearest(sites[1]), 1);
    }
}
