//! Position-to-cell lookup
//!
//! This module is only available with the `spatial-index` feature.
//!
//! A point belongs to the cell of its nearest generator, so locating the cell
//! that contains a position is a nearest-neighbor query over the generators.

use glam::DVec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over generator positions
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 3, 32>,
}

impl SpatialIndex {
    /// Build the index from generator positions, in input order
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_cells::SpatialIndex;
    /// use glam::DVec3;
    ///
    /// let generators = vec![
    ///     DVec3::new(1.0, 0.0, 0.0),
    ///     DVec3::new(0.0, 1.0, 0.0),
    ///     DVec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&generators);
    /// assert_eq!(index.find_nearest(DVec3::new(1.0, 0.1, 0.0)), 0);
    /// ```
    pub fn new(generators: &[DVec3]) -> Self {
        let entries: Vec<[f64; 3]> = generators.iter().map(|g| g.to_array()).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&entries),
        }
    }

    /// Identity of the generator nearest to `position`
    pub fn find_nearest(&self, position: DVec3) -> usize {
        self.nearest_with_distance(position).0
    }

    /// Identity of the nearest generator and its squared distance
    pub fn nearest_with_distance(&self, position: DVec3) -> (usize, f64) {
        let found = self.tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        (found.item, found.distance)
    }
}
