//! Cell decomposition kernel
//!
//! A generator's cell starts as the whole container and is cut by the
//! perpendicular bisector with each nearby point, nearest ring of grid
//! buckets first. A point further than twice the current cell radius cannot
//! cut the cell, so the ring walk stops as soon as the grid guarantees that
//! everything left is at least that far away.

mod polyhedron;

use crate::cell::{Cell, FaceSource};
use crate::config::DiagramConfig;
use crate::container::Container;
use crate::error::CellFailure;

use polyhedron::Polyhedron;

/// Compute the Voronoi cell of point `id`, clipped to the container.
///
/// # Panics
///
/// Panics if `id` is not a point of the container.
pub fn compute_cell(
    container: &Container,
    id: usize,
    config: &DiagramConfig,
) -> Result<Cell, CellFailure> {
    let grid = container.grid();
    let generator = grid.points()[id].position;
    let bounds = container.bounds();
    let tolerance = config.clip_tolerance * bounds.diagonal();

    let mut cell = Polyhedron::from_box(bounds.min - generator, bounds.max - generator, tolerance);
    // squared distance beyond which a point's bisector misses the cell
    let mut reach = 4.0 * cell.max_radius_squared();
    let mut cuts = 0usize;
    let mut examined = 0usize;

    for shell in grid.rings_around(id) {
        if shell.clearance_squared > reach {
            break;
        }
        for candidate in shell.candidates {
            if candidate.distance_squared > reach {
                break;
            }
            examined += 1;

            let offset = grid.points()[candidate.id].position - generator;
            let distance_squared = offset.length_squared();
            if distance_squared <= tolerance * tolerance {
                return Err(CellFailure::CoincidentGenerator {
                    other: candidate.id,
                });
            }

            if cell.clip(offset, 0.5 * distance_squared, FaceSource::Generator(candidate.id))? {
                cuts += 1;
                reach = 4.0 * cell.max_radius_squared();
            }
        }
    }

    tracing::trace!(
        id,
        examined,
        cuts,
        vertices = cell.vertex_count(),
        faces = cell.face_count(),
        "cell decomposed"
    );

    cell.into_cell(id, generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    fn container(points: &[DVec3], ratio: f64) -> (Container, DiagramConfig) {
        let config = DiagramConfig::with_container_ratio(ratio).unwrap();
        (Container::new(points, &config).unwrap(), config)
    }

    #[test]
    fn test_two_points_split_container() {
        let points = [DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)];
        let (container, config) = container(&points, 2.0);

        let left = compute_cell(&container, 0, &config).unwrap();
        let right = compute_cell(&container, 1, &config).unwrap();

        // container is [-1, 3] x [-2, 2] x [-2, 2], split at x = 1
        assert_relative_eq!(left.volume(), 32.0, epsilon = 1e-9);
        assert_relative_eq!(right.volume(), 32.0, epsilon = 1e-9);
        assert_eq!(left.neighbor_ids(), vec![1]);
        assert_eq!(right.neighbor_ids(), vec![0]);
        assert!(left.vertices().iter().all(|v| v.x <= 1.0 + 1e-9));
        assert!(right.vertices().iter().all(|v| v.x >= 1.0 - 1e-9));
        assert_eq!(left.face_count(), 6);
    }

    #[test]
    fn test_coincident_points_fail() {
        let points = [DVec3::ZERO, DVec3::ZERO, DVec3::new(3.0, 1.0, 2.0)];
        let (container, config) = container(&points, 1.5);

        assert_eq!(
            compute_cell(&container, 0, &config).unwrap_err(),
            CellFailure::CoincidentGenerator { other: 1 }
        );
        assert_eq!(
            compute_cell(&container, 1, &config).unwrap_err(),
            CellFailure::CoincidentGenerator { other: 0 }
        );
        assert!(compute_cell(&container, 2, &config).is_ok());
    }

    #[test]
    fn test_cells_tile_container() {
        let points: Vec<DVec3> = (0..40)
            .map(|i| {
                let t = i as f64;
                DVec3::new((t * 1.37).sin() * 5.0, (t * 0.71).cos() * 4.0, (t * 2.13).sin() * 3.0)
            })
            .collect();
        let (container, config) = container(&points, 1.2);

        let mut total = 0.0;
        for id in 0..points.len() {
            let cell = compute_cell(&container, id, &config).unwrap();
            assert!(cell.check_topology().is_ok());
            total += cell.volume();
        }
        assert_relative_eq!(total, container.bounds().volume(), max_relative = 1e-9);
    }

    #[test]
    fn test_generator_closer_than_any_other_point() {
        let points: Vec<DVec3> = (0..30)
            .map(|i| {
                let t = i as f64;
                DVec3::new((t * 0.9).cos() * 3.0, (t * 1.3).sin() * 3.0, t * 0.2)
            })
            .collect();
        let (container, config) = container(&points, 1.0);

        for id in 0..points.len() {
            let cell = compute_cell(&container, id, &config).unwrap();
            for vertex in cell.vertices() {
                let own = vertex.distance(points[id]);
                for other in &points {
                    assert!(own <= vertex.distance(*other) + 1e-7);
                }
            }
        }
    }
}
