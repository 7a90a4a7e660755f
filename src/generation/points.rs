//! Seeded point sets for demos and tests
//!
//! Both generators are deterministic: the same arguments always produce the
//! same points, on every platform.

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::container::BoundingBox;

/// Generate `count` points uniformly distributed in the box `[min, max]`
///
/// # Arguments
///
/// * `count` - Number of points to generate
/// * `bounds` - Box the points are drawn from
/// * `seed` - Random seed
///
/// # Example
///
/// ```rust
/// use rust_voronoi_cells::generation::random_points_in_box;
/// use rust_voronoi_cells::container::BoundingBox;
/// use glam::DVec3;
///
/// let bounds = BoundingBox::new(DVec3::ZERO, DVec3::splat(10.0));
/// let points = random_points_in_box(500, &bounds, 42);
/// assert_eq!(points.len(), 500);
/// ```
pub fn random_points_in_box(count: usize, bounds: &BoundingBox, seed: u64) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let extent = bounds.extent();

    (0..count)
        .map(|_| {
            let unit = DVec3::new(rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>());
            bounds.min + unit * extent
        })
        .collect()
}

/// Generate a `dims[0] x dims[1] x dims[2]` lattice with random jitter
///
/// Lattice point `(i, j, k)` sits at `spacing * (i, j, k)` and is displaced
/// on each axis by up to `jitter * spacing` in either direction. Points are
/// ordered with `i` varying fastest.
///
/// A `jitter` of zero produces an exact lattice, whose cells share many
/// degenerate vertices; that is a useful stress case for the kernel.
pub fn jittered_lattice(dims: [usize; 3], spacing: f64, jitter: f64, seed: u64) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let amount = jitter.abs() * spacing;
    let mut points = Vec::with_capacity(dims[0] * dims[1] * dims[2]);

    for k in 0..dims[2] {
        for j in 0..dims[1] {
            for i in 0..dims[0] {
                let base = DVec3::new(i as f64, j as f64, k as f64) * spacing;
                let offset = if amount > 0.0 {
                    DVec3::new(
                        rng.gen_range(-amount..=amount),
                        rng.gen_range(-amount..=amount),
                        rng.gen_range(-amount..=amount),
                    )
                } else {
                    DVec3::ZERO
                };
                points.push(base + offset);
            }
        }
    }

    points
}
