//! Point set generation
//!
//! Seeded generators for the point clouds used by the demos and tests.

mod points;

pub use points::{jittered_lattice, random_points_in_box};
