//! Vector primitive
//!
//! Coordinates are carried as [`glam::DVec3`]. The free functions here are the
//! operations the clipper, the face measures and the text output lean on;
//! they hold no state and never allocate except [`format_coordinates`].
//! [`angle_between`] is not used internally; it is there for callers comparing
//! face normals, e.g. from [`Cell::face_normals`](crate::cell::Cell::face_normals).

use glam::DVec3;
use std::fmt::Write;

/// 3-component `f64` vector used for every coordinate in the crate
pub type Vector3 = DVec3;

/// `a - b`
#[inline]
pub fn subtract(a: Vector3, b: Vector3) -> Vector3 {
    a - b
}

/// Right-handed cross product `a × b`
#[inline]
pub fn cross(a: Vector3, b: Vector3) -> Vector3 {
    a.cross(b)
}

/// Component-wise dot product
#[inline]
pub fn dot(a: Vector3, b: Vector3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Euclidean length
#[inline]
pub fn magnitude(v: Vector3) -> f64 {
    dot(v, v).sqrt()
}

/// Angle between two vectors in radians.
///
/// Returns `NaN` when either vector has zero length; callers must guard.
/// The cosine is clamped so rounding on parallel vectors cannot leave the
/// domain of `acos`.
pub fn angle_between(a: Vector3, b: Vector3) -> f64 {
    let cos = dot(a, b) / (magnitude(a) * magnitude(b));
    cos.clamp(-1.0, 1.0).acos()
}

/// Append `"x y z"` with `precision` fractional digits to `out`
pub fn write_coordinates(out: &mut String, v: Vector3, precision: usize) {
    // Writing into a String cannot fail
    let _ = write!(
        out,
        "{:.*} {:.*} {:.*}",
        precision, v.x, precision, v.y, precision, v.z
    );
}

/// Render `"x y z"` with `precision` fractional digits
pub fn format_coordinates(v: Vector3, precision: usize) -> String {
    let mut out = String::new();
    write_coordinates(&mut out, v, precision);
    out
}
