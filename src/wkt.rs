//! Polyhedral surface text output
//!
//! Each face is written as a fan of closed triangle rings, so a cell becomes
//!
//! ```text
//! POLYHEDRALSURFACE(((x0 y0 z0, x1 y1 z1, x2 y2 z2, x0 y0 z0)), ((...)), ...)
//! ```
//!
//! with every ring repeating its first coordinate to close it.

use crate::cell::Cell;
use crate::faces::Face;
use crate::vector::write_coordinates;

/// Leading keyword of every surface
pub const SURFACE_TAG: &str = "POLYHEDRALSURFACE";

/// Serialize a cell as a polyhedral surface of triangles
pub fn polyhedral_surface(cell: &Cell, precision: usize) -> String {
    polyhedral_surface_from_faces(cell, cell.faces(), precision)
}

/// Serialize already extracted faces of `cell`
pub fn polyhedral_surface_from_faces(cell: &Cell, faces: &[Face], precision: usize) -> String {
    // every vertex is printed several times; format each once
    let coords: Vec<String> = cell
        .vertices()
        .iter()
        .map(|&v| {
            let mut s = String::new();
            write_coordinates(&mut s, v, precision);
            s
        })
        .collect();

    let ring_len = 4 * (coords.first().map_or(0, String::len) + 2) + 4;
    let triangles: usize = faces.iter().map(|f| f.len().saturating_sub(2)).sum();
    let mut out = String::with_capacity(SURFACE_TAG.len() + 2 + triangles * ring_len);
    out.push_str(SURFACE_TAG);
    out.push('(');
    let mut first = true;
    for face in faces {
        for [a, b, c] in face.triangles() {
            if !first {
                out.push_str(", ");
            }
            first = false;
            out.push_str("((");
            for (i, v) in [a, b, c, a].into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&coords[v]);
            }
            out.push_str("))");
        }
    }
    out.push(')');
    out
}

/// Split a surface into its rings, each a list of `[x, y, z]` coordinates.
///
/// Returns `None` if the text is not a polyhedral surface in the layout
/// written by [`polyhedral_surface`].
pub fn parse_rings(text: &str) -> Option<Vec<Vec<[f64; 3]>>> {
    let body = text
        .strip_prefix(SURFACE_TAG)?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    if body.is_empty() {
        return Some(Vec::new());
    }
    body.split("), (")
        .map(|ring| {
            let ring = ring.trim_start_matches('(').trim_end_matches(')');
            ring.split(", ")
                .map(|coord| {
                    let mut parts = coord.split(' ').map(str::parse::<f64>);
                    let x = parts.next()?.ok()?;
                    let y = parts.next()?.ok()?;
                    let z = parts.next()?.ok()?;
                    if parts.next().is_some() {
                        return None;
                    }
                    Some([x, y, z])
                })
                .collect()
        })
        .collect()
}
