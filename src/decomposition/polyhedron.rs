//! Convex polyhedron under half-space clipping
//!
//! While a cell is being cut it is kept as a list of face rings with
//! coordinates relative to the generator. Each cut classifies vertices against
//! the plane, trims every face ring, splits edges that cross the plane, and
//! closes the hole with one new face along the edges left without a twin.

use glam::DVec3;
use std::collections::{HashMap, HashSet};

use crate::cell::{Cell, FaceLoop, FaceSource, Wall};
use crate::error::CellFailure;
use crate::vector::{dot, magnitude};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Inside,
    On,
    Outside,
}

/// Closed convex polyhedron being refined by successive cuts
#[derive(Debug, Clone)]
pub(crate) struct Polyhedron {
    vertices: Vec<DVec3>,
    faces: Vec<FaceLoop>,
    /// Distance within which a vertex counts as lying on a cutting plane
    tolerance: f64,
}

impl Polyhedron {
    /// Axis-aligned box between `min` and `max`
    pub(crate) fn from_box(min: DVec3, max: DVec3, tolerance: f64) -> Self {
        // corner i takes max on axis a when bit a of i is set
        let vertices = (0..8)
            .map(|i| {
                DVec3::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                )
            })
            .collect();
        let faces = [
            ([0, 4, 6, 2], Wall::XMin),
            ([1, 3, 7, 5], Wall::XMax),
            ([0, 1, 5, 4], Wall::YMin),
            ([2, 6, 7, 3], Wall::YMax),
            ([0, 2, 3, 1], Wall::ZMin),
            ([4, 5, 7, 6], Wall::ZMax),
        ]
        .into_iter()
        .map(|(ring, wall)| FaceLoop {
            ring: ring.to_vec(),
            source: FaceSource::Wall(wall),
        })
        .collect();

        Self {
            vertices,
            faces,
            tolerance,
        }
    }

    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.faces.iter().map(|f| f.ring.len()).sum::<usize>() / 2
    }

    pub(crate) fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Largest squared distance from the origin (the generator) to a vertex
    pub(crate) fn max_radius_squared(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.length_squared())
            .fold(0.0, f64::max)
    }

    /// Keep the part of the polyhedron where `normal · x <= offset`.
    ///
    /// Returns `Ok(false)` when the plane misses the polyhedron and nothing
    /// changed.
    pub(crate) fn clip(
        &mut self,
        normal: DVec3,
        offset: f64,
        source: FaceSource,
    ) -> Result<bool, CellFailure> {
        let eps = self.tolerance * magnitude(normal);
        let distances: Vec<f64> = self
            .vertices
            .iter()
            .map(|&v| dot(normal, v) - offset)
            .collect();
        let sides: Vec<Side> = distances
            .iter()
            .map(|&d| {
                if d > eps {
                    Side::Outside
                } else if d < -eps {
                    Side::Inside
                } else {
                    Side::On
                }
            })
            .collect();

        if !sides.contains(&Side::Outside) {
            return Ok(false);
        }
        if !sides.contains(&Side::Inside) {
            return Err(CellFailure::ClippedAway);
        }

        let mut splits: HashMap<(usize, usize), usize> = HashMap::new();
        let mut faces = Vec::with_capacity(self.faces.len() + 1);

        for face in &self.faces {
            let k = face.ring.len();
            let mut ring = Vec::with_capacity(k + 1);
            for i in 0..k {
                let a = face.ring[i];
                let b = face.ring[(i + 1) % k];
                if sides[a] != Side::Outside {
                    ring.push(a);
                }
                let crosses = matches!(
                    (sides[a], sides[b]),
                    (Side::Inside, Side::Outside) | (Side::Outside, Side::Inside)
                );
                if crosses {
                    let key = (a.min(b), a.max(b));
                    let split = match splits.get(&key) {
                        Some(&split) => split,
                        None => {
                            let (lo, hi) = key;
                            let t = distances[lo] / (distances[lo] - distances[hi]);
                            let split = self.vertices.len();
                            self.vertices.push(self.vertices[lo].lerp(self.vertices[hi], t));
                            splits.insert(key, split);
                            split
                        }
                    };
                    ring.push(split);
                }
            }

            if ring.len() < 3 {
                continue;
            }
            faces.push(FaceLoop {
                ring,
                source: face.source,
            });
        }

        // The hole left by the removed part is bounded by the directed edges
        // of kept faces whose reverse no kept face carries. An on-plane edge
        // shared by two kept faces is interior and stays out of the cut face.
        let kept: HashSet<(usize, usize)> = faces.iter().flat_map(ring_edges).collect();
        // cut face edges, keyed by their start vertex
        let mut cut: HashMap<usize, usize> = HashMap::new();
        let mut cut_start = None;
        for (a, b) in faces.iter().flat_map(ring_edges) {
            if kept.contains(&(b, a)) {
                continue;
            }
            // the cut face runs the open edge backwards
            if cut.insert(b, a).is_some() {
                return Err(CellFailure::DegenerateCut);
            }
            cut_start.get_or_insert(b);
        }

        let start = cut_start.ok_or(CellFailure::DegenerateCut)?;
        let mut ring = Vec::with_capacity(cut.len());
        let mut current = start;
        loop {
            ring.push(current);
            current = *cut.get(&current).ok_or(CellFailure::DegenerateCut)?;
            if current == start {
                break;
            }
            if ring.len() > cut.len() {
                return Err(CellFailure::DegenerateCut);
            }
        }
        if ring.len() != cut.len() || ring.len() < 3 {
            return Err(CellFailure::DegenerateCut);
        }
        faces.push(FaceLoop { ring, source });

        self.faces = faces;
        self.drop_unused_vertices();

        let characteristic = self.euler_characteristic();
        if characteristic != 2 {
            return Err(CellFailure::EulerViolation { characteristic });
        }
        Ok(true)
    }

    /// Translate back to absolute coordinates and build the topology tables
    pub(crate) fn into_cell(self, id: usize, generator: DVec3) -> Result<Cell, CellFailure> {
        let vertices = self.vertices.iter().map(|&v| v + generator).collect();
        Cell::from_faces(id, generator, vertices, &self.faces)
    }

    /// Renumber vertices in order of first use by a face, discarding the rest
    fn drop_unused_vertices(&mut self) {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for face in &mut self.faces {
            for v in &mut face.ring {
                if remap[*v] == usize::MAX {
                    remap[*v] = kept.len();
                    kept.push(self.vertices[*v]);
                }
                *v = remap[*v];
            }
        }
        self.vertices = kept;
    }
}

/// Directed edges of a face ring, in ring order
fn ring_edges(face: &FaceLoop) -> impl Iterator<Item = (usize, usize)> + '_ {
    let n = face.ring.len();
    (0..n).map(move |i| (face.ring[i], face.ring[(i + 1) % n]))
}
