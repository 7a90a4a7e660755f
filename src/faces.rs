//! Face extraction by directed-edge marking
//!
//! A cell stores no explicit face list, only its neighbor table. Every
//! undirected edge shows up twice in that table, once per direction, and each
//! direction borders exactly one face. Walking from an unvisited directed edge
//! and repeatedly taking the slot after the one we arrived through traces that
//! face; marking each directed edge as it is taken guarantees no face is
//! traced twice.
//!
//! Marks live in [`EdgeMarks`], a boolean table shaped like the neighbor table,
//! so the cell itself is never modified.

use glam::DVec3;

use crate::cell::{Cell, FaceSource};
use crate::vector::{cross, magnitude, subtract};

/// One face of a cell as a closed vertex ring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Plane the face lies on
    pub source: FaceSource,
    /// Local vertex indices, counter-clockwise seen from outside.
    /// The first vertex is not repeated at the end.
    pub ring: Vec<usize>,
}

impl Face {
    /// Number of vertices in the ring
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// True for an empty ring
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Fan triangulation anchored at the first vertex of the ring
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let apex = self.ring.first().copied().unwrap_or(0);
        self.ring
            .windows(2)
            .skip(1)
            .map(move |pair| [apex, pair[0], pair[1]])
    }

    /// Unit outward normal (zero for a degenerate face)
    pub fn normal(&self, cell: &Cell) -> DVec3 {
        self.area_vector(cell).normalize_or_zero()
    }

    /// Planar area
    pub fn area(&self, cell: &Cell) -> f64 {
        magnitude(self.area_vector(cell))
    }

    /// Outward normal scaled by the face area
    fn area_vector(&self, cell: &Cell) -> DVec3 {
        let v = cell.vertices();
        self.triangles()
            .map(|[a, b, c]| cross(subtract(v[b], v[a]), subtract(v[c], v[a])))
            .sum::<DVec3>()
            * 0.5
    }
}

/// Visited flags for every directed edge `(vertex, slot)` of a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMarks {
    marks: Vec<Vec<bool>>,
}

impl EdgeMarks {
    /// All edges unvisited
    pub fn new(cell: &Cell) -> Self {
        Self {
            marks: (0..cell.vertex_count())
                .map(|v| vec![false; cell.order(v)])
                .collect(),
        }
    }

    /// Mark `(vertex, slot)` and report whether it was already marked
    #[inline]
    pub fn mark(&mut self, vertex: usize, slot: usize) -> bool {
        std::mem::replace(&mut self.marks[vertex][slot], true)
    }

    /// Whether `(vertex, slot)` has been visited
    #[inline]
    pub fn is_marked(&self, vertex: usize, slot: usize) -> bool {
        self.marks[vertex][slot]
    }

    /// Number of visited directed edges
    pub fn marked_count(&self) -> usize {
        self.marks.iter().flatten().filter(|&&m| m).count()
    }

    /// True once every directed edge has been visited
    pub fn is_complete(&self) -> bool {
        self.marks.iter().flatten().all(|&m| m)
    }
}

/// Recover every face of `cell` exactly once
pub fn extract_faces(cell: &Cell) -> Vec<Face> {
    extract_faces_with_marks(cell).0
}

/// Recover every face of `cell`, also returning the directed-edge marks
///
/// Walks start from vertex 1 upward. Every face has at least three vertices,
/// so each one owns a directed edge leaving some vertex other than 0 and is
/// still reached; edges out of vertex 0 get marked along the way.
pub fn extract_faces_with_marks(cell: &Cell) -> (Vec<Face>, EdgeMarks) {
    let mut marks = EdgeMarks::new(cell);
    let mut faces = Vec::new();

    for start in 1..cell.vertex_count() {
        for slot in 0..cell.order(start) {
            if marks.is_marked(start, slot) {
                continue;
            }
            faces.push(walk_face(cell, &mut marks, start, slot));
        }
    }

    (faces, marks)
}

/// Trace the face to the left of `start -> neighbors(start)[slot]`
fn walk_face(cell: &Cell, marks: &mut EdgeMarks, start: usize, slot: usize) -> Face {
    let source = cell.face_source(start, slot);
    let mut ring = vec![start];
    marks.mark(start, slot);

    let mut here = cell.neighbors(start)[slot];
    let mut here_slot = cell.next_slot(here, cell.reciprocal(start)[slot]);
    loop {
        ring.push(here);
        let seen = marks.mark(here, here_slot);
        debug_assert!(!seen, "directed edge ({}, {}) walked twice", here, here_slot);

        let next = cell.neighbors(here)[here_slot];
        if next == start {
            break;
        }
        let back = cell.reciprocal(here)[here_slot];
        here_slot = cell.next_slot(next, back);
        here = next;
    }

    Face { source, ring }
}
