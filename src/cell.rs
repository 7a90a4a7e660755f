//! Voronoi Cell Structure
//!
//! A computed cell is a convex polyhedron stored the way the face walk wants
//! it: a vertex list plus, for every vertex, its neighbors in clockwise order
//! seen from outside the cell. Two parallel tables ride along:
//!
//! - `reciprocal[v][j]` is the slot at which `v` appears in the neighbor list
//!   of `neighbors[v][j]`.
//! - `face_sources[v][j]` names the plane that produced the face lying to the
//!   left of the directed edge `v -> neighbors[v][j]`.
//!
//! With that ordering, arriving at `w` from `v` and stepping one slot past `v`
//! in `w`'s list gives the next vertex of the same face, traversed
//! counter-clockwise from outside.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CellFailure;
use crate::faces::{extract_faces, Face};
use crate::vector::{cross, dot, subtract};

/// One of the six container walls
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wall {
    /// `x = min.x`
    XMin,
    /// `x = max.x`
    XMax,
    /// `y = min.y`
    YMin,
    /// `y = max.y`
    YMax,
    /// `z = min.z`
    ZMin,
    /// `z = max.z`
    ZMax,
}

/// The plane a cell face lies on
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceSource {
    /// Perpendicular bisector with another generator
    Generator(usize),
    /// A container wall
    Wall(Wall),
}

/// A face given as a vertex ring, counter-clockwise seen from outside
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLoop {
    /// Local vertex indices
    pub ring: Vec<usize>,
    /// Plane that produced the face
    pub source: FaceSource,
}

/// A single computed Voronoi cell
#[derive(Debug, Clone)]
pub struct Cell {
    id: usize,
    generator: DVec3,
    vertices: Vec<DVec3>,
    neighbors: Vec<Vec<usize>>,
    reciprocal: Vec<Vec<usize>>,
    face_sources: Vec<Vec<FaceSource>>,
    /// Faces recovered from the tables once, at construction
    faces: Vec<Face>,
}

impl Cell {
    /// Build the topology tables of a closed convex polyhedron from its faces.
    ///
    /// `vertices` are absolute coordinates; every face ring must be
    /// counter-clockwise seen from outside and every vertex must be used.
    ///
    /// # Errors
    ///
    /// Fails when a vertex is not surrounded by a single fan of faces, when an
    /// edge has no reverse, or when the result breaks `V - E + F = 2`.
    pub fn from_faces(
        id: usize,
        generator: DVec3,
        vertices: Vec<DVec3>,
        faces: &[FaceLoop],
    ) -> Result<Self, CellFailure> {
        let count = vertices.len();

        // (previous, next, source) for every corner of every face, keyed by vertex
        let mut corners: Vec<Vec<(usize, usize, FaceSource)>> = vec![Vec::new(); count];
        for face in faces {
            let k = face.ring.len();
            if k < 3 {
                return Err(CellFailure::DegenerateCut);
            }
            for i in 0..k {
                let prev = face.ring[(i + k - 1) % k];
                let here = face.ring[i];
                let next = face.ring[(i + 1) % k];
                if here >= count || prev >= count || next >= count {
                    return Err(CellFailure::NonManifold { vertex: here });
                }
                corners[here].push((prev, next, face.source));
            }
        }

        let mut neighbors = Vec::with_capacity(count);
        let mut face_sources = Vec::with_capacity(count);
        for (vertex, fan) in corners.iter().enumerate() {
            let (order, sources) = order_fan(vertex, fan)?;
            neighbors.push(order);
            face_sources.push(sources);
        }

        let reciprocal = build_reciprocal(&neighbors)?;

        let mut cell = Self {
            id,
            generator,
            vertices,
            neighbors,
            reciprocal,
            face_sources,
            faces: Vec::new(),
        };
        let characteristic =
            cell.vertex_count() as i64 - cell.edge_count() as i64 + faces.len() as i64;
        if characteristic != 2 {
            return Err(CellFailure::EulerViolation { characteristic });
        }
        cell.faces = extract_faces(&cell);

        Ok(cell)
    }

    /// Index of the generating point in the input
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Position of the generating point
    #[inline]
    pub fn generator(&self) -> DVec3 {
        self.generator
    }

    /// Vertex coordinates, indexed by local vertex id
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges meeting at `vertex`
    #[inline]
    pub fn order(&self, vertex: usize) -> usize {
        self.neighbors[vertex].len()
    }

    /// Neighbors of `vertex`, clockwise seen from outside
    #[inline]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.neighbors[vertex]
    }

    /// Slots at which `vertex` appears in each neighbor's list
    #[inline]
    pub fn reciprocal(&self, vertex: usize) -> &[usize] {
        &self.reciprocal[vertex]
    }

    /// Plane of the face to the left of `vertex -> neighbors(vertex)[slot]`
    #[inline]
    pub fn face_source(&self, vertex: usize, slot: usize) -> FaceSource {
        self.face_sources[vertex][slot]
    }

    /// The slot after `slot` at `vertex`, wrapping around
    #[inline]
    pub fn next_slot(&self, vertex: usize, slot: usize) -> usize {
        let next = slot + 1;
        if next == self.order(vertex) {
            0
        } else {
            next
        }
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Faces recovered by walking the topology table
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of faces
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Unit outward normal of every face, in extraction order
    pub fn face_normals(&self) -> Vec<DVec3> {
        self.faces.iter().map(|face| face.normal(self)).collect()
    }

    /// `V - E + F`, which is 2 for every valid cell
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Verify the topology table from scratch.
    ///
    /// Checks vertex orders, self loops, duplicate edges, reciprocal pointers
    /// and the Euler characteristic.
    pub fn check_topology(&self) -> Result<(), CellFailure> {
        for (vertex, list) in self.neighbors.iter().enumerate() {
            if list.len() < 3 {
                return Err(CellFailure::NonManifold { vertex });
            }
            let mut sorted = list.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != list.len() || list.contains(&vertex) {
                return Err(CellFailure::NonManifold { vertex });
            }
            for (slot, &other) in list.iter().enumerate() {
                let back = self.reciprocal[vertex][slot];
                if self.neighbors.get(other).and_then(|l| l.get(back)) != Some(&vertex) {
                    return Err(CellFailure::BrokenReciprocal { vertex, slot });
                }
            }
        }
        let characteristic = self.euler_characteristic();
        if characteristic != 2 {
            return Err(CellFailure::EulerViolation { characteristic });
        }
        Ok(())
    }

    /// Sorted identities of the generators sharing a face with this cell
    pub fn neighbor_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .face_sources
            .iter()
            .flatten()
            .filter_map(|source| match source {
                FaceSource::Generator(id) => Some(*id),
                FaceSource::Wall(_) => None,
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Sorted container walls this cell touches
    pub fn walls(&self) -> Vec<Wall> {
        let mut walls: Vec<Wall> = self
            .face_sources
            .iter()
            .flatten()
            .filter_map(|source| match source {
                FaceSource::Wall(wall) => Some(*wall),
                FaceSource::Generator(_) => None,
            })
            .collect();
        walls.sort_unstable();
        walls.dedup();
        walls
    }

    /// Largest squared distance from the generator to a vertex
    pub fn max_radius_squared(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.distance_squared(self.generator))
            .fold(0.0, f64::max)
    }

    /// Enclosed volume
    pub fn volume(&self) -> f64 {
        self.tetrahedra().map(|(volume, _)| volume).sum()
    }

    /// Center of mass, assuming uniform density
    pub fn centroid(&self) -> DVec3 {
        let (volume, moment) = self
            .tetrahedra()
            .fold((0.0, DVec3::ZERO), |(v, m), (tv, tc)| (v + tv, m + tc * tv));
        if volume > 0.0 {
            moment / volume
        } else {
            self.generator
        }
    }

    /// Total area of the boundary
    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(|face| face.area(self)).sum()
    }

    /// Signed volume and centroid of the fan tetrahedra apexed at the generator
    fn tetrahedra(&self) -> impl Iterator<Item = (f64, DVec3)> + '_ {
        let apex = self.generator;
        let vertices = &self.vertices;
        self.faces.iter().flat_map(move |face| {
            face.triangles().map(move |[a, b, c]| {
                let (a, b, c) = (vertices[a], vertices[b], vertices[c]);
                let edges = (subtract(a, apex), subtract(b, apex), subtract(c, apex));
                let volume = dot(edges.0, cross(edges.1, edges.2)) / 6.0;
                (volume, (apex + a + b + c) * 0.25)
            })
        })
    }
}

/// Order the neighbors of one vertex by chaining the corners around it
fn order_fan(
    vertex: usize,
    fan: &[(usize, usize, FaceSource)],
) -> Result<(Vec<usize>, Vec<FaceSource>), CellFailure> {
    let broken = CellFailure::NonManifold { vertex };
    if fan.len() < 3 {
        return Err(broken);
    }

    let start = fan[0].0;
    let mut order = Vec::with_capacity(fan.len());
    let mut sources = Vec::with_capacity(fan.len());
    let mut current = start;
    for _ in 0..fan.len() {
        order.push(current);
        let &(_, next, _) = fan.iter().find(|c| c.0 == current).ok_or(broken)?;
        // the face containing `vertex -> current` is the corner where current is next
        let &(_, _, source) = fan.iter().find(|c| c.1 == current).ok_or(broken)?;
        sources.push(source);
        current = next;
    }
    if current != start {
        return Err(broken);
    }

    let mut unique = order.clone();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() != order.len() || unique.binary_search(&vertex).is_ok() {
        return Err(broken);
    }

    Ok((order, sources))
}

fn build_reciprocal(neighbors: &[Vec<usize>]) -> Result<Vec<Vec<usize>>, CellFailure> {
    neighbors
        .iter()
        .enumerate()
        .map(|(vertex, list)| {
            list.iter()
                .enumerate()
                .map(|(slot, &other)| {
                    neighbors[other]
                        .iter()
                        .position(|&v| v == vertex)
                        .ok_or(CellFailure::BrokenReciprocal { vertex, slot })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit cube `[0, 1]^3` with its six wall faces, generator at the center
    pub(crate) fn unit_cube() -> Cell {
        let vertices: Vec<DVec3> = (0..8)
            .map(|i| DVec3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
            .collect();
        let faces = [
            ([0, 4, 6, 2], Wall::XMin),
            ([1, 3, 7, 5], Wall::XMax),
            ([0, 1, 5, 4], Wall::YMin),
            ([2, 6, 7, 3], Wall::YMax),
            ([0, 2, 3, 1], Wall::ZMin),
            ([4, 5, 7, 6], Wall::ZMax),
        ]
        .map(|(ring, wall)| FaceLoop {
            ring: ring.to_vec(),
            source: FaceSource::Wall(wall),
        });
        Cell::from_faces(0, DVec3::splat(0.5), vertices, &faces).unwrap()
    }

    /// Tetrahedron with a bisector face toward generator 7
    pub(crate) fn tetrahedron() -> Cell {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ];
        let faces = [
            FaceLoop { ring: vec![0, 2, 1], source: FaceSource::Wall(Wall::ZMin) },
            FaceLoop { ring: vec![0, 1, 3], source: FaceSource::Wall(Wall::YMin) },
            FaceLoop { ring: vec![0, 3, 2], source: FaceSource::Wall(Wall::XMin) },
            FaceLoop { ring: vec![1, 2, 3], source: FaceSource::Generator(7) },
        ];
        Cell::from_faces(3, DVec3::splat(0.2), vertices, &faces).unwrap()
    }

    #[test]
    fn test_cube_topology() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.edge_count(), 12);
        assert_eq!(cube.face_count(), 6);
        assert_eq!(cube.euler_characteristic(), 2);
        assert!(cube.check_topology().is_ok());
        for v in 0..8 {
            assert_eq!(cube.order(v), 3);
        }
    }

    #[test]
    fn test_reciprocal_pointers() {
        let cube = unit_cube();
        for v in 0..cube.vertex_count() {
            for (slot, &w) in cube.neighbors(v).iter().enumerate() {
                assert_eq!(cube.neighbors(w)[cube.reciprocal(v)[slot]], v);
            }
        }
    }

    #[test]
    fn test_next_slot_wraps() {
        let cube = unit_cube();
        assert_eq!(cube.next_slot(0, 0), 1);
        assert_eq!(cube.next_slot(0, 2), 0);
    }

    #[test]
    fn test_cube_measures() {
        let cube = unit_cube();
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cube.surface_area(), 6.0, epsilon = 1e-12);
        let centroid = cube.centroid();
        assert_relative_eq!(centroid.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(centroid.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(centroid.z, 0.5, epsilon = 1e-12);
        assert_relative_eq!(cube.max_radius_squared(), 0.75);
        assert!(cube.neighbor_ids().is_empty());
        assert_eq!(cube.walls().len(), 6);
    }

    #[test]
    fn test_faces_match_a_fresh_walk() {
        let cube = unit_cube();
        assert_eq!(cube.faces(), extract_faces(&cube).as_slice());
        assert_eq!(cube.face_count(), 6);
        // one fan of two tetrahedra per face
        assert_eq!(cube.tetrahedra().count(), 12);
        let volume: f64 = cube.tetrahedra().map(|(v, _)| v).sum();
        assert_relative_eq!(volume, cube.volume(), epsilon = 1e-12);
    }

    #[test]
    fn test_face_normals_point_outward() {
        let cube = unit_cube();
        let normals = cube.face_normals();
        assert_eq!(normals.len(), 6);
        for (face, normal) in cube.faces().iter().zip(&normals) {
            assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-12);
            let on_face = cube.vertices()[face.ring[0]];
            assert!(normal.dot(on_face - cube.centroid()) > 0.0);
        }
        // adjacent cube faces meet at right angles
        let angle = crate::vector::angle_between(normals[0], normals[1]);
        assert!(
            (angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12
                || (angle - std::f64::consts::PI).abs() < 1e-12
        );
    }

    #[test]
    fn test_tetrahedron_sources() {
        let tet = tetrahedron();
        assert_eq!(tet.id(), 3);
        assert_eq!(tet.edge_count(), 6);
        assert_eq!(tet.face_count(), 4);
        assert_eq!(tet.neighbor_ids(), vec![7]);
        assert_eq!(tet.walls(), vec![Wall::XMin, Wall::YMin, Wall::ZMin]);
        assert_relative_eq!(tet.volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_open_surface() {
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ];
        // missing the bisector face
        let faces = [
            FaceLoop { ring: vec![0, 2, 1], source: FaceSource::Wall(Wall::ZMin) },
            FaceLoop { ring: vec![0, 1, 3], source: FaceSource::Wall(Wall::YMin) },
            FaceLoop { ring: vec![0, 3, 2], source: FaceSource::Wall(Wall::XMin) },
        ];
        let result = Cell::from_faces(0, DVec3::splat(0.2), vertices, &faces);
        assert!(matches!(result, Err(CellFailure::NonManifold { .. })));
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let faces = [FaceLoop { ring: vec![0, 1], source: FaceSource::Generator(1) }];
        let result = Cell::from_faces(0, DVec3::ZERO, vertices, &faces);
        assert_eq!(result.unwrap_err(), CellFailure::DegenerateCut);
    }
}
