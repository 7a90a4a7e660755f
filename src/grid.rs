//! Uniform bucket grid over the container
//!
//! Points are bucketed once and never moved. Neighbor search walks shells of
//! buckets at increasing Chebyshev distance ("rings") from the query bucket;
//! [`SpatialGrid::shell_clearance`] bounds how close anything in a ring or
//! beyond can be, which is what lets the decomposition kernel stop early.

use glam::DVec3;

use crate::container::{BoundingBox, GridDims};

/// An input point tagged with its position in the input sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorPoint {
    /// 0-based index in the input
    pub id: usize,
    /// Coordinates
    pub position: DVec3,
}

/// A point found by a ring search, with its squared distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Identity of the point
    pub id: usize,
    /// Squared distance from the query point
    pub distance_squared: f64,
}

/// All candidates in one ring, nearest first
#[derive(Debug, Clone)]
pub struct RingShell {
    /// Chebyshev bucket distance from the query bucket
    pub ring: usize,
    /// Lower bound on the squared distance of anything in this ring or beyond
    pub clearance_squared: f64,
    /// Points in the ring, sorted by distance then by identity
    pub candidates: Vec<Candidate>,
}

/// Uniform grid of point buckets
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    origin: DVec3,
    bucket_size: DVec3,
    dims: [usize; 3],
    buckets: Vec<Vec<usize>>,
    points: Vec<GeneratorPoint>,
}

impl SpatialGrid {
    /// Bucket `positions` over `bounds` split into `dims` subdivisions
    pub fn new(bounds: &BoundingBox, dims: GridDims, positions: &[DVec3]) -> Self {
        let dims_arr = dims.as_array();
        let counts = DVec3::new(dims_arr[0] as f64, dims_arr[1] as f64, dims_arr[2] as f64);
        let mut grid = Self {
            origin: bounds.min,
            bucket_size: bounds.extent() / counts,
            dims: dims_arr,
            buckets: vec![Vec::new(); dims.bucket_count()],
            points: Vec::with_capacity(positions.len()),
        };

        for (id, &position) in positions.iter().enumerate() {
            let bucket = grid.linear_index(grid.bucket_of(position));
            grid.buckets[bucket].push(id);
            grid.points.push(GeneratorPoint { id, position });
        }

        grid
    }

    /// Number of inserted points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no points were inserted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Subdivisions per axis
    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Edge lengths of one bucket
    #[inline]
    pub fn bucket_size(&self) -> DVec3 {
        self.bucket_size
    }

    /// Point by identity
    #[inline]
    pub fn point(&self, id: usize) -> Option<&GeneratorPoint> {
        self.points.get(id)
    }

    /// All points in identity order
    #[inline]
    pub fn points(&self) -> &[GeneratorPoint] {
        &self.points
    }

    /// Point identities stored in a bucket
    pub fn bucket(&self, coords: [usize; 3]) -> &[usize] {
        &self.buckets[self.linear_index(coords)]
    }

    /// Integer bucket coordinates of a position, clamped into the grid
    pub fn bucket_of(&self, position: DVec3) -> [usize; 3] {
        let rel = (position - self.origin) / self.bucket_size;
        let axis = |t: f64, n: usize| {
            // zero-width axes divide to NaN
            if t <= 0.0 || t.is_nan() {
                0
            } else {
                (t.floor() as usize).min(n - 1)
            }
        };
        [
            axis(rel.x, self.dims[0]),
            axis(rel.y, self.dims[1]),
            axis(rel.z, self.dims[2]),
        ]
    }

    /// Largest ring that still contains buckets around `center`
    pub fn max_ring(&self, center: [usize; 3]) -> usize {
        (0..3)
            .map(|a| center[a].max(self.dims[a] - 1 - center[a]))
            .max()
            .unwrap_or(0)
    }

    /// Push the identities of every point in ring `ring` around `center`
    pub fn collect_shell(&self, center: [usize; 3], ring: usize, out: &mut Vec<usize>) {
        let r = ring as isize;
        let c = center.map(|v| v as isize);
        let hi = self.dims.map(|d| d as isize - 1);

        for z in (c[2] - r).max(0)..=(c[2] + r).min(hi[2]) {
            for y in (c[1] - r).max(0)..=(c[1] + r).min(hi[1]) {
                let on_face = (z - c[2]).abs() == r || (y - c[1]).abs() == r;
                if on_face {
                    for x in (c[0] - r).max(0)..=(c[0] + r).min(hi[0]) {
                        let index = [x as usize, y as usize, z as usize];
                        out.extend_from_slice(self.bucket(index));
                    }
                } else {
                    for x in [c[0] - r, c[0] + r] {
                        if (0..=hi[0]).contains(&x) {
                            let index = [x as usize, y as usize, z as usize];
                            out.extend_from_slice(self.bucket(index));
                        }
                    }
                }
            }
        }
    }

    /// Lower bound on the distance from `position` (inside bucket `center`)
    /// to any point in ring `ring` or further out.
    ///
    /// Returns `f64::INFINITY` once no buckets remain at that ring.
    pub fn shell_clearance(&self, position: DVec3, center: [usize; 3], ring: usize) -> f64 {
        if ring == 0 {
            return 0.0;
        }
        let inner = ring - 1;
        let mut clearance = f64::INFINITY;
        for axis in 0..3 {
            let c = center[axis];
            let p = position[axis];
            let origin = self.origin[axis];
            let width = self.bucket_size[axis];

            if c > inner {
                let wall = origin + (c - inner) as f64 * width;
                clearance = clearance.min((p - wall).max(0.0));
            }
            if c + inner < self.dims[axis] - 1 {
                let wall = origin + (c + inner + 1) as f64 * width;
                clearance = clearance.min((wall - p).max(0.0));
            }
        }
        clearance
    }

    /// Iterate rings of candidates around point `id`, nearest ring first
    pub fn rings_around(&self, id: usize) -> RingSearch<'_> {
        let position = self.points[id].position;
        let center = self.bucket_of(position);
        RingSearch {
            grid: self,
            query: id,
            position,
            center,
            ring: 0,
            max_ring: self.max_ring(center),
            scratch: Vec::new(),
        }
    }

    #[inline]
    fn linear_index(&self, coords: [usize; 3]) -> usize {
        coords[0] + self.dims[0] * (coords[1] + self.dims[1] * coords[2])
    }
}

/// Expanding-ring neighbor search around one point
///
/// The query point itself is never yielded. Ties in distance are broken by
/// point identity so results do not depend on bucket layout.
#[derive(Debug)]
pub struct RingSearch<'a> {
    grid: &'a SpatialGrid,
    query: usize,
    position: DVec3,
    center: [usize; 3],
    ring: usize,
    max_ring: usize,
    scratch: Vec<usize>,
}

impl Iterator for RingSearch<'_> {
    type Item = RingShell;

    fn next(&mut self) -> Option<RingShell> {
        if self.ring > self.max_ring {
            return None;
        }
        let ring = self.ring;
        self.ring += 1;

        let clearance = self.grid.shell_clearance(self.position, self.center, ring);

        self.scratch.clear();
        self.grid.collect_shell(self.center, ring, &mut self.scratch);

        let mut candidates: Vec<Candidate> = self
            .scratch
            .iter()
            .filter(|&&id| id != self.query)
            .map(|&id| Candidate {
                id,
                distance_squared: self.grid.points[id].position.distance_squared(self.position),
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.distance_squared
                .total_cmp(&b.distance_squared)
                .then(a.id.cmp(&b.id))
        });

        Some(RingShell {
            ring,
            clearance_squared: clearance * clearance,
            candidates,
        })
    }
}
