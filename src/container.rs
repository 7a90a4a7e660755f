//! Container sizing
//!
//! The container is the box every cell is clipped against. It is the bounding
//! box of the input, floored to a minimum edge length and widened by a margin
//! derived from the container ratio. The container also owns the spatial grid
//! the decomposition kernel searches for neighbors.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::DiagramConfig;
use crate::error::{Result, VoronoiError};
use crate::grid::SpatialGrid;

/// Axis-aligned box
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Lower corner
    pub min: DVec3,
    /// Upper corner
    pub max: DVec3,
}

impl BoundingBox {
    /// Create a box from two corners
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around the points, `None` for an empty slice
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// Edge lengths per axis
    #[inline]
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// Midpoint of the box
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Enclosed volume
    #[inline]
    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e.x * e.y * e.z
    }

    /// Length of the main diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.extent().length()
    }

    /// Grow every axis shorter than `floor` to exactly `floor`, keeping its center
    pub fn with_floor(&self, floor: f64) -> Self {
        let center = self.center();
        let half = self.extent().max(DVec3::splat(floor)) * 0.5;
        let thin = self.extent().cmplt(DVec3::splat(floor));
        let min = DVec3::select(thin, center - half, self.min);
        let max = DVec3::select(thin, center + half, self.max);
        Self { min, max }
    }

    /// Widen the box by `margin` on both sides of each axis
    pub fn expanded(&self, margin: DVec3) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Number of grid subdivisions along each axis
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    /// Subdivisions along x
    pub nx: usize,
    /// Subdivisions along y
    pub ny: usize,
    /// Subdivisions along z
    pub nz: usize,
}

impl GridDims {
    /// Pick subdivisions so each block of `block_volume` cubic units holds
    /// about one point.
    ///
    /// `lengths` are the floored bounding box edges, not the widened container,
    /// so the margin does not dilute the grid.
    pub fn for_points(count: usize, lengths: DVec3, block_volume: f64) -> Self {
        let per_unit = (count as f64 / (block_volume * lengths.x * lengths.y * lengths.z)).cbrt();
        // `as` saturates, and the floor keeps every axis at one or more
        let axis = |length: f64| ((length * per_unit + 1.0) as usize).max(1);
        Self {
            nx: axis(lengths.x),
            ny: axis(lengths.y),
            nz: axis(lengths.z),
        }
    }

    /// Subdivisions as an array
    #[inline]
    pub fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Total number of grid buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.nx.saturating_mul(self.ny).saturating_mul(self.nz)
    }
}

/// Bounding volume of a diagram, owning the spatial index of its points
#[derive(Debug, Clone)]
pub struct Container {
    /// Floored bounding box of the input
    point_bounds: BoundingBox,

    /// Margin added on each side of each axis
    margin: DVec3,

    /// Widened box the cells are clipped against
    bounds: BoundingBox,

    /// Grid resolution
    dims: GridDims,

    /// Bucketed points
    grid: SpatialGrid,
}

impl Container {
    /// Size a container around `points` and insert them into its grid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when fewer than 2 points are given, when a
    /// coordinate is not finite, or when the configured container ratio is
    /// below 1.
    pub fn new(points: &[DVec3], config: &DiagramConfig) -> Result<Self> {
        if points.len() < 2 {
            return Err(VoronoiError::InvalidInput(format!(
                "cannot generate cells from fewer than 2 points (got {})",
                points.len()
            )));
        }
        if !config.container_ratio.is_finite() || config.container_ratio < 1.0 {
            return Err(VoronoiError::InvalidInput(format!(
                "container ratio must be a finite value >= 1 (got {})",
                config.container_ratio
            )));
        }
        if let Some(id) = points.iter().position(|p| !p.is_finite()) {
            return Err(VoronoiError::InvalidInput(format!(
                "point {} has a non-finite coordinate",
                id
            )));
        }

        let raw = BoundingBox::from_points(points).ok_or_else(|| {
            VoronoiError::InvalidInput("no points supplied".to_string())
        })?;
        let point_bounds = raw.with_floor(config.threshold_floor);
        let lengths = point_bounds.extent();
        let margin = lengths * (config.container_ratio - 1.0) / 2.0;
        let bounds = point_bounds.expanded(margin);
        let dims = GridDims::for_points(points.len(), lengths, config.block_volume);

        tracing::debug!(
            points = points.len(),
            ?lengths,
            ?margin,
            nx = dims.nx,
            ny = dims.ny,
            nz = dims.nz,
            "container sized"
        );

        let grid = SpatialGrid::new(&bounds, dims, points);

        Ok(Self {
            point_bounds,
            margin,
            bounds,
            dims,
            grid,
        })
    }

    /// Box the cells are clipped against
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Floored bounding box of the points, before the margin
    #[inline]
    pub fn point_bounds(&self) -> &BoundingBox {
        &self.point_bounds
    }

    /// Margin applied on each side of each axis
    #[inline]
    pub fn margin(&self) -> DVec3 {
        self.margin
    }

    /// Grid resolution
    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// The spatial index over the inserted points
    #[inline]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Number of inserted points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.grid.len()
    }
}
