//! Diagram Configuration and Builder
//!
//! This module provides the knobs that control container sizing, grid
//! resolution, plane classification and text output for a diagram run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Smallest container edge length, in input length units
pub const DEFAULT_THRESHOLD_FLOOR: f64 = 2.0;

/// Expected volume per point used to pick the grid resolution
pub const DEFAULT_BLOCK_VOLUME: f64 = 5.6;

/// Relative tolerance for classifying vertices against a cutting plane
pub const DEFAULT_CLIP_TOLERANCE: f64 = 1e-10;

/// Fractional digits written per coordinate in the WKT output
pub const DEFAULT_COORDINATE_PRECISION: usize = 6;

/// Configuration for a diagram run
///
/// The same configuration and the same input points always produce the same
/// cells and byte-identical WKT, whether or not `parallel` is set.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_cells::*;
///
/// let config = DiagramConfigBuilder::new()
///     .container_ratio(1.5)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.container_ratio, 1.5);
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Ratio between the container edge and the (floored) bounding box edge
    ///
    /// - 1.0: container hugs the points
    /// - 2.0: half an axis length of margin on each side
    pub container_ratio: f64,

    /// Minimum edge length of the bounding box on every axis
    ///
    /// Flat or collinear inputs would otherwise produce a zero-thickness
    /// container.
    pub threshold_floor: f64,

    /// Expected cubic length units per point when choosing grid subdivisions
    pub block_volume: f64,

    /// Plane classification tolerance, relative to the container diagonal
    pub clip_tolerance: f64,

    /// Fractional digits per coordinate in the polyhedral surface text
    pub coordinate_precision: usize,

    /// Decompose points on the rayon thread pool
    pub parallel: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            container_ratio: 1.0,
            threshold_floor: DEFAULT_THRESHOLD_FLOOR,
            block_volume: DEFAULT_BLOCK_VOLUME,
            clip_tolerance: DEFAULT_CLIP_TOLERANCE,
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
            parallel: true,
        }
    }
}

impl DiagramConfig {
    /// Default configuration with a given container ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the ratio is below 1 or not finite
    pub fn with_container_ratio(ratio: f64) -> Result<Self> {
        DiagramConfigBuilder::new().container_ratio(ratio)?.build()
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_cells::*;
///
/// let config = DiagramConfigBuilder::new()
///     .container_ratio(2.0)
///     .unwrap()
///     .threshold_floor(0.5)
///     .unwrap()
///     .parallel(false)
///     .build()
///     .unwrap();
///
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    config: DiagramConfig,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - container_ratio: 1.0
    /// - threshold_floor: 2.0
    /// - block_volume: 5.6
    /// - clip_tolerance: 1e-10
    /// - coordinate_precision: 6
    /// - parallel: true
    pub fn new() -> Self {
        Self {
            config: DiagramConfig::default(),
        }
    }

    /// Set the container ratio
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the ratio is below 1 or not finite
    pub fn container_ratio(mut self, ratio: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio < 1.0 {
            return Err(VoronoiError::InvalidInput(format!(
                "container ratio must be a finite value >= 1 (got {})",
                ratio
            )));
        }
        self.config.container_ratio = ratio;
        Ok(self)
    }

    /// Set the minimum bounding box edge length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the floor is not a positive finite value
    pub fn threshold_floor(mut self, floor: f64) -> Result<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "threshold floor must be positive (got {})",
                floor
            )));
        }
        self.config.threshold_floor = floor;
        Ok(self)
    }

    /// Set the expected volume per point used for grid sizing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the volume is not a positive finite value
    pub fn block_volume(mut self, volume: f64) -> Result<Self> {
        if !volume.is_finite() || volume <= 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "block volume must be positive (got {})",
                volume
            )));
        }
        self.config.block_volume = volume;
        Ok(self)
    }

    /// Set the relative plane classification tolerance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the tolerance is negative or not finite
    pub fn clip_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "clip tolerance must be >= 0 (got {})",
                tolerance
            )));
        }
        self.config.clip_tolerance = tolerance;
        Ok(self)
    }

    /// Set the number of fractional digits per output coordinate
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if precision > 17 (beyond f64 resolution)
    pub fn coordinate_precision(mut self, digits: usize) -> Result<Self> {
        if digits > 17 {
            return Err(VoronoiError::InvalidConfig(format!(
                "coordinate precision must be <= 17 (got {})",
                digits
            )));
        }
        self.config.coordinate_precision = digits;
        Ok(self)
    }

    /// Toggle parallel decomposition
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DiagramConfig> {
        Ok(self.config)
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
