//! VoronoiDiagram driver and the host entry point

use glam::DVec3;
use rayon::prelude::*;

use crate::cell::Cell;
use crate::config::DiagramConfig;
use crate::container::Container;
use crate::decomposition::compute_cell;
use crate::error::{CellFailure, Result, VoronoiError};
use crate::wkt::polyhedral_surface;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Voronoi diagram of a point set inside its container
///
/// Holds one slot per input point, in input order: the computed cell, or the
/// reason it could not be computed.
///
/// # Examples
///
/// ```
/// use rust_voronoi_cells::*;
///
/// let points = vec![DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)];
/// let config = DiagramConfig::with_container_ratio(2.0).unwrap();
///
/// let diagram = VoronoiDiagram::compute(&points, config).unwrap();
/// assert_eq!(diagram.cell_count(), 2);
///
/// let cell = diagram.cell(0).unwrap();
/// println!("cell 0 has {} faces", cell.face_count());
/// ```
#[derive(Clone)]
pub struct VoronoiDiagram {
    /// Configuration used to compute this diagram
    config: DiagramConfig,

    /// Container and its spatial grid
    container: Container,

    /// Per-point results, indexed by point identity
    cells: Vec<std::result::Result<Cell, CellFailure>>,

    /// Nearest-generator lookup (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiDiagram {
    /// Decompose every point of `points` into its cell
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for fewer than 2 points, non-finite coordinates
    /// or a container ratio below 1. Failures of individual cells are not
    /// errors; they are recorded in the point's slot.
    pub fn compute(points: &[DVec3], config: DiagramConfig) -> Result<Self> {
        let container = Container::new(points, &config)?;
        let cells = decompose_all(&container, &config, |id, cell| cell.map_err(|reason| {
            log_failure(id, &reason);
            reason
        }));
        summarize(&cells);

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(points);

        Ok(Self {
            config,
            container,
            cells,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Decompose points given as separate coordinate sequences
    ///
    /// # Errors
    ///
    /// As [`VoronoiDiagram::compute`], plus `InvalidInput` when the sequences
    /// differ in length.
    pub fn from_coordinates(
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
        config: DiagramConfig,
    ) -> Result<Self> {
        let points = zip_coordinates(xs, ys, zs)?;
        Self::compute(&points, config)
    }

    /// Configuration used to compute this diagram
    #[inline]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Container the cells are clipped to
    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Number of slots, equal to the number of input points
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell of point `id`
    ///
    /// # Errors
    ///
    /// `CellNotFound` for an out-of-range id, `DecompositionFailure` if the
    /// cell could not be computed.
    pub fn cell(&self, id: usize) -> Result<&Cell> {
        match self.cells.get(id) {
            Some(Ok(cell)) => Ok(cell),
            Some(Err(reason)) => Err(VoronoiError::DecompositionFailure {
                id,
                reason: *reason,
            }),
            None => Err(VoronoiError::CellNotFound(id)),
        }
    }

    /// All slots in input order
    #[inline]
    pub fn cells(&self) -> &[std::result::Result<Cell, CellFailure>] {
        &self.cells
    }

    /// Successfully computed cells
    pub fn computed_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter_map(|slot| slot.as_ref().ok())
    }

    /// Points whose cell failed, with the reason
    pub fn failures(&self) -> Vec<(usize, CellFailure)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().err().map(|reason| (id, *reason)))
            .collect()
    }

    /// Sum of all computed cell volumes
    ///
    /// Equals the container volume when no cell failed.
    pub fn total_volume(&self) -> f64 {
        self.computed_cells().map(Cell::volume).sum()
    }

    /// Polyhedral surface text per point, `None` where the cell failed
    pub fn to_wkt(&self) -> Vec<Option<String>> {
        let precision = self.config.coordinate_precision;
        let render = |slot: &std::result::Result<Cell, CellFailure>| {
            slot.as_ref().ok().map(|cell| polyhedral_surface(cell, precision))
        };
        if self.config.parallel {
            self.cells.par_iter().map(render).collect()
        } else {
            self.cells.iter().map(render).collect()
        }
    }

    /// Identity of the cell containing `position` (requires spatial-index feature)
    ///
    /// Returns `None` outside the container.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_cells::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let points = vec![DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0)];
    /// let diagram = VoronoiDiagram::compute(&points, DiagramConfig::default()).unwrap();
    /// assert_eq!(diagram.find_cell_at(DVec3::new(3.0, 0.0, 0.0)), Some(1));
    /// assert_eq!(diagram.find_cell_at(DVec3::new(50.0, 0.0, 0.0)), None);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: DVec3) -> Option<usize> {
        if !self.container.bounds().contains(position) {
            return None;
        }
        Some(self.spatial_index.find_nearest(position))
    }
}

/// Compute the diagram and return one polyhedral surface per point.
///
/// This is the host-facing entry point: coordinates arrive as three
/// sequences, and each cell is serialized and dropped as soon as it is
/// computed. A `None` entry marks a point whose cell failed.
///
/// # Errors
///
/// `InvalidInput` when the sequences differ in length, hold fewer than 2
/// points or a non-finite value, or when `container_ratio < 1`. Nothing is
/// computed in that case.
///
/// # Example
///
/// ```
/// use rust_voronoi_cells::compute_diagram;
///
/// let surfaces = compute_diagram(&[0.0, 2.0], &[0.0, 0.0], &[0.0, 0.0], 2.0).unwrap();
/// assert_eq!(surfaces.len(), 2);
/// assert!(surfaces.iter().all(|s| s.is_some()));
/// ```
pub fn compute_diagram(
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    container_ratio: f64,
) -> Result<Vec<Option<String>>> {
    let config = DiagramConfig::with_container_ratio(container_ratio)?;
    compute_diagram_with_config(xs, ys, zs, &config)
}

/// [`compute_diagram`] with full control over the configuration
pub fn compute_diagram_with_config(
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    config: &DiagramConfig,
) -> Result<Vec<Option<String>>> {
    let points = zip_coordinates(xs, ys, zs)?;
    let container = Container::new(&points, config)?;
    let precision = config.coordinate_precision;

    let surfaces = decompose_all(&container, config, |id, cell| match cell {
        Ok(cell) => Some(polyhedral_surface(&cell, precision)),
        Err(reason) => {
            log_failure(id, &reason);
            None
        }
    });

    tracing::debug!(
        points = surfaces.len(),
        failed = surfaces.iter().filter(|s| s.is_none()).count(),
        "diagram serialized"
    );
    Ok(surfaces)
}

/// Combine three coordinate sequences into points
///
/// # Errors
///
/// `InvalidInput` when the lengths differ.
pub fn zip_coordinates(xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<Vec<DVec3>> {
    if xs.len() != ys.len() || xs.len() != zs.len() {
        return Err(VoronoiError::InvalidInput(format!(
            "lengths of coordinate vectors are not equal (x: {}, y: {}, z: {})",
            xs.len(),
            ys.len(),
            zs.len()
        )));
    }
    Ok(xs
        .iter()
        .zip(ys)
        .zip(zs)
        .map(|((&x, &y), &z)| DVec3::new(x, y, z))
        .collect())
}

/// Run the kernel for every point, handing each result to `finish` along with
/// the point's identity. Output order matches input order whether or not the
/// work runs in parallel.
fn decompose_all<T, F>(container: &Container, config: &DiagramConfig, finish: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, std::result::Result<Cell, CellFailure>) -> T + Sync,
{
    let count = container.point_count();
    let run = |id: usize| finish(id, compute_cell(container, id, config));
    if config.parallel {
        (0..count).into_par_iter().map(run).collect()
    } else {
        (0..count).map(run).collect()
    }
}

fn log_failure(id: usize, reason: &CellFailure) {
    tracing::warn!(id, %reason, "cell decomposition failed");
}

fn summarize(cells: &[std::result::Result<Cell, CellFailure>]) {
    let failed = cells.iter().filter(|c| c.is_err()).count();
    tracing::debug!(cells = cells.len(), failed, "diagram computed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramConfigBuilder;
    use approx::assert_relative_eq;

    fn sample_points() -> Vec<DVec3> {
        (0..60)
            .map(|i| {
                let t = i as f64;
                DVec3::new((t * 0.37).sin() * 6.0, (t * 1.91).cos() * 2.0, (t * 0.53).sin() * 4.0)
            })
            .collect()
    }

    #[test]
    fn test_diagram_generation() {
        let points = sample_points();
        let diagram = VoronoiDiagram::compute(&points, DiagramConfig::default()).unwrap();

        assert_eq!(diagram.cell_count(), points.len());
        assert!(diagram.failures().is_empty());
        assert_relative_eq!(
            diagram.total_volume(),
            diagram.container().bounds().volume(),
            max_relative = 1e-9
        );
        for (id, cell) in diagram.computed_cells().enumerate() {
            assert_eq!(cell.id(), id);
            assert_eq!(cell.generator(), points[id]);
        }
    }

    #[test]
    fn test_get_cell() {
        let diagram = VoronoiDiagram::compute(&sample_points(), DiagramConfig::default()).unwrap();
        assert!(diagram.cell(0).is_ok());
        assert_eq!(
            diagram.cell(diagram.cell_count()).unwrap_err(),
            VoronoiError::CellNotFound(60)
        );
    }

    #[test]
    fn test_failures_are_local() {
        let mut points = sample_points();
        points.push(points[5]);
        let diagram = VoronoiDiagram::compute(&points, DiagramConfig::default()).unwrap();

        let failed: Vec<usize> = diagram.failures().iter().map(|(id, _)| *id).collect();
        assert_eq!(failed, vec![5, 60]);
        assert!(matches!(
            diagram.cell(5),
            Err(VoronoiError::DecompositionFailure { id: 5, .. })
        ));

        let wkt = diagram.to_wkt();
        assert_eq!(wkt.len(), 61);
        assert!(wkt[5].is_none() && wkt[60].is_none());
        assert_eq!(wkt.iter().filter(|s| s.is_some()).count(), 59);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let points = sample_points();
        let (xs, ys, zs): (Vec<f64>, Vec<f64>, Vec<f64>) = (
            points.iter().map(|p| p.x).collect(),
            points.iter().map(|p| p.y).collect(),
            points.iter().map(|p| p.z).collect(),
        );
        let parallel = DiagramConfigBuilder::new().parallel(true).build().unwrap();
        let sequential = DiagramConfigBuilder::new().parallel(false).build().unwrap();

        let a = compute_diagram_with_config(&xs, &ys, &zs, &parallel).unwrap();
        let b = compute_diagram_with_config(&xs, &ys, &zs, &sequential).unwrap();
        assert_eq!(a, b);

        let diagram = VoronoiDiagram::from_coordinates(&xs, &ys, &zs, sequential).unwrap();
        assert_eq!(diagram.to_wkt(), a);
    }

    #[test]
    fn test_zip_coordinates() {
        let points = zip_coordinates(&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]).unwrap();
        assert_eq!(points, vec![DVec3::new(1.0, 3.0, 5.0), DVec3::new(2.0, 4.0, 6.0)]);
        assert!(matches!(
            zip_coordinates(&[0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 0.0]),
            Err(VoronoiError::InvalidInput(_))
        ));
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_cell_at() {
        let points = sample_points();
        let diagram = VoronoiDiagram::compute(&points, DiagramConfig::default()).unwrap();

        for (id, point) in points.iter().enumerate() {
            assert_eq!(diagram.find_cell_at(*point), Some(id));
        }
        let centroid = diagram.cell(7).unwrap().centroid();
        assert_eq!(diagram.find_cell_at(centroid), Some(7));
        assert_eq!(diagram.find_cell_at(DVec3::splat(1e6)), None);
    }
}
