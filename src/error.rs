//! Error types for Voronoi cell decomposition

use thiserror::Error;

/// Reasons a single generator's cell could not be computed.
///
/// These are local failures: the diagram records them in the failed point's
/// slot and carries on with the remaining points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CellFailure {
    /// Another input point sits on top of the generator, so no bisector exists.
    #[error("generator coincides with point {other}")]
    CoincidentGenerator {
        /// Identity of the coincident point
        other: usize,
    },
    /// A cut removed every vertex of the cell.
    #[error("cell was clipped away entirely")]
    ClippedAway,
    /// The cut plane did not trace a single closed face loop.
    #[error("cut plane produced an open or branching face loop")]
    DegenerateCut,
    /// The faces around a vertex do not form a single fan.
    #[error("vertex {vertex} is not surrounded by a single face fan")]
    NonManifold {
        /// Local vertex index
        vertex: usize,
    },
    /// The cell no longer satisfies `V - E + F = 2`.
    #[error("Euler characteristic is {characteristic}, expected 2")]
    EulerViolation {
        /// Observed `V - E + F`
        characteristic: i64,
    },
    /// An edge has no matching reverse entry in the topology table.
    #[error("edge ({vertex}, {slot}) has no reciprocal entry")]
    BrokenReciprocal {
        /// Local vertex index
        vertex: usize,
        /// Slot in the vertex's neighbor list
        slot: usize,
    },
}

/// Errors that can occur while building a diagram or querying it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// The input coordinates or container ratio were rejected before any work
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The requested cell exists but could not be decomposed
    #[error("decomposition failed for point {id}: {reason}")]
    DecompositionFailure {
        /// Index of the point in the input sequence
        id: usize,
        /// Why the cell failed
        #[source]
        reason: CellFailure,
    },
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
