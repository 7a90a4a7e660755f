//! Voronoi cells of a 3D point set
//!
//! Decomposes a bounded box into one convex cell per input point and writes
//! each cell as a `POLYHEDRALSURFACE` of closed triangle rings.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_cells::*;
//!
//! // Host-style entry point: three coordinate sequences in, one surface per point out
//! let xs = [0.0, 2.0, 1.0];
//! let ys = [0.0, 0.0, 1.5];
//! let zs = [0.0, 0.0, 0.5];
//! let surfaces = compute_diagram(&xs, &ys, &zs, 1.5).unwrap();
//! assert!(surfaces[0].as_deref().unwrap().starts_with("POLYHEDRALSURFACE"));
//!
//! // Or keep the cells around for inspection
//! let config = DiagramConfigBuilder::new()
//!     .container_ratio(1.5).unwrap()
//!     .parallel(false)
//!     .build().unwrap();
//! let diagram = VoronoiDiagram::from_coordinates(&xs, &ys, &zs, config).unwrap();
//! let cell = diagram.cell(2).unwrap();
//! println!("cell 2: {} faces, volume {:.3}", cell.face_count(), cell.volume());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and cell metadata

// Modules
pub mod error;
pub mod config;
pub mod vector;
pub mod container;
pub mod grid;
pub mod cell;
pub mod faces;
pub mod decomposition;
pub mod wkt;
pub mod diagram;
pub mod generation;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{CellFailure, Result, VoronoiError};
pub use config::{DiagramConfig, DiagramConfigBuilder};
pub use container::{BoundingBox, Container, GridDims};
pub use cell::{Cell, FaceSource, Wall};
pub use faces::{extract_faces, Face};
pub use decomposition::compute_cell;
pub use wkt::polyhedral_surface;
pub use diagram::{compute_diagram, compute_diagram_with_config, zip_coordinates, VoronoiDiagram};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
