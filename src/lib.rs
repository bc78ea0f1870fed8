//! Planar Delaunay triangulation and bounded Voronoi diagrams
//!
//! A standalone library for triangulating 2D point sets and deriving their
//! Voronoi cells clipped to a rectangle, with output to SVG path data or
//! plain vertex rings.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_planar_voronoi::*;
//!
//! let delaunay = Delaunay::from_coords(&[
//!     10.0, 10.0,
//!     90.0, 15.0,
//!     50.0, 80.0,
//!     45.0, 40.0,
//! ]).unwrap();
//! println!("{} triangles", delaunay.triangle_count());
//!
//! // Nearest site, walking the mesh from site 0
//! let site = delaunay.locate(48.0, 44.0, 0);
//! assert_eq!(site, Some(3));
//!
//! // Cells clipped to a 100 x 100 canvas
//! let voronoi = delaunay.voronoi(Bounds::new(0.0, 0.0, 100.0, 100.0).unwrap()).unwrap();
//! let mut path = SvgPath::new();
//! voronoi.render(&mut path);
//! assert!(path.value().is_some());
//! assert!(voronoi.cell_polygons().all(|cell| cell.is_some()));
//! ```
//!
//! # Coordinates
//!
//! The y axis points down, as on a screen or canvas. "Counter-clockwise"
//! throughout the crate refers to what a viewer sees with that orientation.
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-site lookups using KD-tree
//! - `serde`: Enables serialization support for bounds and cells

// Modules
pub mod error;
pub mod config;
pub mod triangulation;
pub mod delaunay;
pub mod voronoi;
pub mod cell;
pub mod path;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{Bounds, PointAccessor};
pub use triangulation::{Triangulation, Hull, HullNode, EMPTY};
pub use delaunay::{Delaunay, Neighbors};
pub use voronoi::Voronoi;
pub use cell::VoronoiCell;
pub use path::{PathSink, SvgPath, Polygon};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
