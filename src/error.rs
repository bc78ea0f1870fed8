//! Error types for triangulation and diagram construction

use thiserror::Error;

/// Errors that can occur while building a triangulation or a Voronoi diagram
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Fewer than three input points
    #[error("insufficient points: need at least 3, got {0}")]
    InsufficientPoints(usize),

    /// An input coordinate is NaN or infinite
    #[error("non-finite coordinate at point {0}")]
    NonFiniteCoordinate(usize),

    /// No three points span a triangle with a finite circumradius
    /// (all points collinear or coincident)
    #[error("no Delaunay triangulation exists for this input")]
    DegenerateInput,

    /// Clipping rectangle with `xmax < xmin` or `ymax < ymin`
    #[error("invalid bounds: [{xmin}, {ymin}] x [{xmax}, {ymax}]")]
    InvalidBounds {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },

    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for triangulation and diagram operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
