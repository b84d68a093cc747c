//! Error types for building the point location structure.

use thiserror::Error;

use crate::shape::Point;

/// Errors reported while building a [`crate::Kirkpatrick`] locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KirkpatrickError {
    /// A polygon needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// A coordinate exceeds [`crate::COORDINATE_LIMIT`] in magnitude.
    #[error("vertex {0:?} lies outside the supported coordinate range")]
    CoordinateOutOfRange(Point),

    /// The same location is listed twice.
    #[error("vertex {0:?} appears more than once")]
    DuplicateVertex(Point),

    /// All vertices are collinear.
    #[error("polygon has zero area")]
    ZeroArea,

    /// Vertices are listed clockwise.
    #[error("polygon is wound clockwise")]
    Clockwise,

    /// Ear clipping found no ear, the ring is not a simple polygon.
    #[error("no ear left in a ring of {0} vertices, polygon is not simple")]
    NotSimple(usize),

    #[error("degree threshold {0} is below the minimum of {min}", min = crate::MIN_DEGREE_THRESHOLD)]
    InvalidDegreeThreshold(usize),

    #[error("enclosure margin must be positive, got {0}")]
    InvalidMargin(i64),

    /// A vertex picked for removal has fewer than three incident triangles.
    #[error("vertex {vertex} has only {size} incident triangles")]
    DegenerateStar { vertex: usize, size: usize },

    /// A dying triangle was not registered with one of its vertices.
    #[error("triangle {triangle} is missing from the star of vertex {vertex}")]
    MissingAdjacency { vertex: usize, triangle: usize },

    /// Refinement stopped with polygon vertices still in place.
    #[error("{0} polygon vertices survived refinement")]
    Unfinished(usize),

    #[error("point at infinity has no affine coordinates")]
    PointAtInfinity,
}

impl KirkpatrickError {
    /// Whether the error blames the caller's polygon or configuration rather
    /// than a broken construction invariant.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(
            self,
            Self::DegenerateStar { .. } | Self::MissingAdjacency { .. } | Self::Unfinished(_)
        )
    }
}
