//! Error types for geometry construction and queries.

use camsim_math::MathError;
use thiserror::Error;

/// Errors raised by geometry variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Arc parameters are inconsistent.
    #[error("invalid arc: {0}")]
    InvalidArc(String),

    /// Helix parameters are inconsistent.
    #[error("invalid helix: {0}")]
    InvalidHelix(String),

    /// Query that needs at least one element on an empty polyline or contour.
    #[error("{what} is empty")]
    Empty {
        /// Kind of container.
        what: &'static str,
    },

    /// Not enough points for the requested operation.
    #[error("{what} needs at least {needed} points, has {actual}")]
    TooFewPoints {
        /// Operation name.
        what: &'static str,
        /// Required count.
        needed: usize,
        /// Available count.
        actual: usize,
    },

    /// Failure in an underlying math primitive.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl GeomError {
    /// Create an invalid arc error.
    pub fn invalid_arc(message: impl Into<String>) -> Self {
        Self::InvalidArc(message.into())
    }

    /// Create an invalid helix error.
    pub fn invalid_helix(message: impl Into<String>) -> Self {
        Self::InvalidHelix(message.into())
    }
}

/// Result alias for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
