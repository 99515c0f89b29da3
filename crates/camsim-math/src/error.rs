//! Error types for math primitives.

use thiserror::Error;

/// Errors raised by points, matrices and bounding boxes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Attempted to normalize a vector of exactly zero length.
    #[error("cannot normalize null vector")]
    NullVector,

    /// A size, center or volume was requested from an uninitialized box.
    #[error("uninitialized bounding box used")]
    UninitializedBox,

    /// Index past the end of a fixed-size container.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of valid entries.
        len: usize,
    },

    /// A clamped value was set outside of its declared range.
    #[error("{name} = {value} is outside of [{min}, {max}]")]
    OutOfRange {
        /// Name of the rejected quantity.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// Inverse requested for a matrix with zero determinant.
    #[error("matrix is singular")]
    SingularMatrix,

    /// Any other invalid input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl MathError {
    /// Create an index error.
    pub fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a range error.
    pub fn out_of_range(name: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            name,
            value,
            min,
            max,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
