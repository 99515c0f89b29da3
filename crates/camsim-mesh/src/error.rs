//! Error types for mesh construction and queries.

use camsim_math::MathError;
use thiserror::Error;

use crate::mesh::Units;

/// Errors raised by the mesh container.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Point, triangle or normal index past the end of its array.
    #[error("{what} index {index} out of range (count {len})")]
    IndexOutOfRange {
        /// Which array was indexed.
        what: &'static str,
        /// Requested index.
        index: usize,
        /// Number of valid entries.
        len: usize,
    },

    /// A coordinate exceeds the largest finite magnitude of the scalar type.
    #[error("infinite points in triangle")]
    InfinitePoints,

    /// Merge of meshes measured in different units.
    #[error("cannot merge meshes with different units ({left:?} vs {right:?})")]
    UnitsMismatch {
        /// Units of the receiving mesh.
        left: Units,
        /// Units of the merged mesh.
        right: Units,
    },

    /// Merge of meshes with different point precisions.
    #[error("cannot merge meshes with different precisions ({left} vs {right})")]
    PrecisionMismatch {
        /// Precision of the receiving mesh.
        left: f64,
        /// Precision of the merged mesh.
        right: f64,
    },

    /// Failure in an underlying math primitive.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl MeshError {
    /// Create an index error.
    pub fn index(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { what, index, len }
    }
}

/// Result alias for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
