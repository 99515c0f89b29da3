//! Error types for STL file operations.

use std::path::PathBuf;

use camsim_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur during STL file operations.
#[derive(Error, Debug)]
pub enum StlError {
    /// I/O error reading or writing a stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File could not be opened or created.
    #[error("cannot use {} as an STL file: {source}", path.display())]
    CannotOpen {
        /// Offending path.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Keyword used outside the block it belongs to.
    #[error("invalid syntax at line {line}: unexpected '{keyword}'")]
    InvalidSyntax {
        /// Line number (1-indexed).
        line: usize,
        /// Keyword that broke the block structure.
        keyword: String,
    },

    /// Line starting with a word that is not an STL keyword.
    #[error("unknown keyword at line {line}: {text}")]
    UnknownKeyword {
        /// Line number (1-indexed).
        line: usize,
        /// Full offending line.
        text: String,
    },

    /// Keyword followed by the wrong number or kind of parameters.
    #[error("invalid parameters for '{keyword}' at line {line}")]
    InvalidParameters {
        /// Line number (1-indexed).
        line: usize,
        /// Keyword whose parameters were rejected.
        keyword: String,
    },

    /// Token that does not parse as a number.
    #[error("invalid number '{token}' at line {line}")]
    InvalidNumber {
        /// Line number (1-indexed).
        line: usize,
        /// Offending token.
        token: String,
    },

    /// Binary stream shorter than its header requires.
    #[error("unexpected end of stream: expected {expected} bytes, got {actual}")]
    UnexpectedEof {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Bytes remaining after the declared triangle records.
    #[error("{extra} bytes of trailing data after the last triangle")]
    TrailingData {
        /// Number of surplus bytes.
        extra: usize,
    },

    /// Mesh has more triangles than a binary STL count can hold.
    #[error("too many triangles for binary STL: {0}")]
    TooManyTriangles(usize),

    /// Failure while building the mesh.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl StlError {
    /// Create a syntax error.
    pub fn syntax(line: usize, keyword: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            line,
            keyword: keyword.into(),
        }
    }

    /// Create a parameter error.
    pub fn parameters(line: usize, keyword: impl Into<String>) -> Self {
        Self::InvalidParameters {
            line,
            keyword: keyword.into(),
        }
    }

    /// Create a cannot-open error.
    pub fn cannot_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CannotOpen {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for STL operations.
pub type Result<T> = std::result::Result<T, StlError>;
