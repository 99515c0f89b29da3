#![warn(missing_docs)]

//! Indexed triangle meshes for camsim.
//!
//! Triangles are collected in a [`TriangleVector`] and compacted into a
//! [`Mesh`] by [`Mesh::set_triangles`], which merges points closer than the
//! accumulator's precision. Meshes share their arrays between clones and
//! copy on first write.

mod dedup;
mod error;
mod mesh;
mod triangle;

pub use dedup::compare_points;
pub use error::{MeshError, Result};
pub use mesh::{Mesh, Units};
pub use triangle::{is_triangle, Facet, Triangle, TriangleVector};
