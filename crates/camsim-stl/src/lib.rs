#![warn(missing_docs)]

//! STL import/export for camsim meshes.
//!
//! Reads and writes both STL encodings. ASCII input goes through a keyword
//! state machine (`solid` → `facet` → `outer loop` → `vertex` ×3 →
//! `endloop` → `endfacet` → `endsolid`); binary input is a header, a
//! triangle count and fixed 50-byte records. Triangles are compacted into a
//! [`camsim_mesh::Mesh`] unless [`ReadOptions::compress_mesh`] is off.
//!
//! # Example
//!
//! ```no_run
//! use camsim_stl::{read_stl, write_stl, ReadOptions, StlFormat, WriteOptions};
//!
//! let doc = read_stl::<f64>("part.stl", &ReadOptions::default()).unwrap();
//! let options = WriteOptions {
//!     format: StlFormat::Ascii,
//!     ..WriteOptions::default()
//! };
//! write_stl(&doc.mesh, "part_ascii.stl", &options).unwrap();
//! ```

mod ascii;
mod binary;
mod error;
mod format;
mod header;
mod reader;
mod writer;

pub use binary::{to_stl_float, RECORD_LEN, RECORDS_OFFSET};
pub use error::{Result, StlError};
pub use format::{detect_format, ReadOptions, StlFormat, WriteOptions};
pub use header::{HeaderData, Material, Rgba, HEADER_LEN};
pub use reader::{read_stl, read_stl_from_bytes, StlDocument};
pub use writer::{write_stl, write_stl_to_bytes};
