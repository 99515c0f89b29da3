//! STL flavor detection and read/write options.

use camsim_mesh::Units;
use serde::{Deserialize, Serialize};

use crate::binary::{RECORD_LEN, RECORDS_OFFSET};
use crate::header::{HeaderData, HEADER_LEN};

/// STL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StlFormat {
    /// Keyword text.
    Ascii,
    /// Fixed-size little-endian records.
    #[default]
    Binary,
}

const ASCII_KEYWORDS: [&str; 9] = [
    "solid", "facet", "normal", "outer", "loop", "vertex", "endloop", "endfacet", "endsolid",
];

/// Guess the encoding of `bytes`.
///
/// A buffer whose length matches the triangle count at offset 80 exactly is
/// binary. Otherwise the first 80 bytes are searched for ASCII STL keywords,
/// and a buffer without any is binary.
pub fn detect_format(bytes: &[u8]) -> StlFormat {
    if let Some(count) = bytes.get(HEADER_LEN..RECORDS_OFFSET) {
        let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize;
        let expected = count
            .checked_mul(RECORD_LEN)
            .and_then(|n| n.checked_add(RECORDS_OFFSET));
        if expected == Some(bytes.len()) {
            return StlFormat::Binary;
        }
    }
    let block = String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_LEN)]).to_lowercase();
    if ASCII_KEYWORDS.iter().any(|k| block.contains(k)) {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    }
}

/// Options for reading STL data.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    /// Keep face normals stored in the file. When false, or when a stored
    /// normal is exactly zero, the normal is computed from the winding.
    pub use_file_normals: bool,
    /// Merge coincident points while building the mesh.
    pub compress_mesh: bool,
    /// Reject binary data with bytes after the last declared triangle.
    pub validate_end_of_stream: bool,
    /// Units tag of the resulting mesh.
    pub units: Units,
    /// Point merge precision. Defaults to the scalar tolerance.
    pub precision: Option<f64>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            use_file_normals: true,
            compress_mesh: true,
            validate_end_of_stream: true,
            units: Units::Metric,
            precision: None,
        }
    }
}

/// Options for writing STL data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WriteOptions {
    /// Output encoding.
    pub format: StlFormat,
    /// Reuse the header of the file being overwritten, if there is one.
    pub preserve_header: bool,
    /// Print ASCII numbers at single precision.
    pub truncate_numbers: bool,
    /// Color and material for a synthesized binary header.
    pub header: HeaderData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_ascii() {
        assert_eq!(detect_format(b"solid cube\n  facet normal 0 0 1\n"), StlFormat::Ascii);
        assert_eq!(detect_format(b"SOLID CUBE\n"), StlFormat::Ascii);
    }

    #[test]
    fn test_detect_binary() {
        let mut bytes = HeaderData::default().to_bytes().to_vec();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(detect_format(&bytes), StlFormat::Binary);
        assert_eq!(detect_format(&[]), StlFormat::Binary);
    }

    #[test]
    fn test_binary_size_beats_solid_header() {
        let mut bytes = vec![b' '; HEADER_LEN];
        bytes[..11].copy_from_slice(b"solid parts");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; RECORD_LEN]);
        assert_eq!(detect_format(&bytes), StlFormat::Binary);
    }
}
