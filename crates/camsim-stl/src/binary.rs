//! Binary STL records.
//!
//! ```text
//! UINT8[80]    header
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] normal
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    additional data
//! end
//! ```
//!
//! All values are little-endian.

use std::io::Write;

use camsim_math::{lit, Point3, Scalar};
use camsim_mesh::{Facet, Mesh};
use tracing::warn;

use crate::error::{Result, StlError};
use crate::header::HEADER_LEN;

/// Size of one triangle record.
pub const RECORD_LEN: usize = 50;

/// Offset of the first triangle record.
pub const RECORDS_OFFSET: usize = HEADER_LEN + 4;

const STL_FLOAT_MAX: f64 = 3e38;

/// Convert to the stored single-precision value.
///
/// Values beyond ±3e38 are clamped and magnitudes below the smallest normal
/// `f32` become zero.
pub fn to_stl_float<T: Scalar>(value: T) -> f32 {
    let v = value.as_f64();
    if v < -STL_FLOAT_MAX {
        -STL_FLOAT_MAX as f32
    } else if v > STL_FLOAT_MAX {
        STL_FLOAT_MAX as f32
    } else if v.abs() < f64::from(f32::MIN_POSITIVE) {
        0.0
    } else {
        v as f32
    }
}

/// Raw header and records of a binary STL buffer.
#[derive(Debug)]
pub(crate) struct BinaryContents<T: Scalar> {
    pub header: [u8; HEADER_LEN],
    pub facets: Vec<Facet<T>>,
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_point<T: Scalar>(bytes: &[u8], at: usize) -> Point3<T> {
    Point3::new(
        lit(f64::from(read_f32(bytes, at))),
        lit(f64::from(read_f32(bytes, at + 4))),
        lit(f64::from(read_f32(bytes, at + 8))),
    )
}

/// Split a binary STL buffer into its header and triangle records.
///
/// The buffer must hold every declared record. With `validate_end_of_stream`
/// any byte past the last record is an error; otherwise it is ignored.
pub(crate) fn parse_binary<T: Scalar>(
    bytes: &[u8],
    validate_end_of_stream: bool,
) -> Result<BinaryContents<T>> {
    if bytes.len() < RECORDS_OFFSET {
        return Err(StlError::UnexpectedEof {
            expected: RECORDS_OFFSET,
            actual: bytes.len(),
        });
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&bytes[..HEADER_LEN]);
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let payload = bytes.len() - RECORDS_OFFSET;
    let expected = count.saturating_mul(RECORD_LEN);
    if payload != expected {
        warn!(
            declared = count,
            available = payload / RECORD_LEN,
            "binary STL triangle count does not match payload"
        );
    }
    if payload < expected {
        return Err(StlError::UnexpectedEof {
            expected: RECORDS_OFFSET.saturating_add(expected),
            actual: bytes.len(),
        });
    }
    if validate_end_of_stream && payload > expected {
        return Err(StlError::TrailingData {
            extra: payload - expected,
        });
    }

    let facets = bytes[RECORDS_OFFSET..RECORDS_OFFSET + expected]
        .chunks_exact(RECORD_LEN)
        .map(|rec| Facet {
            normal: read_point(rec, 0),
            vertices: [read_point(rec, 12), read_point(rec, 24), read_point(rec, 36)],
            vertex_normals: None,
            additional_data: u16::from_le_bytes([rec[48], rec[49]]),
        })
        .collect();
    Ok(BinaryContents { header, facets })
}

fn write_point<T: Scalar, W: Write>(writer: &mut W, p: &Point3<T>) -> Result<()> {
    for c in p.to_array() {
        writer.write_all(&to_stl_float(c).to_le_bytes())?;
    }
    Ok(())
}

/// Write `mesh` as binary STL behind `header`.
pub(crate) fn write_binary<T: Scalar, W: Write>(
    mesh: &Mesh<T>,
    header: &[u8; HEADER_LEN],
    mut writer: W,
) -> Result<()> {
    let count = u32::try_from(mesh.triangle_count())
        .map_err(|_| StlError::TooManyTriangles(mesh.triangle_count()))?;
    writer.write_all(header)?;
    writer.write_all(&count.to_le_bytes())?;
    for facet in mesh.facets() {
        write_point(&mut writer, &facet.normal)?;
        for v in &facet.vertices {
            write_point(&mut writer, v)?;
        }
        writer.write_all(&facet.additional_data.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
