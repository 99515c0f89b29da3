//! STL writing from a [`Mesh`].

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use camsim_math::Scalar;
use camsim_mesh::Mesh;
use tracing::info;

use crate::ascii::write_ascii;
use crate::binary::write_binary;
use crate::error::{Result, StlError};
use crate::format::{StlFormat, WriteOptions};
use crate::header::HEADER_LEN;

fn binary_header(
    options: &WriteOptions,
    preserved: Option<[u8; HEADER_LEN]>,
) -> [u8; HEADER_LEN] {
    preserved.unwrap_or_else(|| options.header.to_bytes())
}

/// Header of an existing file, if it has one.
///
/// A missing or empty file has none. A non-empty file shorter than a header
/// is an error.
fn existing_header(path: &Path) -> Result<Option<[u8; HEADER_LEN]>> {
    let Ok(mut file) = File::open(path) else {
        return Ok(None);
    };
    let mut head = Vec::with_capacity(HEADER_LEN);
    file.by_ref().take(HEADER_LEN as u64).read_to_end(&mut head)?;
    match head.len() {
        0 => Ok(None),
        HEADER_LEN => {
            let mut header = [0u8; HEADER_LEN];
            header.copy_from_slice(&head);
            Ok(Some(header))
        }
        actual => Err(StlError::UnexpectedEof {
            expected: HEADER_LEN,
            actual,
        }),
    }
}

/// Write `mesh` to `path`.
///
/// With [`WriteOptions::preserve_header`] a binary write keeps the first 80
/// bytes of the file being replaced.
pub fn write_stl<T: Scalar>(
    mesh: &Mesh<T>,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let preserved = if options.preserve_header && options.format == StlFormat::Binary {
        existing_header(path)?
    } else {
        None
    };
    let file = File::create(path).map_err(|e| StlError::cannot_open(path, e))?;
    let writer = BufWriter::new(file);
    match options.format {
        StlFormat::Ascii => write_ascii(mesh, options.truncate_numbers, writer)?,
        StlFormat::Binary => write_binary(mesh, &binary_header(options, preserved), writer)?,
    }
    info!(
        path = %path.display(),
        format = ?options.format,
        triangles = mesh.triangle_count(),
        preserved_header = preserved.is_some(),
        "wrote STL file"
    );
    Ok(())
}

/// Encode `mesh` in memory.
///
/// `existing` stands in for the file being replaced when
/// [`WriteOptions::preserve_header`] is set.
pub fn write_stl_to_bytes<T: Scalar>(
    mesh: &Mesh<T>,
    options: &WriteOptions,
    existing: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match options.format {
        StlFormat::Ascii => write_ascii(mesh, options.truncate_numbers, &mut out)?,
        StlFormat::Binary => {
            let preserved = match existing.filter(|e| options.preserve_header && !e.is_empty()) {
                Some(e) if e.len() < HEADER_LEN => {
                    return Err(StlError::UnexpectedEof {
                        expected: HEADER_LEN,
                        actual: e.len(),
                    })
                }
                Some(e) => {
                    let mut header = [0u8; HEADER_LEN];
                    header.copy_from_slice(&e[..HEADER_LEN]);
                    Some(header)
                }
                None => None,
            };
            write_binary(mesh, &binary_header(options, preserved), &mut out)?;
        }
    }
    Ok(out)
}
