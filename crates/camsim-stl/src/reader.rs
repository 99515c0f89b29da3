//! STL reading into a [`Mesh`].

use std::path::Path;

use camsim_math::{lit, Scalar};
use camsim_mesh::{Facet, Mesh, TriangleVector};
use tracing::{debug, info};

use crate::ascii::parse_ascii;
use crate::binary::parse_binary;
use crate::error::{Result, StlError};
use crate::format::{detect_format, ReadOptions, StlFormat};
use crate::header::{HeaderData, HEADER_LEN};

/// A decoded STL file.
#[derive(Debug, Clone)]
pub struct StlDocument<T: Scalar = f64> {
    /// Triangles read from the file.
    pub mesh: Mesh<T>,
    /// Encoding the data was read from.
    pub format: StlFormat,
    /// Color and material from a binary header.
    pub header: HeaderData,
    /// Raw binary header bytes.
    pub raw_header: Option<[u8; HEADER_LEN]>,
    /// Name after the first `solid` keyword of an ASCII file.
    pub solid_name: Option<String>,
}

/// Read an STL file from `path`, detecting its encoding.
pub fn read_stl<T: Scalar>(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<StlDocument<T>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| StlError::cannot_open(path, e))?;
    let doc = read_stl_from_bytes(&data, options)?;
    info!(
        path = %path.display(),
        format = ?doc.format,
        triangles = doc.mesh.triangle_count(),
        points = doc.mesh.point_count(),
        "read STL file"
    );
    Ok(doc)
}

/// Decode STL data held in memory, detecting its encoding.
pub fn read_stl_from_bytes<T: Scalar>(
    data: &[u8],
    options: &ReadOptions,
) -> Result<StlDocument<T>> {
    let precision: T = options.precision.map(lit).unwrap_or(T::TOLERANCE);
    let format = detect_format(data);
    debug!(?format, bytes = data.len(), "decoding STL data");
    let mut mesh = Mesh::new(options.units, precision);
    match format {
        StlFormat::Ascii => {
            let text = String::from_utf8_lossy(data);
            let contents = parse_ascii(&text, precision, options.use_file_normals)?;
            fill_mesh(&mut mesh, &contents.triangles, options)?;
            Ok(StlDocument {
                mesh,
                format,
                header: HeaderData::default(),
                raw_header: None,
                solid_name: contents.solid_name,
            })
        }
        StlFormat::Binary => {
            let contents = parse_binary::<T>(data, options.validate_end_of_stream)?;
            let mut triangles = TriangleVector::new(precision);
            for mut facet in contents.facets {
                if !options.use_file_normals || facet.normal.is_exactly_zero() {
                    let [a, b, c] = facet.vertices;
                    facet.normal = Facet::new(a, b, c).normal;
                }
                triangles.add_facet(facet)?;
            }
            fill_mesh(&mut mesh, &triangles, options)?;
            Ok(StlDocument {
                mesh,
                format,
                header: HeaderData::parse(&contents.header),
                raw_header: Some(contents.header),
                solid_name: None,
            })
        }
    }
}

fn fill_mesh<T: Scalar>(
    mesh: &mut Mesh<T>,
    triangles: &TriangleVector<T>,
    options: &ReadOptions,
) -> Result<()> {
    if options.compress_mesh {
        mesh.set_triangles(triangles);
    } else {
        for facet in triangles.facets() {
            mesh.add_facet(facet)?;
        }
    }
    Ok(())
}
