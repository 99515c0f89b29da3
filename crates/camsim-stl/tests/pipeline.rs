//! Text in, mesh queries out.

use approx::assert_relative_eq;
use camsim_math::{Matrix4, Point3};
use camsim_mesh::Units;
use camsim_stl::{read_stl_from_bytes, write_stl_to_bytes, ReadOptions, StlError, WriteOptions};

const SQUARE: &str = "solid square
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 2 0 0
      vertex 2 2 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 2 2 0
      vertex 0 2 0
    endloop
  endfacet
endsolid square
";

#[test]
fn test_parse_compacts_shared_edge() {
    let doc = read_stl_from_bytes::<f64>(SQUARE.as_bytes(), &ReadOptions::default()).unwrap();
    let mesh = &doc.mesh;
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.point_count(), 4);
    assert_relative_eq!(mesh.total_area(), 4.0);
    let bb = mesh.bounding_box();
    assert_eq!(bb.min_corner().unwrap(), Point3::new(0.0, 0.0, 0.0));
    assert_eq!(bb.max_corner().unwrap(), Point3::new(2.0, 2.0, 0.0));
    assert_eq!(mesh.triangle_centroid(1).unwrap().x, 2.0 / 3.0);
}

#[test]
fn test_merge_two_files() {
    let options = ReadOptions {
        units: Units::Inch,
        ..ReadOptions::default()
    };
    let first = read_stl_from_bytes::<f64>(SQUARE.as_bytes(), &options).unwrap();
    let mut second = first.mesh.clone();
    second.transform(&Matrix4::translation(&Point3::new(2.0, 0.0, 0.0)));
    let mut combined = first.mesh.clone();
    combined.add_mesh(&second).unwrap();
    assert_eq!(combined.units(), Units::Inch);
    assert_eq!(combined.point_count(), 6);
    assert_eq!(combined.triangle_count(), 4);
    assert_relative_eq!(combined.bounding_box().size().unwrap().x, 4.0);

    let bytes = write_stl_to_bytes(&combined, &WriteOptions::default(), None).unwrap();
    let reread = read_stl_from_bytes::<f64>(&bytes, &ReadOptions::default()).unwrap();
    assert_eq!(reread.mesh.point_count(), 6);
}

#[test]
fn test_infinite_coordinates_fail() {
    let text = SQUARE.replace("vertex 2 0 0", "vertex 1e309 0 0");
    let err = read_stl_from_bytes::<f64>(text.as_bytes(), &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, StlError::Mesh(_)));
}
