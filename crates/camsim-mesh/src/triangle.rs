//! Triangle records and the build-time triangle accumulator.

use camsim_math::{Point3, Scalar};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Indexed triangle stored in a [`Mesh`](crate::Mesh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle<T = f64> {
    /// Indices into the mesh points.
    pub points: [usize; 3],
    /// Indices into the mesh vertex normals, if the triangle has them.
    pub normals: Option<[usize; 3]>,
    /// Face normal.
    pub face_normal: Point3<T>,
}

impl<T: Scalar> Triangle<T> {
    /// Two or more corners share a point index.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.points;
        a == b || b == c || a == c
    }
}

/// Triangle with resolved positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facet<T = f64> {
    /// Corner positions in winding order.
    pub vertices: [Point3<T>; 3],
    /// Per-corner normals.
    pub vertex_normals: Option<[Point3<T>; 3]>,
    /// Face normal.
    pub normal: Point3<T>,
    /// Opaque per-triangle attribute carried by binary STL.
    pub additional_data: u16,
}

impl<T: Scalar> Facet<T> {
    /// Facet with a face normal computed from the winding.
    pub fn new(p1: Point3<T>, p2: Point3<T>, p3: Point3<T>) -> Self {
        Self {
            vertices: [p1, p2, p3],
            vertex_normals: None,
            normal: winding_normal(&p1, &p2, &p3).normalized_or_zero(),
            additional_data: 0,
        }
    }

    /// `(p2 - p1) x (p3 - p1)`, unnormalized.
    pub fn winding_normal(&self) -> Point3<T> {
        let [a, b, c] = &self.vertices;
        winding_normal(a, b, c)
    }

    /// Area.
    pub fn area(&self) -> T {
        self.winding_normal().length() * camsim_math::lit(0.5)
    }
}

pub(crate) fn winding_normal<T: Scalar>(a: &Point3<T>, b: &Point3<T>, c: &Point3<T>) -> Point3<T> {
    (*b - *a).cross(&(*c - *a))
}

/// Whether three points form a usable triangle.
///
/// Fails if any coordinate exceeds [`Scalar::MAX_MAGNITUDE`] or is not a
/// number. Returns `Ok(false)` if two corners are within `precision` of each
/// other or the corners are collinear.
pub fn is_triangle<T: Scalar>(
    p1: &Point3<T>,
    p2: &Point3<T>,
    p3: &Point3<T>,
    precision: T,
) -> Result<bool> {
    for p in [p1, p2, p3] {
        if p.to_array().iter().any(|&c| !(c.abs() <= T::MAX_MAGNITUDE)) {
            return Err(MeshError::InfinitePoints);
        }
    }
    if p1.is_tolerant(p2, precision) || p2.is_tolerant(p3, precision) || p1.is_tolerant(p3, precision)
    {
        return Ok(false);
    }
    let e1 = *p2 - *p1;
    let e2 = *p3 - *p1;
    let cross = e1.cross(&e2).length();
    Ok(cross > T::TOLERANCE * e1.length() * e2.length())
}

/// Unordered bag of triangles with a flat, non-deduplicated point list.
///
/// Feed it to [`Mesh::set_triangles`](crate::Mesh::set_triangles) to build a
/// compacted mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleVector<T = f64> {
    precision: T,
    facets: Vec<Facet<T>>,
}

impl<T: Scalar> TriangleVector<T> {
    /// Empty accumulator comparing points with `precision`.
    pub fn new(precision: T) -> Self {
        Self {
            precision,
            facets: Vec::new(),
        }
    }

    /// Point comparison precision.
    pub fn precision(&self) -> T {
        self.precision
    }

    /// Number of accepted triangles.
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// True without triangles.
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Drop all triangles.
    pub fn clear(&mut self) {
        self.facets.clear();
    }

    /// Accepted triangles in insertion order.
    pub fn facets(&self) -> &[Facet<T>] {
        &self.facets
    }

    /// Accept `facet` unless it is degenerate. See [`is_triangle`].
    pub fn add_facet(&mut self, facet: Facet<T>) -> Result<bool> {
        let [a, b, c] = &facet.vertices;
        if !is_triangle(a, b, c, self.precision)? {
            return Ok(false);
        }
        self.facets.push(facet);
        Ok(true)
    }

    /// Add a triangle; the face normal follows the winding.
    pub fn add_triangle(&mut self, p1: Point3<T>, p2: Point3<T>, p3: Point3<T>) -> Result<bool> {
        self.add_facet(Facet::new(p1, p2, p3))
    }

    /// Add a triangle with an explicit face normal.
    pub fn add_triangle_with_normal(
        &mut self,
        p1: Point3<T>,
        p2: Point3<T>,
        p3: Point3<T>,
        normal: Point3<T>,
    ) -> Result<bool> {
        let mut facet = Facet::new(p1, p2, p3);
        facet.normal = normal;
        self.add_facet(facet)
    }

    /// Add a triangle with per-vertex normals; the face normal follows the winding.
    pub fn add_triangle_with_vertex_normals(
        &mut self,
        p1: Point3<T>,
        p2: Point3<T>,
        p3: Point3<T>,
        vertex_normals: [Point3<T>; 3],
    ) -> Result<bool> {
        let mut facet = Facet::new(p1, p2, p3);
        facet.vertex_normals = Some(vertex_normals);
        self.add_facet(facet)
    }

    /// Add a triangle with both a face normal and per-vertex normals.
    pub fn add_triangle_with_normals(
        &mut self,
        p1: Point3<T>,
        p2: Point3<T>,
        p3: Point3<T>,
        normal: Point3<T>,
        vertex_normals: [Point3<T>; 3],
    ) -> Result<bool> {
        let mut facet = Facet::new(p1, p2, p3);
        facet.normal = normal;
        facet.vertex_normals = Some(vertex_normals);
        self.add_facet(facet)
    }

    /// Flat point list, three per triangle.
    pub fn points(&self) -> impl Iterator<Item = &Point3<T>> + '_ {
        self.facets.iter().flat_map(|f| f.vertices.iter())
    }
}

impl<T: Scalar> Default for TriangleVector<T> {
    fn default() -> Self {
        Self::new(T::TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_is_triangle() {
        let prec = 1e-9;
        assert!(is_triangle(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(0.0, 1.0, 0.0), prec).unwrap());
        assert!(!is_triangle(&p(0.0, 0.0, 0.0), &p(0.0, 0.0, 0.0), &p(0.0, 1.0, 0.0), prec).unwrap());
        assert!(!is_triangle(&p(0.0, 0.0, 0.0), &p(1.0, 1.0, 1.0), &p(2.0, 2.0, 2.0), prec).unwrap());
        assert_eq!(
            is_triangle(&p(f64::INFINITY, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(0.0, 1.0, 0.0), prec),
            Err(MeshError::InfinitePoints)
        );
        assert!(is_triangle(&p(f64::NAN, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(0.0, 1.0, 0.0), prec).is_err());
    }

    #[test]
    fn test_vector_rejects_degenerate() {
        let mut tv = TriangleVector::new(1e-6);
        assert!(tv.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap());
        assert!(!tv.add_triangle(p(0.0, 0.0, 0.0), p(1e-7, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap());
        assert_eq!(tv.len(), 1);
        assert_eq!(tv.points().count(), 3);
        assert_eq!(tv.facets()[0].normal, Point3::unit_z());
    }

    #[test]
    fn test_explicit_normal_kept() {
        let mut tv = TriangleVector::default();
        let n = p(0.0, 0.0, -1.0);
        tv.add_triangle_with_normal(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), n)
            .unwrap();
        assert_eq!(tv.facets()[0].normal, n);
        assert_relative_eq!(tv.facets()[0].area(), 0.5);
    }
}
