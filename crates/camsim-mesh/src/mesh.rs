//! Indexed triangle mesh.
//!
//! Points, vertex normals, triangles and per-triangle attributes live in
//! reference-counted arrays. Clones share storage until one of them
//! mutates; every mutation goes through `Arc::make_mut`, so a sibling that
//! still shares the array is never changed.

use std::cmp::Ordering;
use std::sync::Arc;

use camsim_math::{BoundingBox3d, Matrix4, Point3, Scalar};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dedup::{collapse_sorted, compare_points, merge_sort_indices, weld_close};
use crate::error::{MeshError, Result};
use crate::triangle::{is_triangle, winding_normal, Facet, Triangle, TriangleVector};

/// Measurement unit of mesh coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    /// Millimeters.
    #[default]
    Metric,
    /// Inches.
    Inch,
}

/// Triangle mesh with shared vertices.
#[derive(Debug, Clone)]
pub struct Mesh<T = f64> {
    units: Units,
    precision: T,
    points: Arc<Vec<Point3<T>>>,
    normals: Arc<Vec<Point3<T>>>,
    triangles: Arc<Vec<Triangle<T>>>,
    additional_data: Option<Arc<Vec<u16>>>,
}

impl<T: Scalar> Default for Mesh<T> {
    fn default() -> Self {
        Self::new(Units::Metric, T::TOLERANCE)
    }
}

impl<T: Scalar> Mesh<T> {
    /// Empty mesh. Points closer than `precision` are merged on compaction.
    pub fn new(units: Units, precision: T) -> Self {
        Self {
            units,
            precision,
            points: Arc::new(Vec::new()),
            normals: Arc::new(Vec::new()),
            triangles: Arc::new(Vec::new()),
            additional_data: None,
        }
    }

    /// Coordinate units.
    pub fn units(&self) -> Units {
        self.units
    }

    /// Point comparison precision.
    pub fn precision(&self) -> T {
        self.precision
    }

    /// All points.
    pub fn points(&self) -> &[Point3<T>] {
        &self.points
    }

    /// All per-vertex normals.
    pub fn vertex_normals(&self) -> &[Point3<T>] {
        &self.normals
    }

    /// All triangles.
    pub fn triangles(&self) -> &[Triangle<T>] {
        &self.triangles
    }

    /// Per-triangle attributes, if any triangle carries a non-zero value.
    pub fn additional_data(&self) -> Option<&[u16]> {
        self.additional_data.as_deref().map(Vec::as_slice)
    }

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True without triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Point at `index`.
    pub fn point(&self, index: usize) -> Result<Point3<T>> {
        self.points
            .get(index)
            .copied()
            .ok_or_else(|| MeshError::index("point", index, self.points.len()))
    }

    /// Triangle at `index`.
    pub fn triangle(&self, index: usize) -> Result<&Triangle<T>> {
        self.triangles
            .get(index)
            .ok_or_else(|| MeshError::index("triangle", index, self.triangles.len()))
    }

    fn resolve(&self, index: usize, t: &Triangle<T>) -> Facet<T> {
        Facet {
            vertices: t.points.map(|i| self.points[i]),
            vertex_normals: t.normals.map(|n| n.map(|i| self.normals[i])),
            normal: t.face_normal,
            additional_data: self
                .additional_data
                .as_ref()
                .and_then(|d| d.get(index).copied())
                .unwrap_or(0),
        }
    }

    /// Triangle at `index` with resolved positions.
    pub fn facet(&self, index: usize) -> Result<Facet<T>> {
        let t = self.triangle(index)?;
        Ok(self.resolve(index, t))
    }

    /// All triangles with resolved positions.
    pub fn facets(&self) -> impl Iterator<Item = Facet<T>> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .map(|(i, t)| self.resolve(i, t))
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Append a triangle with three new points. No deduplication happens here.
    ///
    /// Returns `Ok(false)` without changes for a degenerate triangle. Fails
    /// on infinite coordinates.
    pub fn add_facet(&mut self, facet: &Facet<T>) -> Result<bool> {
        let [a, b, c] = &facet.vertices;
        if !is_triangle(a, b, c, self.precision)? {
            return Ok(false);
        }
        let base = self.points.len();
        Arc::make_mut(&mut self.points).extend_from_slice(&facet.vertices);
        let normals = facet.vertex_normals.map(|vn| {
            let nb = self.normals.len();
            Arc::make_mut(&mut self.normals).extend_from_slice(&vn);
            [nb, nb + 1, nb + 2]
        });
        Arc::make_mut(&mut self.triangles).push(Triangle {
            points: [base, base + 1, base + 2],
            normals,
            face_normal: facet.normal,
        });
        self.push_additional_data(facet.additional_data);
        Ok(true)
    }

    fn push_additional_data(&mut self, value: u16) {
        match &mut self.additional_data {
            Some(data) => Arc::make_mut(data).push(value),
            None if value != 0 => {
                let mut data = vec![0; self.triangles.len() - 1];
                data.push(value);
                self.additional_data = Some(Arc::new(data));
            }
            None => {}
        }
    }

    /// Append a triangle; the face normal follows the winding.
    pub fn add_triangle(&mut self, p1: Point3<T>, p2: Point3<T>, p3: Point3<T>) -> Result<bool> {
        self.add_facet(&Facet::new(p1, p2, p3))
    }

    /// Append a triangle with an explicit face normal.
    pub fn add_triangle_with_normal(
        &mut self,
        p1: Point3<T>,
        p2: Point3<T>,
        p3: Point3<T>,
        normal: Point3<T>,
    ) -> Result<bool> {
        let mut facet = Facet::new(p1, p2, p3);
        facet.normal = normal;
        self.add_facet(&facet)
    }

    /// Append a triangle with per-vertex normals.
    pub fn add_triangle_with_vertex_normals(
        &mut self,
        p1: Point3<T>,
        p2: Point3<T>,
        p3: Point3<T>,
        vertex_normals: [Point3<T>; 3],
    ) -> Result<bool> {
        let mut facet = Facet::new(p1, p2, p3);
        facet.vertex_normals = Some(vertex_normals);
        self.add_facet(&facet)
    }

    /// Append a triangle with a face normal and per-vertex normals.
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
        self.add_facet(&facet)
    }

    // =========================================================================
    // Compaction
    // =========================================================================

    /// Replace the contents with `triangles`, merging coincident points.
    ///
    /// Points are merge-sorted by a tolerant lexicographic comparison, runs
    /// of coordinate-equal points collapse to one, and triangle indices are
    /// remapped. Triangles that collapse onto fewer than three points are
    /// dropped. The mesh adopts the accumulator's precision.
    pub fn set_triangles(&mut self, triangles: &TriangleVector<T>) {
        self.precision = triangles.precision();
        if triangles.is_empty() {
            self.reset();
            return;
        }
        let flat: Vec<Point3<T>> = triangles.points().copied().collect();
        let order = merge_sort_indices(&flat, self.precision);
        let (remap, unique) = collapse_sorted(&flat, &order, self.precision);

        let mut normals = Vec::new();
        let mut records = Vec::with_capacity(triangles.len());
        for (i, f) in triangles.facets().iter().enumerate() {
            let points = [remap[3 * i], remap[3 * i + 1], remap[3 * i + 2]];
            let tri_normals = f.vertex_normals.map(|vn| {
                let nb = normals.len();
                normals.extend_from_slice(&vn);
                [nb, nb + 1, nb + 2]
            });
            let t = Triangle {
                points,
                normals: tri_normals,
                face_normal: f.normal,
            };
            records.push((t, f.additional_data));
        }
        let input = flat.len();
        let dropped = self.install(unique, normals, records);
        debug!(
            input_points = input,
            unique_points = self.points.len(),
            triangles = self.triangles.len(),
            dropped,
            "compacted mesh points"
        );
    }

    /// Store new arrays, dropping degenerate triangles. Returns how many
    /// triangles were dropped.
    fn install(
        &mut self,
        points: Vec<Point3<T>>,
        normals: Vec<Point3<T>>,
        records: Vec<(Triangle<T>, u16)>,
    ) -> usize {
        let total = records.len();
        let (triangles, data): (Vec<Triangle<T>>, Vec<u16>) = records
            .into_iter()
            .filter(|(t, _)| !t.is_degenerate())
            .unzip();
        let dropped = total - triangles.len();
        self.points = Arc::new(points);
        self.normals = Arc::new(normals);
        self.triangles = Arc::new(triangles);
        self.additional_data = data.iter().any(|&d| d != 0).then(|| Arc::new(data));
        if dropped > 0 {
            self.garbage_collect();
        }
        dropped
    }

    /// Pairwise O(N²) merge of points within the mesh precision, followed
    /// by removal of collapsed triangles and unreferenced points. Points no
    /// triangle uses are dropped even when nothing was merged.
    ///
    /// Returns the number of points merged away.
    pub fn remove_duplicates_slow(&mut self) -> usize {
        let mut unique: Vec<Point3<T>> = Vec::new();
        let mut remap = Vec::with_capacity(self.points.len());
        for p in self.points.iter() {
            match unique.iter().position(|u| u.is_tolerant(p, self.precision)) {
                Some(j) => remap.push(j),
                None => {
                    unique.push(*p);
                    remap.push(unique.len() - 1);
                }
            }
        }
        let merged = self.points.len() - unique.len();
        let records = self
            .triangles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut t = *t;
                t.points = t.points.map(|p| remap[p]);
                (t, self.additional_value(i))
            })
            .collect();
        let normals = self.normals.to_vec();
        let dropped = self.install(unique, normals, records);
        if dropped == 0 {
            self.garbage_collect();
        }
        debug!(merged, dropped, "removed duplicate points");
        merged
    }

    fn additional_value(&self, index: usize) -> u16 {
        self.additional_data
            .as_ref()
            .and_then(|d| d.get(index).copied())
            .unwrap_or(0)
    }

    /// Drop points no triangle references. Kept points are renumbered in
    /// order of first use. Returns the number of removed points.
    pub fn garbage_collect(&mut self) -> usize {
        let mut remap: Vec<Option<usize>> = vec![None; self.points.len()];
        let mut kept = Vec::with_capacity(self.points.len());
        let points = Arc::clone(&self.points);
        for t in Arc::make_mut(&mut self.triangles).iter_mut() {
            for idx in &mut t.points {
                let old = *idx;
                *idx = *remap[old].get_or_insert_with(|| {
                    kept.push(points[old]);
                    kept.len() - 1
                });
            }
        }
        let removed = points.len() - kept.len();
        self.points = Arc::new(kept);
        debug!(removed, "garbage collected mesh points");
        removed
    }

    // =========================================================================
    // Merging
    // =========================================================================

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.units != other.units {
            return Err(MeshError::UnitsMismatch {
                left: self.units,
                right: other.units,
            });
        }
        if self.precision != other.precision {
            return Err(MeshError::PrecisionMismatch {
                left: self.precision.as_f64(),
                right: other.precision.as_f64(),
            });
        }
        Ok(())
    }

    fn merged_records(
        &self,
        other: &Self,
        remap_a: &[usize],
        remap_b: &[usize],
        normal_offset: usize,
    ) -> Vec<(Triangle<T>, u16)> {
        let own = self.triangles.iter().enumerate().map(|(i, t)| {
            let mut t = *t;
            t.points = t.points.map(|p| remap_a[p]);
            (t, self.additional_value(i))
        });
        let theirs = other.triangles.iter().enumerate().map(|(i, t)| {
            let mut t = *t;
            t.points = t.points.map(|p| remap_b[p]);
            t.normals = t.normals.map(|n| n.map(|k| k + normal_offset));
            (t, other.additional_value(i))
        });
        own.chain(theirs).collect()
    }

    /// Merge `other` into this mesh, unifying coincident points.
    ///
    /// Both point sets are sorted and walked together in merge order, so
    /// points shared along a seam end up as one. Units and precision must
    /// match.
    pub fn add_mesh(&mut self, other: &Self) -> Result<()> {
        self.check_compatible(other)?;
        let prec = self.precision;
        let a_order = merge_sort_indices(&self.points, prec);
        let b_order = merge_sort_indices(&other.points, prec);
        let mut remap_a = vec![0; self.points.len()];
        let mut remap_b = vec![0; other.points.len()];
        let mut merged: Vec<Point3<T>> =
            Vec::with_capacity(self.points.len() + other.points.len());
        let (mut i, mut j) = (0, 0);
        loop {
            let take_own = match (a_order.get(i), b_order.get(j)) {
                (Some(&ia), Some(&jb)) => {
                    compare_points(&self.points[ia], &other.points[jb], prec) != Ordering::Greater
                }
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let (p, slot) = if take_own {
                let ia = a_order[i];
                i += 1;
                (self.points[ia], &mut remap_a[ia])
            } else {
                let jb = b_order[j];
                j += 1;
                (other.points[jb], &mut remap_b[jb])
            };
            match merged.last() {
                Some(anchor) if anchor.coordinates_equal(&p, prec) => {}
                _ => merged.push(p),
            }
            *slot = merged.len() - 1;
        }
        let (weld, merged) = weld_close(merged, prec);
        for r in remap_a.iter_mut().chain(remap_b.iter_mut()) {
            *r = weld[*r];
        }
        let records = self.merged_records(other, &remap_a, &remap_b, self.normals.len());
        let mut normals = self.normals.to_vec();
        normals.extend_from_slice(&other.normals);
        let input = self.points.len() + other.points.len();
        let dropped = self.install(merged, normals, records);
        debug!(
            input_points = input,
            unique_points = self.points.len(),
            triangles = self.triangles.len(),
            dropped,
            "merged meshes"
        );
        Ok(())
    }

    /// Append `other` by concatenation. Seam points stay duplicated.
    pub fn add_mesh_fast(&mut self, other: &Self) -> Result<()> {
        self.check_compatible(other)?;
        let offset = self.points.len();
        let remap_a: Vec<usize> = (0..offset).collect();
        let remap_b: Vec<usize> = (offset..offset + other.points.len()).collect();
        let records = self.merged_records(other, &remap_a, &remap_b, self.normals.len());
        let mut points = self.points.to_vec();
        points.extend_from_slice(&other.points);
        let mut normals = self.normals.to_vec();
        normals.extend_from_slice(&other.normals);
        self.install(points, normals, records);
        Ok(())
    }

    // =========================================================================
    // Per-triangle queries
    // =========================================================================

    /// Stored face normal of triangle `index`.
    pub fn triangle_normal(&self, index: usize) -> Result<Point3<T>> {
        Ok(self.triangle(index)?.face_normal)
    }

    /// Area of triangle `index`.
    pub fn triangle_area(&self, index: usize) -> Result<T> {
        Ok(self.facet(index)?.area())
    }

    /// Centroid of triangle `index`.
    pub fn triangle_centroid(&self, index: usize) -> Result<Point3<T>> {
        let [a, b, c] = self.facet(index)?.vertices;
        Ok((a + b + c) / camsim_math::lit(3.0))
    }

    /// Sum of triangle areas.
    pub fn total_area(&self) -> T {
        self.facets().fold(T::zero(), |acc, f| acc + f.area())
    }

    /// Box around all points.
    pub fn bounding_box(&self) -> BoundingBox3d<T> {
        BoundingBox3d::from_points(self.points.iter())
    }

    // =========================================================================
    // Normals
    // =========================================================================

    fn winding_of(&self, t: &Triangle<T>) -> Point3<T> {
        let [a, b, c] = t.points.map(|i| self.points[i]);
        winding_normal(&a, &b, &c)
    }

    /// Set every face normal to the unnormalized winding cross product.
    pub fn recalculate_normals(&mut self) {
        let fresh: Vec<Point3<T>> = self.triangles.iter().map(|t| self.winding_of(t)).collect();
        for (t, n) in Arc::make_mut(&mut self.triangles).iter_mut().zip(fresh) {
            t.face_normal = n;
        }
    }

    /// Set every face normal to the unit winding normal.
    pub fn recalculate_and_normalize_normals(&mut self) {
        let fresh: Vec<Point3<T>> = self
            .triangles
            .iter()
            .map(|t| self.winding_of(t).normalized_or_zero())
            .collect();
        for (t, n) in Arc::make_mut(&mut self.triangles).iter_mut().zip(fresh) {
            t.face_normal = n;
        }
    }

    /// Recompute the unit face normal of triangle `index`.
    pub fn recalculate_normals_for_triangle(&mut self, index: usize) -> Result<()> {
        let n = self.winding_of(self.triangle(index)?).normalized_or_zero();
        Arc::make_mut(&mut self.triangles)[index].face_normal = n;
        Ok(())
    }

    /// Recompute the unit face normals of the first three triangles using
    /// point `index`.
    pub fn recalculate_normals_for_vertex(&mut self, index: usize) -> Result<()> {
        self.point(index)?;
        let users: Vec<usize> = self
            .triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.points.contains(&index))
            .map(|(i, _)| i)
            .take(3)
            .collect();
        for i in users {
            self.recalculate_normals_for_triangle(i)?;
        }
        Ok(())
    }

    /// Replace the face normal of triangle `index` with `normal` normalized.
    pub fn set_triangle_normal(&mut self, index: usize, normal: Point3<T>) -> Result<()> {
        self.triangle(index)?;
        let n = normal.normalized()?;
        Arc::make_mut(&mut self.triangles)[index].face_normal = n;
        Ok(())
    }

    // =========================================================================
    // Point edits
    // =========================================================================

    /// Move point `index`. Normals are left untouched.
    pub fn set_point(&mut self, index: usize, p: Point3<T>) -> Result<()> {
        self.point(index)?;
        Arc::make_mut(&mut self.points)[index] = p;
        Ok(())
    }

    /// Move point `index`, optionally refreshing the normals of triangles using it.
    pub fn set_vertex_position(
        &mut self,
        index: usize,
        p: Point3<T>,
        recalculate_normals: bool,
    ) -> Result<()> {
        self.set_point(index, p)?;
        if recalculate_normals {
            self.recalculate_normals_for_vertex(index)?;
        }
        Ok(())
    }

    /// Snap near-zero coordinates of every point to zero.
    pub fn tolerate_to_zero_all_points(&mut self, tol: T) {
        for p in Arc::make_mut(&mut self.points).iter_mut() {
            p.tolerate_to_zero(tol);
        }
    }

    /// Scale all points about the origin.
    pub fn scale(&mut self, factor: T) {
        for p in Arc::make_mut(&mut self.points).iter_mut() {
            *p *= factor;
        }
    }

    /// Transform points; face and vertex normals follow the linear part.
    pub fn transform(&mut self, m: &Matrix4<T>) {
        for p in Arc::make_mut(&mut self.points).iter_mut() {
            *p = p.transform(m);
        }
        for n in Arc::make_mut(&mut self.normals).iter_mut() {
            *n = n.transform_vector(m).normalized_or_zero();
        }
        for t in Arc::make_mut(&mut self.triangles).iter_mut() {
            t.face_normal = t.face_normal.transform_vector(m).normalized_or_zero();
        }
    }

    // =========================================================================
    // Whole-mesh
    // =========================================================================

    /// Remove everything, keeping units and precision.
    pub fn reset(&mut self) {
        self.points = Arc::new(Vec::new());
        self.normals = Arc::new(Vec::new());
        self.triangles = Arc::new(Vec::new());
        self.additional_data = None;
    }

    /// Exchange contents with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Whether this mesh still shares point or triangle storage with `other`.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.points, &other.points) || Arc::ptr_eq(&self.triangles, &other.triangles)
    }
}

impl<T: Scalar> PartialEq for Mesh<T> {
    /// Triangle-by-triangle comparison of resolved positions and normals.
    fn eq(&self, other: &Self) -> bool {
        self.triangle_count() == other.triangle_count()
            && self.facets().zip(other.facets()).all(|(a, b)| {
                a.vertices == b.vertices
                    && a.vertex_normals == b.vertex_normals
                    && a.normal == b.normal
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn quad() -> TriangleVector {
        let mut tv = TriangleVector::new(1e-9);
        tv.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0))
            .unwrap();
        tv.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0))
            .unwrap();
        tv
    }

    #[test]
    fn test_add_triangle_appends_without_dedup() {
        let mut mesh = Mesh::new(Units::Metric, 1e-9);
        assert!(mesh.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap());
        assert!(mesh.add_triangle(p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(-1.0, 0.0, 0.0)).unwrap());
        assert_eq!(mesh.point_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_degenerate_triangle_leaves_mesh_unchanged() {
        let mut mesh = Mesh::new(Units::Metric, 1e-9);
        let q = p(1.0, 2.0, 3.0);
        assert!(!mesh.add_triangle(q, q, p(0.0, 0.0, 0.0)).unwrap());
        assert_eq!(mesh.point_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh
            .add_triangle(p(f64::MAX, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_set_triangles_dedups() {
        let mut mesh = Mesh::default();
        mesh.set_triangles(&quad());
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.precision(), 1e-9);
        assert_relative_eq!(mesh.total_area(), 1.0);
        // Sorted lexicographically.
        assert_eq!(mesh.points()[0], p(0.0, 0.0, 0.0));
        assert_eq!(mesh.points()[3], p(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_set_triangles_is_idempotent() {
        let mut once = Mesh::default();
        once.set_triangles(&quad());
        let mut twice = once.clone();
        twice.set_triangles(&quad());
        assert_eq!(once.points(), twice.points());
        assert_eq!(once.triangles(), twice.triangles());
    }

    #[test]
    fn test_set_triangles_merges_within_precision() {
        let mut tv = TriangleVector::new(1e-6);
        tv.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0))
            .unwrap();
        tv.add_triangle(p(1.0 + 1e-8, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0 - 1e-8, 0.0))
            .unwrap();
        let mut mesh = Mesh::default();
        mesh.set_triangles(&tv);
        assert_eq!(mesh.point_count(), 4);
    }

    #[test]
    fn test_empty_set_triangles_resets() {
        let mut mesh = Mesh::default();
        mesh.set_triangles(&quad());
        mesh.set_triangles(&TriangleVector::new(1e-3));
        assert!(mesh.is_empty());
        assert_eq!(mesh.point_count(), 0);
        assert_eq!(mesh.precision(), 1e-3);
    }

    #[test]
    fn test_add_mesh_shares_seam() {
        let mut a = Mesh::new(Units::Metric, 1e-9);
        a.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0))
            .unwrap();
        let mut b = Mesh::new(Units::Metric, 1e-9);
        b.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0))
            .unwrap();
        let mut fast = a.clone();
        a.add_mesh(&b).unwrap();
        assert_eq!(a.point_count(), 4);
        assert_eq!(a.triangle_count(), 2);
        fast.add_mesh_fast(&b).unwrap();
        assert_eq!(fast.point_count(), 6);
        assert_eq!(fast.triangle_count(), 2);
        assert_eq!(a, fast);
    }

    #[test]
    fn test_add_mesh_rejects_mismatch() {
        let mut a = Mesh::<f64>::new(Units::Metric, 1e-9);
        let b = Mesh::new(Units::Inch, 1e-9);
        assert!(matches!(a.add_mesh(&b), Err(MeshError::UnitsMismatch { .. })));
        let c = Mesh::new(Units::Metric, 1e-6);
        assert!(matches!(a.add_mesh_fast(&c), Err(MeshError::PrecisionMismatch { .. })));
    }

    #[test]
    fn test_garbage_collect_first_use_order() {
        let mut mesh = Mesh::default();
        mesh.set_triangles(&quad());
        // Sorted order puts (0, 1, 0) second; first use renumbers it last.
        assert_eq!(mesh.triangle(0).unwrap().points, [0, 2, 3]);
        assert_eq!(mesh.garbage_collect(), 0);
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.triangle(0).unwrap().points, [0, 1, 2]);
        assert_eq!(mesh.triangle(1).unwrap().points, [0, 2, 3]);
        assert_eq!(mesh.point(3).unwrap(), p(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_remove_duplicates_slow() {
        let mut mesh = Mesh::new(Units::Metric, 1e-9);
        for tv in quad().facets() {
            mesh.add_facet(tv).unwrap();
        }
        assert_eq!(mesh.point_count(), 6);
        assert_eq!(mesh.remove_duplicates_slow(), 2);
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_remove_duplicates_slow_drops_unused_points() {
        let mut mesh = Mesh::new(Units::Metric, 1e-9);
        mesh.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0))
            .unwrap();
        Arc::make_mut(&mut mesh.points).push(p(5.0, 5.0, 5.0));
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.remove_duplicates_slow(), 0);
        assert_eq!(mesh.point_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_merge_shifts_vertex_normal_indices() {
        let na = [p(0.0, 0.0, 1.0); 3];
        let nb = [p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, -1.0)];
        let build = |x: f64, vn: [Point3; 3]| {
            let mut m = Mesh::new(Units::Metric, 1e-9);
            m.add_triangle_with_vertex_normals(p(x, 0.0, 0.0), p(x + 1.0, 0.0, 0.0), p(x, 1.0, 0.0), vn)
                .unwrap();
            m
        };
        let a = build(0.0, na);
        let b = build(5.0, nb);
        for fast in [false, true] {
            let mut merged = a.clone();
            if fast {
                merged.add_mesh_fast(&b).unwrap();
            } else {
                merged.add_mesh(&b).unwrap();
            }
            assert_eq!(merged.vertex_normals().len(), 6);
            assert_eq!(merged.triangle(1).unwrap().normals, Some([3, 4, 5]));
            assert_eq!(merged.facet(0).unwrap().vertex_normals, Some(na));
            assert_eq!(merged.facet(1).unwrap().vertex_normals, Some(nb));
        }
    }

    #[test]
    fn test_copy_on_write() {
        let mut a = Mesh::default();
        a.set_triangles(&quad());
        let b = a.clone();
        assert!(a.shares_storage_with(&b));
        a.set_point(0, p(-1.0, -1.0, 0.0)).unwrap();
        a.scale(2.0);
        assert_eq!(b.point(0).unwrap(), p(0.0, 0.0, 0.0));
        assert_eq!(a.point(0).unwrap(), p(-2.0, -2.0, 0.0));
    }

    #[test]
    fn test_triangle_queries() {
        let mut mesh = Mesh::default();
        mesh.add_triangle(p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(0.0, 3.0, 0.0))
            .unwrap();
        assert_relative_eq!(mesh.triangle_area(0).unwrap(), 4.5);
        assert_eq!(mesh.triangle_centroid(0).unwrap(), p(1.0, 1.0, 0.0));
        assert_eq!(mesh.triangle_normal(0).unwrap(), Point3::unit_z());
        assert_eq!(
            mesh.triangle_area(1),
            Err(MeshError::IndexOutOfRange {
                what: "triangle",
                index: 1,
                len: 1
            })
        );
    }

    #[test]
    fn test_recalculate_normals() {
        let mut mesh = Mesh::default();
        mesh.add_triangle_with_normal(
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(0.0, 2.0, 0.0),
            p(1.0, 0.0, 0.0),
        )
        .unwrap();
        mesh.recalculate_normals();
        assert_eq!(mesh.triangle_normal(0).unwrap(), p(0.0, 0.0, 4.0));
        mesh.recalculate_and_normalize_normals();
        assert_eq!(mesh.triangle_normal(0).unwrap(), Point3::unit_z());
        mesh.set_vertex_position(1, p(0.0, 0.0, 2.0), true).unwrap();
        assert_eq!(mesh.triangle_normal(0).unwrap(), -Point3::unit_x());
        assert!(mesh.set_triangle_normal(0, Point3::zero()).is_err());
    }

    #[test]
    fn test_additional_data_tracked() {
        let mut mesh = Mesh::default();
        mesh.add_triangle(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0))
            .unwrap();
        assert!(mesh.additional_data().is_none());
        let mut f = Facet::new(p(0.0, 0.0, 1.0), p(1.0, 0.0, 1.0), p(0.0, 1.0, 1.0));
        f.additional_data = 7;
        mesh.add_facet(&f).unwrap();
        assert_eq!(mesh.additional_data(), Some(&[0u16, 7][..]));
        assert_eq!(mesh.facet(1).unwrap().additional_data, 7);
    }

    #[test]
    fn test_transform_and_bbox() {
        let mut mesh = Mesh::default();
        mesh.set_triangles(&quad());
        mesh.transform(&Matrix4::translation(&p(0.0, 0.0, 2.0)));
        let bb = mesh.bounding_box();
        assert_eq!(bb.min_corner().unwrap(), p(0.0, 0.0, 2.0));
        assert_eq!(mesh.triangle_normal(0).unwrap(), Point3::unit_z());
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut a = Mesh::default();
        a.set_triangles(&quad());
        let mut b = Mesh::new(Units::Metric, 1e-9);
        let facets: Vec<_> = quad().facets().to_vec();
        b.add_facet(&facets[1]).unwrap();
        b.add_facet(&facets[0]).unwrap();
        assert_ne!(a, b);
        let mut c = Mesh::new(Units::Metric, 1e-9);
        c.add_facet(&facets[0]).unwrap();
        c.add_facet(&facets[1]).unwrap();
        assert_eq!(a, c);
    }
}
