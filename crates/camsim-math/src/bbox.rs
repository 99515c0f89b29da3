//! Axis-aligned bounding boxes.
//!
//! A box is either uninitialized (no corners) or holds a `min <= max` pair.
//! An empty intersection is modeled as uninitialized, not as a zero-volume
//! box. Size, center and volume queries fail on an uninitialized box.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::matrix::{Matrix3, Matrix4};
use crate::point::{Point2, Point3};
use crate::scalar::{lit, Scalar};

// =============================================================================
// 3D
// =============================================================================

/// Axis-aligned box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox3d<T = f64> {
    corners: Option<(Point3<T>, Point3<T>)>,
}

impl<T: Scalar> BoundingBox3d<T> {
    /// An uninitialized box.
    pub fn new() -> Self {
        Self { corners: None }
    }

    /// Box spanned by two opposite corners, in any order.
    pub fn from_corners(a: &Point3<T>, b: &Point3<T>) -> Self {
        let mut bb = Self::new();
        bb.set_corners(a, b);
        bb
    }

    /// Cube with edge `size` centered at `center`.
    pub fn from_center_and_size(center: &Point3<T>, size: T) -> Self {
        let mut bb = Self::from_corners(center, center);
        bb.inflate(size * lit(0.5));
        bb
    }

    /// Smallest box enclosing all `points`.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<T>>,
        T: 'a,
    {
        let mut bb = Self::new();
        for p in points {
            bb.enlarge_for_point(p);
        }
        bb
    }

    /// True once a point or corner pair has been set.
    pub fn is_initialized(&self) -> bool {
        self.corners.is_some()
    }

    /// Return to the uninitialized state.
    pub fn uninitialize(&mut self) {
        self.corners = None;
    }

    /// The `(min, max)` corners, if initialized.
    pub fn bounds(&self) -> Option<(Point3<T>, Point3<T>)> {
        self.corners
    }

    /// Set corners to the componentwise min/max of `a` and `b`.
    pub fn set_corners(&mut self, a: &Point3<T>, b: &Point3<T>) {
        self.corners = Some((a.min_by_coord(b), a.max_by_coord(b)));
    }

    /// Grow to include `p`.
    pub fn enlarge_for_point(&mut self, p: &Point3<T>) {
        self.corners = Some(match self.corners {
            None => (*p, *p),
            Some((lo, hi)) => (lo.min_by_coord(p), hi.max_by_coord(p)),
        });
    }

    /// Grow by `d` on every side. Shrinking past zero size uninitializes.
    pub fn inflate(&mut self, d: T) {
        self.inflate_by(d, d, d);
    }

    /// Grow by per-axis amounts. No-op on an uninitialized box.
    pub fn inflate_by(&mut self, dx: T, dy: T, dz: T) {
        if let Some((lo, hi)) = self.corners {
            let d = Point3::new(dx, dy, dz);
            let lo = lo - d;
            let hi = hi + d;
            self.corners = if hi.x < lo.x || hi.y < lo.y || hi.z < lo.z {
                None
            } else {
                Some((lo, hi))
            };
        }
    }

    /// `min <= p <= max` on every axis. False when uninitialized.
    pub fn contains(&self, p: &Point3<T>) -> bool {
        match self.corners {
            None => false,
            Some((lo, hi)) => {
                p.x >= lo.x && p.y >= lo.y && p.z >= lo.z && p.x <= hi.x && p.y <= hi.y && p.z <= hi.z
            }
        }
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Self) -> bool {
        match other.corners {
            None => false,
            Some((lo, hi)) => self.contains(&lo) && self.contains(&hi),
        }
    }

    /// Replace with the intersection. Disjoint boxes give an uninitialized box.
    pub fn intersect(&mut self, other: &Self) {
        self.corners = match (self.corners, other.corners) {
            (Some((lo_a, hi_a)), Some((lo_b, hi_b))) => {
                let lo = lo_a.max_by_coord(&lo_b);
                let hi = hi_a.min_by_coord(&hi_b);
                if lo.x <= hi.x && lo.y <= hi.y && lo.z <= hi.z {
                    Some((lo, hi))
                } else {
                    None
                }
            }
            _ => None,
        };
    }

    /// Whether the boxes overlap or touch. False if either is uninitialized.
    pub fn is_intersecting(&self, other: &Self) -> bool {
        let mut probe = *self;
        probe.intersect(other);
        probe.is_initialized()
    }

    /// Grow to include `other`.
    pub fn union(&mut self, other: &Self) {
        if let Some((lo, hi)) = other.corners {
            self.enlarge_for_point(&lo);
            self.enlarge_for_point(&hi);
        }
    }

    /// Re-derive the box from all eight transformed corners.
    ///
    /// No-op on an uninitialized box.
    pub fn transform(&mut self, m: &Matrix4<T>) {
        if let Ok(corners) = self.corners() {
            let mut bb = Self::new();
            for c in &corners {
                bb.enlarge_for_point(&c.transform(m));
            }
            *self = bb;
        }
    }

    fn validated(&self) -> Result<(Point3<T>, Point3<T>)> {
        self.corners.ok_or(MathError::UninitializedBox)
    }

    /// Lower-left-front corner.
    pub fn min_corner(&self) -> Result<Point3<T>> {
        Ok(self.validated()?.0)
    }

    /// Upper-right-back corner.
    pub fn max_corner(&self) -> Result<Point3<T>> {
        Ok(self.validated()?.1)
    }

    /// Edge lengths.
    pub fn size(&self) -> Result<Point3<T>> {
        let (lo, hi) = self.validated()?;
        Ok(hi - lo)
    }

    /// Midpoint.
    pub fn center(&self) -> Result<Point3<T>> {
        let (lo, hi) = self.validated()?;
        Ok((lo + hi) * lit(0.5))
    }

    /// Volume, never negative.
    pub fn volume(&self) -> Result<T> {
        let s = self.size()?;
        Ok(s.x * s.y * s.z)
    }

    /// Total area of the six faces.
    pub fn surface_area(&self) -> Result<T> {
        let s = self.size()?;
        Ok(lit::<T>(2.0) * (s.x * s.y + s.y * s.z + s.x * s.z))
    }

    /// Length of the main diagonal.
    pub fn diagonal_length(&self) -> Result<T> {
        Ok(self.size()?.length())
    }

    /// Initialized with at least one zero-length edge.
    pub fn is_plane(&self) -> bool {
        match self.corners {
            None => false,
            Some((lo, hi)) => lo.x == hi.x || lo.y == hi.y || lo.z == hi.z,
        }
    }

    /// Initialized with `min == max`.
    pub fn is_single_point(&self) -> bool {
        matches!(self.corners, Some((lo, hi)) if lo == hi)
    }

    /// Corner by index: bits 1, 2, 4 select the max side on x, y, z.
    pub fn corner(&self, index: usize) -> Result<Point3<T>> {
        if index >= 8 {
            return Err(MathError::index(index, 8));
        }
        let (lo, hi) = self.validated()?;
        Ok(Point3::new(
            if index & 1 != 0 { hi.x } else { lo.x },
            if index & 2 != 0 { hi.y } else { lo.y },
            if index & 4 != 0 { hi.z } else { lo.z },
        ))
    }

    /// All eight corners in [`corner`](Self::corner) order.
    pub fn corners(&self) -> Result<[Point3<T>; 8]> {
        let mut out = [Point3::zero(); 8];
        for (i, c) in out.iter_mut().enumerate() {
            *c = self.corner(i)?;
        }
        Ok(out)
    }
}

impl<T: Scalar> AddAssign<&BoundingBox3d<T>> for BoundingBox3d<T> {
    fn add_assign(&mut self, rhs: &BoundingBox3d<T>) {
        self.union(rhs);
    }
}

impl<T: Scalar> fmt::Display for BoundingBox3d<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.corners {
            None => write!(f, "Not initialized"),
            Some((lo, hi)) => write!(f, "BLN: {} URF: {}", lo, hi),
        }
    }
}

// =============================================================================
// 2D
// =============================================================================

/// Axis-aligned box in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox2d<T = f64> {
    corners: Option<(Point2<T>, Point2<T>)>,
}

impl<T: Scalar> BoundingBox2d<T> {
    /// An uninitialized box.
    pub fn new() -> Self {
        Self { corners: None }
    }

    /// Box spanned by two opposite corners, in any order.
    pub fn from_corners(a: &Point2<T>, b: &Point2<T>) -> Self {
        let mut bb = Self::new();
        bb.set_corners(a, b);
        bb
    }

    /// True once a point or corner pair has been set.
    pub fn is_initialized(&self) -> bool {
        self.corners.is_some()
    }

    /// The `(min, max)` corners, if initialized.
    pub fn bounds(&self) -> Option<(Point2<T>, Point2<T>)> {
        self.corners
    }

    /// Set corners to the componentwise min/max of `a` and `b`.
    pub fn set_corners(&mut self, a: &Point2<T>, b: &Point2<T>) {
        self.corners = Some((a.min_by_coord(b), a.max_by_coord(b)));
    }

    /// Grow to include `p`.
    pub fn enlarge_for_point(&mut self, p: &Point2<T>) {
        self.corners = Some(match self.corners {
            None => (*p, *p),
            Some((lo, hi)) => (lo.min_by_coord(p), hi.max_by_coord(p)),
        });
    }

    /// Grow by `d` on every side. Shrinking past zero size uninitializes.
    pub fn inflate(&mut self, d: T) {
        if let Some((lo, hi)) = self.corners {
            let d = Point2::new(d, d);
            let lo = lo - d;
            let hi = hi + d;
            self.corners = if hi.x < lo.x || hi.y < lo.y {
                None
            } else {
                Some((lo, hi))
            };
        }
    }

    /// `min <= p <= max` on both axes. False when uninitialized.
    pub fn contains(&self, p: &Point2<T>) -> bool {
        match self.corners {
            None => false,
            Some((lo, hi)) => p.x >= lo.x && p.y >= lo.y && p.x <= hi.x && p.y <= hi.y,
        }
    }

    /// Replace with the intersection. Disjoint boxes give an uninitialized box.
    pub fn intersect(&mut self, other: &Self) {
        self.corners = match (self.corners, other.corners) {
            (Some((lo_a, hi_a)), Some((lo_b, hi_b))) => {
                let lo = lo_a.max_by_coord(&lo_b);
                let hi = hi_a.min_by_coord(&hi_b);
                if lo.x <= hi.x && lo.y <= hi.y {
                    Some((lo, hi))
                } else {
                    None
                }
            }
            _ => None,
        };
    }

    /// Whether the boxes overlap or touch. False if either is uninitialized.
    pub fn is_intersecting(&self, other: &Self) -> bool {
        let mut probe = *self;
        probe.intersect(other);
        probe.is_initialized()
    }

    /// Grow to include `other`.
    pub fn union(&mut self, other: &Self) {
        if let Some((lo, hi)) = other.corners {
            self.enlarge_for_point(&lo);
            self.enlarge_for_point(&hi);
        }
    }

    /// Re-derive the box from the four transformed corners.
    pub fn transform(&mut self, m: &Matrix3<T>) {
        if let Some((lo, hi)) = self.corners {
            let mut bb = Self::new();
            for c in [lo, hi, Point2::new(lo.x, hi.y), Point2::new(hi.x, lo.y)] {
                bb.enlarge_for_point(&c.transform(m));
            }
            *self = bb;
        }
    }

    fn validated(&self) -> Result<(Point2<T>, Point2<T>)> {
        self.corners.ok_or(MathError::UninitializedBox)
    }

    /// Lower-left corner.
    pub fn min_corner(&self) -> Result<Point2<T>> {
        Ok(self.validated()?.0)
    }

    /// Upper-right corner.
    pub fn max_corner(&self) -> Result<Point2<T>> {
        Ok(self.validated()?.1)
    }

    /// Edge lengths.
    pub fn size(&self) -> Result<Point2<T>> {
        let (lo, hi) = self.validated()?;
        Ok(hi - lo)
    }

    /// Midpoint.
    pub fn center(&self) -> Result<Point2<T>> {
        let (lo, hi) = self.validated()?;
        Ok((lo + hi) * lit(0.5))
    }

    /// Enclosed area.
    pub fn area(&self) -> Result<T> {
        let s = self.size()?;
        Ok(s.x * s.y)
    }

    /// Length of the diagonal.
    pub fn diagonal_length(&self) -> Result<T> {
        Ok(self.size()?.length())
    }
}

impl<T: Scalar> AddAssign<&BoundingBox2d<T>> for BoundingBox2d<T> {
    fn add_assign(&mut self, rhs: &BoundingBox2d<T>) {
        self.union(rhs);
    }
}

impl<T: Scalar> fmt::Display for BoundingBox2d<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.corners {
            None => write!(f, "Not initialized"),
            Some((lo, hi)) => write!(f, "BL: {} UR: {}", lo, hi),
        }
    }
}
