//! 2D and 3D points.
//!
//! The same type serves as position and as direction vector. Equality is
//! exact; tolerant comparisons are separate named methods.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::matrix::{Matrix3, Matrix4};
use crate::scalar::{lit, Scalar};

// =============================================================================
// Point3
// =============================================================================

/// A point or vector in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3<T = f64> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
    /// Z coordinate.
    pub z: T,
}

impl<T: Scalar> Point3<T> {
    /// Create a point from coordinates.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// The origin / zero vector.
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Unit vector along X.
    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero(), T::zero())
    }

    /// Unit vector along Y.
    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one(), T::zero())
    }

    /// Unit vector along Z.
    pub fn unit_z() -> Self {
        Self::new(T::zero(), T::zero(), T::one())
    }

    /// Coordinate by axis index (0 = x, 1 = y, 2 = z).
    pub fn coord(&self, index: usize) -> Result<T> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(MathError::index(index, 3)),
        }
    }

    /// Set a coordinate by axis index.
    pub fn set_coord(&mut self, index: usize, value: T) -> Result<()> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => return Err(MathError::index(index, 3)),
        }
        Ok(())
    }

    /// Coordinates as an array.
    pub fn to_array(&self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared length.
    pub fn length2(&self) -> T {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(&self) -> T {
        self.length2().sqrt()
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> T {
        (*self - *other).length()
    }

    /// Normalize in place. Fails if the length is exactly zero.
    pub fn normalize(&mut self) -> Result<()> {
        let len = self.length();
        if len == T::zero() {
            return Err(MathError::NullVector);
        }
        *self /= len;
        Ok(())
    }

    /// Normalized copy. Fails if the length is exactly zero.
    pub fn normalized(&self) -> Result<Self> {
        let mut n = *self;
        n.normalize()?;
        Ok(n)
    }

    /// Normalized copy, or the vector unchanged if its length is zero.
    pub fn normalized_or_zero(&self) -> Self {
        self.normalized().unwrap_or(*self)
    }

    /// Squared distance to `other` is at most `factor²`.
    pub fn is_tolerant(&self, other: &Self, factor: T) -> bool {
        (*self - *other).length2() <= factor * factor
    }

    /// Every coordinate differs by at most `tol`.
    pub fn coordinates_equal(&self, other: &Self, tol: T) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && (self.z - other.z).abs() <= tol
    }

    /// All coordinates are exactly zero.
    pub fn is_exactly_zero(&self) -> bool {
        self.x == T::zero() && self.y == T::zero() && self.z == T::zero()
    }

    /// Snap coordinates with magnitude at most `tol` to zero.
    pub fn tolerate_to_zero(&mut self, tol: T) {
        for c in [&mut self.x, &mut self.y, &mut self.z] {
            if c.abs() <= tol {
                *c = T::zero();
            }
        }
    }

    /// Largest absolute coordinate.
    pub fn max_abs_coord(&self) -> T {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Componentwise minimum.
    pub fn min_by_coord(&self, other: &Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Componentwise maximum.
    pub fn max_by_coord(&self, other: &Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Move along a direction by `distance`.
    pub fn offset_along(&self, direction: &Self, distance: T) -> Self {
        *self + *direction * distance
    }

    /// Apply an affine 4x4 transform to this point (w = 1).
    pub fn transform(&self, m: &Matrix4<T>) -> Self {
        let a = &m.0;
        Self::new(
            a[(0, 0)] * self.x + a[(0, 1)] * self.y + a[(0, 2)] * self.z + a[(0, 3)],
            a[(1, 0)] * self.x + a[(1, 1)] * self.y + a[(1, 2)] * self.z + a[(1, 3)],
            a[(2, 0)] * self.x + a[(2, 1)] * self.y + a[(2, 2)] * self.z + a[(2, 3)],
        )
    }

    /// Apply the linear part of a 4x4 transform (w = 0).
    pub fn transform_vector(&self, m: &Matrix4<T>) -> Self {
        let a = &m.0;
        Self::new(
            a[(0, 0)] * self.x + a[(0, 1)] * self.y + a[(0, 2)] * self.z,
            a[(1, 0)] * self.x + a[(1, 1)] * self.y + a[(1, 2)] * self.z,
            a[(2, 0)] * self.x + a[(2, 1)] * self.y + a[(2, 2)] * self.z,
        )
    }

    /// Apply a 3x3 linear map.
    pub fn transform_linear(&self, m: &Matrix3<T>) -> Self {
        let a = &m.0;
        Self::new(
            a[(0, 0)] * self.x + a[(0, 1)] * self.y + a[(0, 2)] * self.z,
            a[(1, 0)] * self.x + a[(1, 1)] * self.y + a[(1, 2)] * self.z,
            a[(2, 0)] * self.x + a[(2, 1)] * self.y + a[(2, 2)] * self.z,
        )
    }

    /// Convert to another precision.
    pub fn cast<U: Scalar>(&self) -> Point3<U> {
        Point3::new(lit(self.x.as_f64()), lit(self.y.as_f64()), lit(self.z.as_f64()))
    }
}

impl<T: Scalar> Add for Point3<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Scalar> Sub for Point3<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Scalar> Neg for Point3<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: Scalar> Mul<T> for Point3<T> {
    type Output = Self;
    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl<T: Scalar> Div<T> for Point3<T> {
    type Output = Self;
    fn div(self, s: T) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }
}

impl<T: Scalar> AddAssign for Point3<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar> SubAssign for Point3<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Scalar> MulAssign<T> for Point3<T> {
    fn mul_assign(&mut self, s: T) {
        *self = *self * s;
    }
}

impl<T: Scalar> DivAssign<T> for Point3<T> {
    fn div_assign(&mut self, s: T) {
        *self = *self / s;
    }
}

impl<T: Scalar> fmt::Display for Point3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl<T: Scalar> From<nalgebra::Vector3<T>> for Point3<T> {
    fn from(v: nalgebra::Vector3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl<T: Scalar> From<nalgebra::Point3<T>> for Point3<T> {
    fn from(p: nalgebra::Point3<T>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl<T: Scalar> From<Point3<T>> for nalgebra::Vector3<T> {
    fn from(p: Point3<T>) -> Self {
        nalgebra::Vector3::new(p.x, p.y, p.z)
    }
}

impl<T: Scalar> From<[T; 3]> for Point3<T> {
    fn from(a: [T; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

// =============================================================================
// Point2
// =============================================================================

/// A point or vector in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2<T = f64> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

impl<T: Scalar> Point2<T> {
    /// Create a point from coordinates.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// The origin / zero vector.
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Coordinate by axis index (0 = x, 1 = y).
    pub fn coord(&self, index: usize) -> Result<T> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(MathError::index(index, 2)),
        }
    }

    /// Set a coordinate by axis index.
    pub fn set_coord(&mut self, index: usize, value: T) -> Result<()> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            _ => return Err(MathError::index(index, 2)),
        }
        Ok(())
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// The 2D cross product `x1*y2 - y1*x2` (signed parallelogram area).
    pub fn cross(&self, other: &Self) -> T {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular.
    pub fn perpendicular(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Squared length.
    pub fn length2(&self) -> T {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(&self) -> T {
        self.length2().sqrt()
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> T {
        (*self - *other).length()
    }

    /// Normalize in place. Fails if the length is exactly zero.
    pub fn normalize(&mut self) -> Result<()> {
        let len = self.length();
        if len == T::zero() {
            return Err(MathError::NullVector);
        }
        *self /= len;
        Ok(())
    }

    /// Normalized copy. Fails if the length is exactly zero.
    pub fn normalized(&self) -> Result<Self> {
        let mut n = *self;
        n.normalize()?;
        Ok(n)
    }

    /// Normalized copy, or the vector unchanged if its length is zero.
    pub fn normalized_or_zero(&self) -> Self {
        self.normalized().unwrap_or(*self)
    }

    /// Squared distance to `other` is at most `factor²`.
    pub fn is_tolerant(&self, other: &Self, factor: T) -> bool {
        (*self - *other).length2() <= factor * factor
    }

    /// Every coordinate differs by at most `tol`.
    pub fn coordinates_equal(&self, other: &Self, tol: T) -> bool {
        (self.x - other.x).abs() <= tol && (self.y - other.y).abs() <= tol
    }

    /// All coordinates are exactly zero.
    pub fn is_exactly_zero(&self) -> bool {
        self.x == T::zero() && self.y == T::zero()
    }

    /// Snap coordinates with magnitude at most `tol` to zero.
    pub fn tolerate_to_zero(&mut self, tol: T) {
        if self.x.abs() <= tol {
            self.x = T::zero();
        }
        if self.y.abs() <= tol {
            self.y = T::zero();
        }
    }

    /// Componentwise minimum.
    pub fn min_by_coord(&self, other: &Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum.
    pub fn max_by_coord(&self, other: &Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Angle of this vector from the +X axis in degrees, in `[0, 360)`.
    pub fn angle_from_x_axis(&self) -> T {
        crate::scalar::normalize_degrees(crate::scalar::to_degrees(self.y.atan2(self.x)))
    }

    /// Apply a homogeneous 3x3 transform (w = 1).
    pub fn transform(&self, m: &Matrix3<T>) -> Self {
        let a = &m.0;
        Self::new(
            a[(0, 0)] * self.x + a[(0, 1)] * self.y + a[(0, 2)],
            a[(1, 0)] * self.x + a[(1, 1)] * self.y + a[(1, 2)],
        )
    }

    /// Lift into 3D with the given z.
    pub fn to_3d(&self, z: T) -> Point3<T> {
        Point3::new(self.x, self.y, z)
    }
}

impl<T: Scalar> Add for Point2<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Scalar> Sub for Point2<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Scalar> Neg for Point2<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T: Scalar> Mul<T> for Point2<T> {
    type Output = Self;
    fn mul(self, s: T) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

impl<T: Scalar> Div<T> for Point2<T> {
    type Output = Self;
    fn div(self, s: T) -> Self {
        Self::new(self.x / s, self.y / s)
    }
}

impl<T: Scalar> AddAssign for Point2<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar> SubAssign for Point2<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Scalar> MulAssign<T> for Point2<T> {
    fn mul_assign(&mut self, s: T) {
        *self = *self * s;
    }
}

impl<T: Scalar> DivAssign<T> for Point2<T> {
    fn div_assign(&mut self, s: T) {
        *self = *self / s;
    }
}

impl<T: Scalar> fmt::Display for Point2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<T: Scalar> From<nalgebra::Vector2<T>> for Point2<T> {
    fn from(v: nalgebra::Vector2<T>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl<T: Scalar> From<Point2<T>> for nalgebra::Vector2<T> {
    fn from(p: Point2<T>) -> Self {
        nalgebra::Vector2::new(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_and_cross() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!(a.cross(&b), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(Point2::new(1.0, 0.0).cross(&Point2::new(0.0, 2.0)), 2.0);
    }

    #[test]
    fn test_normalize_null_vector_fails() {
        let mut v = Point3::<f64>::zero();
        assert_eq!(v.normalize(), Err(MathError::NullVector));
        assert_eq!(v.normalized_or_zero(), Point3::zero());
        assert!(Point2::<f32>::zero().normalized().is_err());
    }

    #[test]
    fn test_normalize() {
        let v = Point3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert_relative_eq!(v.length(), 1.0);
        assert_relative_eq!(v.x, 0.6);
    }

    #[test]
    fn test_is_tolerant_uses_squared_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.3, 0.4, 0.0);
        assert!(a.is_tolerant(&b, 0.5));
        assert!(!a.is_tolerant(&b, 0.49));
    }

    #[test]
    fn test_equality_is_exact() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0, 2.0, 3.0 + 1e-15);
        assert_ne!(a, b);
        assert!(a.coordinates_equal(&b, 1e-12));
    }

    #[test]
    fn test_coordinate_index() {
        let mut p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(p.coord(2), Ok(3.0));
        assert_eq!(p.coord(3), Err(MathError::index(3, 3)));
        p.set_coord(0, 5.0).unwrap();
        assert_eq!(p.x, 5.0);
        assert!(Point2::new(0.0, 0.0).coord(2).is_err());
    }

    #[test]
    fn test_tolerate_to_zero() {
        let mut p = Point3::new(1e-9, 1.0, -1e-9);
        p.tolerate_to_zero(1e-6);
        assert_eq!(p, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_angle_from_x_axis() {
        assert_relative_eq!(Point2::new(0.0, 1.0).angle_from_x_axis(), 90.0);
        assert_relative_eq!(Point2::new(0.0, -1.0).angle_from_x_axis(), 270.0);
    }

    #[test]
    fn test_cast_precision() {
        let p = Point3::new(1.5_f64, -2.25, 3.0);
        let q: Point3<f32> = p.cast();
        assert_eq!(q, Point3::new(1.5_f32, -2.25, 3.0));
    }
}
