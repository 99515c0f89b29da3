//! Rotation quaternions.

use std::ops::Mul;

use nalgebra::{Rotation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::matrix::{Matrix, Matrix3, Matrix4};
use crate::point::Point3;
use crate::scalar::{lit, to_radians, Scalar};

/// Quaternion `w + xi + yj + zk`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion<T = f64> {
    /// Real part.
    pub w: T,
    /// i component.
    pub x: T,
    /// j component.
    pub y: T,
    /// k component.
    pub z: T,
}

impl<T: Scalar> Quaternion<T> {
    /// Create from components.
    pub fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    /// Rotation of `angle` degrees about `axis`.
    pub fn from_axis_angle(axis: &Point3<T>, angle: T) -> Result<Self> {
        let axis = axis.normalized()?;
        let half = to_radians(angle) * lit(0.5);
        let (s, c) = half.sin_cos();
        Ok(Self::new(c, axis.x * s, axis.y * s, axis.z * s))
    }

    /// Rotation quaternion of an orthonormal 3x3 matrix.
    pub fn from_rotation_matrix(m: &Matrix3<T>) -> Self {
        let rot = Rotation3::from_matrix_unchecked(m.0);
        UnitQuaternion::from_rotation_matrix(&rot).into()
    }

    /// Vector part.
    pub fn vector(&self) -> Point3<T> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Conjugate `w - xi - yj - zk`.
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Squared norm.
    pub fn norm2(&self) -> T {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Norm.
    pub fn norm(&self) -> T {
        self.norm2().sqrt()
    }

    /// Scale to unit norm. Fails on the zero quaternion.
    pub fn normalize(&mut self) -> Result<()> {
        let n = self.norm();
        if n == T::zero() {
            return Err(MathError::NullVector);
        }
        self.w /= n;
        self.x /= n;
        self.y /= n;
        self.z /= n;
        Ok(())
    }

    /// Rotate a point with this (unit) quaternion.
    pub fn rotate(&self, p: &Point3<T>) -> Point3<T> {
        let v = Self::new(T::zero(), p.x, p.y, p.z);
        (*self * v * self.conjugate()).vector()
    }

    /// Equivalent 3x3 rotation matrix.
    pub fn to_matrix3(&self) -> Matrix3<T> {
        let two: T = lit(2.0);
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        Matrix::from_rows([
            [
                T::one() - two * (y * y + z * z),
                two * (x * y - w * z),
                two * (x * z + w * y),
            ],
            [
                two * (x * y + w * z),
                T::one() - two * (x * x + z * z),
                two * (y * z - w * x),
            ],
            [
                two * (x * z - w * y),
                two * (y * z + w * x),
                T::one() - two * (x * x + y * y),
            ],
        ])
    }

    /// Equivalent 4x4 homogeneous rotation.
    pub fn to_matrix4(&self) -> Matrix4<T> {
        Matrix4::from_parts(&self.to_matrix3(), &Point3::zero())
    }

    /// Spherical interpolation towards `other`, `t` in `[0, 1]`.
    ///
    /// Nearly coincident rotations interpolate to `self`.
    pub fn slerp(&self, other: &Self, t: T) -> Self {
        let a = UnitQuaternion::from_quaternion((*self).into());
        let b = UnitQuaternion::from_quaternion((*other).into());
        match a.try_slerp(&b, t, T::TOLERANCE) {
            Some(q) => q.into(),
            None => a.into(),
        }
    }
}

impl<T: Scalar> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Scalar> Mul for Quaternion<T> {
    type Output = Self;

    /// Hamilton product.
    fn mul(self, q: Self) -> Self {
        Self::new(
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
        )
    }
}

impl<T: Scalar> From<Quaternion<T>> for nalgebra::Quaternion<T> {
    fn from(q: Quaternion<T>) -> Self {
        nalgebra::Quaternion::new(q.w, q.x, q.y, q.z)
    }
}

impl<T: Scalar> From<UnitQuaternion<T>> for Quaternion<T> {
    fn from(q: UnitQuaternion<T>) -> Self {
        let q: &nalgebra::Quaternion<T> = q.as_ref();
        Self::new(q.w, q.i, q.j, q.k)
    }
}
