//! Dense fixed-size matrices.
//!
//! A thin newtype over nalgebra's `SMatrix`. Square matrices default to
//! identity. Products compose for column vectors: `(A * B) * p == A * (B * p)`.

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use nalgebra::SMatrix;

use crate::error::{MathError, Result};
use crate::point::{Point2, Point3};
use crate::scalar::Scalar;

/// A `R x C` matrix of scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const R: usize, const C: usize>(pub SMatrix<T, R, C>);

/// 2x2 matrix.
pub type Matrix2<T = f64> = Matrix<T, 2, 2>;
/// 3x3 matrix: 3D linear map or 2D homogeneous transform.
pub type Matrix3<T = f64> = Matrix<T, 3, 3>;
/// 4x4 matrix: 3D homogeneous transform.
pub type Matrix4<T = f64> = Matrix<T, 4, 4>;

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// All-zero matrix.
    pub fn zeros() -> Self {
        Self(SMatrix::zeros())
    }

    /// Build from row-major nested arrays.
    pub fn from_rows(rows: [[T; C]; R]) -> Self {
        Self(SMatrix::from_fn(|r, c| rows[r][c]))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        R
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        C
    }

    /// Checked element access.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        if row >= R {
            return Err(MathError::index(row, R));
        }
        if col >= C {
            return Err(MathError::index(col, C));
        }
        Ok(self.0[(row, col)])
    }

    /// Checked element assignment.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= R {
            return Err(MathError::index(row, R));
        }
        if col >= C {
            return Err(MathError::index(col, C));
        }
        self.0[(row, col)] = value;
        Ok(())
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix<T, C, R> {
        Matrix(self.0.transpose())
    }

    /// Elementwise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: T) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (*a - *b).abs() <= tol)
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Identity matrix.
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// True if this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl<T: Scalar, const N: usize> Default for Matrix<T, N, N> {
    fn default() -> Self {
        Self::identity()
    }
}

macro_rules! square_inverse {
    ($n:literal) => {
        impl<T: Scalar> Matrix<T, $n, $n> {
            /// Determinant.
            pub fn determinant(&self) -> T {
                self.0.determinant()
            }

            /// Inverse. Fails with [`MathError::SingularMatrix`] if the determinant is zero.
            pub fn inverse(&self) -> Result<Self> {
                if self.determinant() == T::zero() {
                    return Err(MathError::SingularMatrix);
                }
                self.0
                    .try_inverse()
                    .map(Self)
                    .ok_or(MathError::SingularMatrix)
            }
        }
    };
}

square_inverse!(2);
square_inverse!(3);
square_inverse!(4);

impl<T: Scalar> Matrix4<T> {
    /// Upper-left 3x3 block.
    pub fn linear_part(&self) -> Matrix3<T> {
        Matrix(self.0.fixed_view::<3, 3>(0, 0).into_owned())
    }

    /// Translation column.
    pub fn translation_part(&self) -> Point3<T> {
        Point3::new(self.0[(0, 3)], self.0[(1, 3)], self.0[(2, 3)])
    }

    /// Assemble a homogeneous transform from a linear block and a translation.
    pub fn from_parts(linear: &Matrix3<T>, translation: &Point3<T>) -> Self {
        let mut m = Self::identity();
        for r in 0..3 {
            for c in 0..3 {
                m.0[(r, c)] = linear.0[(r, c)];
            }
        }
        m.0[(0, 3)] = translation.x;
        m.0[(1, 3)] = translation.y;
        m.0[(2, 3)] = translation.z;
        m
    }
}

impl<T: Scalar, const R: usize, const C: usize, const K: usize> Mul<Matrix<T, C, K>>
    for Matrix<T, R, C>
{
    type Output = Matrix<T, R, K>;
    fn mul(self, rhs: Matrix<T, C, K>) -> Matrix<T, R, K> {
        Matrix(self.0 * rhs.0)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Mul<T> for Matrix<T, R, C> {
    type Output = Self;
    fn mul(self, s: T) -> Self {
        Self(self.0 * s)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Div<T> for Matrix<T, R, C> {
    type Output = Self;
    fn div(self, s: T) -> Self {
        Self(self.0 / s)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Add for Matrix<T, R, C> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Sub for Matrix<T, R, C> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for Matrix<T, R, C> {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl<T: Scalar> Mul<Point3<T>> for Matrix4<T> {
    type Output = Point3<T>;
    fn mul(self, p: Point3<T>) -> Point3<T> {
        p.transform(&self)
    }
}

impl<T: Scalar> Mul<Point3<T>> for Matrix3<T> {
    type Output = Point3<T>;
    fn mul(self, p: Point3<T>) -> Point3<T> {
        p.transform_linear(&self)
    }
}

impl<T: Scalar> Mul<Point2<T>> for Matrix3<T> {
    type Output = Point2<T>;
    fn mul(self, p: Point2<T>) -> Point2<T> {
        p.transform(&self)
    }
}

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C>
where
    T: Scalar,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.0[idx]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C>
where
    T: Scalar,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        &mut self.0[idx]
    }
}

impl<T: Scalar, const R: usize, const C: usize> fmt::Display for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..R {
            let row: Vec<String> = (0..C).map(|c| self.0[(r, c)].to_string()).collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}
