//! Transformation matrix factory.
//!
//! All angles are in degrees. Matrices act on column vectors, so
//! `a * b` applies `b` first.

use crate::error::{MathError, Result};
use crate::matrix::{Matrix, Matrix3, Matrix4};
use crate::point::{Point2, Point3};
use crate::quaternion::Quaternion;
use crate::scalar::{cos_deg, lit, sin_deg, to_degrees, Scalar};

// =============================================================================
// 2D homogeneous and 3D linear (3x3)
// =============================================================================

impl<T: Scalar> Matrix3<T> {
    /// 2D rotation about the origin.
    pub fn rotation_2d(angle: T) -> Self {
        let (s, c) = (sin_deg(angle), cos_deg(angle));
        Matrix::from_rows([
            [c, -s, T::zero()],
            [s, c, T::zero()],
            [T::zero(), T::zero(), T::one()],
        ])
    }

    /// 2D rotation about `center`.
    pub fn rotation_2d_about(center: &Point2<T>, angle: T) -> Self {
        Self::translation_2d(center) * Self::rotation_2d(angle) * Self::translation_2d(&-*center)
    }

    /// 2D translation.
    pub fn translation_2d(v: &Point2<T>) -> Self {
        let mut m = Self::identity();
        m.0[(0, 2)] = v.x;
        m.0[(1, 2)] = v.y;
        m
    }

    /// Reflection across the line through the origin with normal `line_normal`.
    pub fn mirror_2d(line_normal: &Point2<T>) -> Result<Self> {
        let n = line_normal.normalized()?;
        let two: T = lit(2.0);
        Ok(Matrix::from_rows([
            [T::one() - two * n.x * n.x, -two * n.x * n.y, T::zero()],
            [-two * n.x * n.y, T::one() - two * n.y * n.y, T::zero()],
            [T::zero(), T::zero(), T::one()],
        ]))
    }

    /// Reflection across the line through `line_point` with normal `line_normal`.
    pub fn mirror_2d_about(line_normal: &Point2<T>, line_point: &Point2<T>) -> Result<Self> {
        Ok(Self::translation_2d(line_point)
            * Self::mirror_2d(line_normal)?
            * Self::translation_2d(&-*line_point))
    }

    /// Rotation about the X axis.
    pub fn rotation_x(angle: T) -> Self {
        let (s, c) = (sin_deg(angle), cos_deg(angle));
        Matrix::from_rows([
            [T::one(), T::zero(), T::zero()],
            [T::zero(), c, -s],
            [T::zero(), s, c],
        ])
    }

    /// Rotation about the Y axis.
    pub fn rotation_y(angle: T) -> Self {
        let (s, c) = (sin_deg(angle), cos_deg(angle));
        Matrix::from_rows([
            [c, T::zero(), s],
            [T::zero(), T::one(), T::zero()],
            [-s, T::zero(), c],
        ])
    }

    /// Rotation about the Z axis.
    pub fn rotation_z(angle: T) -> Self {
        let (s, c) = (sin_deg(angle), cos_deg(angle));
        Matrix::from_rows([
            [c, -s, T::zero()],
            [s, c, T::zero()],
            [T::zero(), T::zero(), T::one()],
        ])
    }

    /// Rotation about an arbitrary axis through the origin (Rodrigues).
    pub fn axis_rotation(axis: &Point3<T>, angle: T) -> Result<Self> {
        let a = axis.normalized()?;
        let (s, c) = (sin_deg(angle), cos_deg(angle));
        let t = T::one() - c;
        let (x, y, z) = (a.x, a.y, a.z);
        Ok(Matrix::from_rows([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
        ]))
    }

    /// Affine map taking `p1, p2, p3` onto `o1, o2, o3`.
    ///
    /// Fails if the source points are collinear.
    pub fn map_2d(
        p1: &Point2<T>,
        p2: &Point2<T>,
        p3: &Point2<T>,
        o1: &Point2<T>,
        o2: &Point2<T>,
        o3: &Point2<T>,
    ) -> Result<Self> {
        let src = Matrix::from_rows([
            [p1.x, p2.x, p3.x],
            [p1.y, p2.y, p3.y],
            [T::one(), T::one(), T::one()],
        ]);
        let dst = Matrix::from_rows([
            [o1.x, o2.x, o3.x],
            [o1.y, o2.y, o3.y],
            [T::one(), T::one(), T::one()],
        ]);
        let inv = src
            .inverse()
            .map_err(|_| MathError::invalid("source points of a 2D map are collinear"))?;
        Ok(dst * inv)
    }
}

// =============================================================================
// 3D homogeneous (4x4)
// =============================================================================

impl<T: Scalar> Matrix4<T> {
    /// Translation by `v`.
    pub fn translation(v: &Point3<T>) -> Self {
        Self::from_parts(&Matrix3::identity(), v)
    }

    /// Uniform scale about the origin.
    pub fn scaling(factor: T) -> Self {
        let mut m = Self::identity();
        for i in 0..3 {
            m.0[(i, i)] = factor;
        }
        m
    }

    /// Rotation about `axis` through the origin.
    pub fn rotation(axis: &Point3<T>, angle: T) -> Result<Self> {
        Ok(Self::from_parts(
            &Matrix3::axis_rotation(axis, angle)?,
            &Point3::zero(),
        ))
    }

    /// Rotation about `axis` through `base_point`.
    pub fn rotation_about(axis: &Point3<T>, base_point: &Point3<T>, angle: T) -> Result<Self> {
        Ok(Self::translation(base_point)
            * Self::rotation(axis, angle)?
            * Self::translation(&-*base_point))
    }

    /// Rotation taking `start_orientation` onto `end_orientation`, then a translation.
    pub fn rotation_between(
        end_orientation: &Point3<T>,
        start_orientation: &Point3<T>,
        translation: &Point3<T>,
    ) -> Result<Self> {
        let from = start_orientation.normalized()?;
        let to = end_orientation.normalized()?;
        let rotation = rotation_onto(&from, &to)?;
        Ok(Self::from_parts(&rotation, translation))
    }

    /// Reflection across the plane through the origin with normal `plane_normal`.
    pub fn mirror(plane_normal: &Point3<T>) -> Result<Self> {
        let n = plane_normal.normalized()?;
        let two: T = lit(2.0);
        let nv = n.to_array();
        let mut linear = Matrix3::identity();
        for r in 0..3 {
            for c in 0..3 {
                linear.0[(r, c)] -= two * nv[r] * nv[c];
            }
        }
        Ok(Self::from_parts(&linear, &Point3::zero()))
    }

    /// Reflection across the plane through `plane_point`.
    pub fn mirror_about(plane_normal: &Point3<T>, plane_point: &Point3<T>) -> Result<Self> {
        Ok(Self::translation(plane_point)
            * Self::mirror(plane_normal)?
            * Self::translation(&-*plane_point))
    }

    /// Rotation angles `(x, y, z)` in degrees with `R = Rz * Ry * Rx`.
    pub fn decompose_rotations(&self) -> (T, T, T) {
        let m = &self.0;
        let sy = (-m[(2, 0)]).max(-T::one()).min(T::one());
        let y = to_degrees(sy.asin());
        let cy = (m[(0, 0)] * m[(0, 0)] + m[(1, 0)] * m[(1, 0)]).sqrt();
        if cy > T::TOLERANCE {
            let x = to_degrees(m[(2, 1)].atan2(m[(2, 2)]));
            let z = to_degrees(m[(1, 0)].atan2(m[(0, 0)]));
            (x, y, z)
        } else {
            let z = to_degrees((-m[(0, 1)]).atan2(m[(1, 1)]));
            (T::zero(), y, z)
        }
    }

    /// Compose `T(shift) * Rz * Ry * Rx`, rounding the angles to `digits` decimals.
    pub fn compose(rot_x: T, rot_y: T, rot_z: T, shift: &Point3<T>, digits: u32) -> Self {
        let scale: T = lit(10f64.powi(digits as i32));
        let round = |a: T| (a * scale).round() / scale;
        let linear = Matrix3::rotation_z(round(rot_z))
            * Matrix3::rotation_y(round(rot_y))
            * Matrix3::rotation_x(round(rot_x));
        Self::from_parts(&linear, shift)
    }

    /// Interpolated transforms from `initial` to `end` in `steps` equal steps.
    ///
    /// Returns `steps + 1` matrices, the first equal to `initial` and the last
    /// to `end`. Rotation is interpolated with slerp, translation linearly.
    pub fn intermediary_transforms(initial: &Self, end: &Self, steps: u32) -> Result<Vec<Self>> {
        if steps == 0 {
            return Err(MathError::invalid("at least one interpolation step is required"));
        }
        let q0 = Quaternion::from_rotation_matrix(&initial.linear_part());
        let q1 = Quaternion::from_rotation_matrix(&end.linear_part());
        let t0 = initial.translation_part();
        let t1 = end.translation_part();
        let n: T = lit(f64::from(steps));
        let mut out = Vec::with_capacity(steps as usize + 1);
        out.push(*initial);
        for i in 1..steps {
            let t = lit::<T>(f64::from(i)) / n;
            let rot = q0.slerp(&q1, t).to_matrix3();
            out.push(Self::from_parts(&rot, &(t0 + (t1 - t0) * t)));
        }
        out.push(*end);
        Ok(out)
    }

    /// Rotation taking `direction` onto +Z, and its inverse.
    pub fn rotation_to_vertical(direction: &Point3<T>) -> Result<(Self, Self)> {
        let from = direction.normalized()?;
        let rotation = rotation_onto(&from, &Point3::unit_z())?;
        let forward = Self::from_parts(&rotation, &Point3::zero());
        let inverse = Self::from_parts(&rotation.transpose(), &Point3::zero());
        Ok((forward, inverse))
    }

    /// Move and rotate matrices for an orthogonal coordinate system.
    ///
    /// With `from_global_to_cs` the mapping is `rotate * move` taking global
    /// coordinates into the system; otherwise `move * rotate` maps back.
    pub fn orthogonal_frame(
        origin: &Point3<T>,
        i: &Point3<T>,
        j: &Point3<T>,
        k: &Point3<T>,
        from_global_to_cs: bool,
    ) -> Result<(Self, Self)> {
        let (i, j, k) = (i.normalized()?, j.normalized()?, k.normalized()?);
        let rows = Matrix3::from_rows([i.to_array(), j.to_array(), k.to_array()]);
        if from_global_to_cs {
            Ok((
                Self::translation(&-*origin),
                Self::from_parts(&rows, &Point3::zero()),
            ))
        } else {
            Ok((
                Self::translation(origin),
                Self::from_parts(&rows.transpose(), &Point3::zero()),
            ))
        }
    }
}

/// Minimal rotation taking unit vector `from` onto unit vector `to`.
fn rotation_onto<T: Scalar>(from: &Point3<T>, to: &Point3<T>) -> Result<Matrix3<T>> {
    let axis = from.cross(to);
    let cos = from.dot(to).max(-T::one()).min(T::one());
    if axis.length() <= T::TOLERANCE {
        if cos > T::zero() {
            return Ok(Matrix3::identity());
        }
        // Opposite directions: half turn about any perpendicular.
        let helper = if from.x.abs() < lit(0.9) {
            Point3::unit_x()
        } else {
            Point3::unit_y()
        };
        return Matrix3::axis_rotation(&from.cross(&helper), lit(180.0));
    }
    Matrix3::axis_rotation(&axis, to_degrees(cos.acos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn close(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        a.is_tolerant(b, 1e-9)
    }

    #[test]
    fn test_rotation_about_z() {
        let m = Matrix4::rotation(&Point3::unit_z(), 90.0).unwrap();
        assert!(close(&(m * Point3::new(1.0, 0.0, 0.0)), &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotation_about_base_point() {
        let m = Matrix4::rotation_about(&Point3::unit_z(), &Point3::new(1.0, 1.0, 0.0), 180.0)
            .unwrap();
        assert!(close(&(m * Point3::zero()), &Point3::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_rotation_between() {
        let t = Point3::new(0.0, 0.0, 5.0);
        let m = Matrix4::rotation_between(&Point3::unit_y(), &Point3::unit_x(), &t).unwrap();
        assert!(close(&(m * Point3::new(2.0, 0.0, 0.0)), &Point3::new(0.0, 2.0, 5.0)));
        let flip = Matrix4::rotation_between(&-Point3::unit_x(), &Point3::unit_x(), &Point3::zero())
            .unwrap();
        assert!(close(&(flip * Point3::unit_x()), &-Point3::unit_x()));
    }

    #[test]
    fn test_rotation_2d_about_point() {
        let m = Matrix3::rotation_2d_about(&Point2::new(1.0, 0.0), 90.0);
        let p = m * Point2::new(2.0, 0.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_rotations() {
        let p = Point3::new(0.0, 1.0, 0.0);
        assert!(close(&(Matrix3::rotation_x(90.0) * p), &Point3::new(0.0, 0.0, 1.0)));
        let q = Point3::new(0.0, 0.0, 1.0);
        assert!(close(&(Matrix3::rotation_y(90.0) * q), &Point3::new(1.0, 0.0, 0.0)));
        let r = Point3::new(1.0, 0.0, 0.0);
        assert!(close(&(Matrix3::rotation_z(90.0) * r), &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_mirror() {
        let m = Matrix4::mirror_about(&Point3::unit_z(), &Point3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(close(&(m * Point3::new(3.0, 4.0, 0.0)), &Point3::new(3.0, 4.0, 2.0)));
        let m2 = Matrix3::mirror_2d(&Point2::new(1.0, 0.0)).unwrap();
        let p = m2 * Point2::new(2.0, 3.0);
        assert_relative_eq!(p.x, -2.0);
        assert_relative_eq!(p.y, 3.0);
        assert!(Matrix4::mirror(&Point3::<f64>::zero()).is_err());
    }

    #[test]
    fn test_compose_decompose() {
        let m = Matrix4::compose(10.0, 20.0, 30.0, &Point3::new(1.0, 2.0, 3.0), 2);
        let (x, y, z) = m.decompose_rotations();
        assert_relative_eq!(x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(y, 20.0, epsilon = 1e-9);
        assert_relative_eq!(z, 30.0, epsilon = 1e-9);
        assert_eq!(m.translation_part(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_compose_rounds_angles() {
        let a = Matrix4::compose(10.004, 0.0, 0.0, &Point3::zero(), 2);
        let b = Matrix4::compose(10.0, 0.0, 0.0, &Point3::zero(), 2);
        assert!(a.approx_eq(&b, 1e-15));
    }

    #[test]
    fn test_map_2d() {
        let m = Matrix3::map_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(1.0, 3.0),
            &Point2::new(-1.0, 1.0),
        )
        .unwrap();
        let p = m * Point2::new(1.0, 0.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
        let collinear = Matrix3::map_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
        );
        assert!(collinear.is_err());
    }

    #[test]
    fn test_intermediary_transforms() {
        let start = Matrix4::<f64>::identity();
        let end = Matrix4::rotation(&Point3::unit_z(), 90.0).unwrap()
            * Matrix4::translation(&Point3::new(0.0, 0.0, 0.0));
        let end = Matrix4::translation(&Point3::new(4.0, 0.0, 0.0)) * end;
        let steps = Matrix4::intermediary_transforms(&start, &end, 2).unwrap();
        assert_eq!(steps.len(), 3);
        let mid = steps[1];
        assert!(close(&mid.translation_part(), &Point3::new(2.0, 0.0, 0.0)));
        let (_, _, z) = mid.decompose_rotations();
        assert_relative_eq!(z, 45.0, epsilon = 1e-9);
        assert!(Matrix4::intermediary_transforms(&start, &end, 0).is_err());
    }

    #[test]
    fn test_rotation_to_vertical() {
        let dir = Point3::new(1.0, 1.0, 1.0);
        let (fwd, inv) = Matrix4::rotation_to_vertical(&dir).unwrap();
        let up = fwd * dir.normalized().unwrap();
        assert!(close(&up, &Point3::unit_z()));
        assert!(close(&(inv * up), &dir.normalized().unwrap()));
    }

    #[test]
    fn test_orthogonal_frame_roundtrip() {
        let origin = Point3::new(1.0, 2.0, 3.0);
        let (i, j, k) = (Point3::unit_y(), Point3::unit_z(), Point3::unit_x());
        let (mv, rot) = Matrix4::orthogonal_frame(&origin, &i, &j, &k, true).unwrap();
        let local = (rot * mv) * Point3::new(1.0, 3.0, 3.0);
        assert!(close(&local, &Point3::new(1.0, 0.0, 0.0)));
        let (mv_back, rot_back) = Matrix4::orthogonal_frame(&origin, &i, &j, &k, false).unwrap();
        assert!(close(&((mv_back * rot_back) * local), &Point3::new(1.0, 3.0, 3.0)));
    }
}
