//! Circular arcs in the plane and in space.
//!
//! Start/end points and bounding boxes are derived from the defining
//! parameters and cached; every setter clears the caches. Reversal is O(1):
//! the 2D arc flips a flag and swaps its cached endpoints, the 3D arc swaps
//! its vectors and negates the normal.

use std::cell::OnceCell;

use camsim_math::{
    cos_deg, lit, normalize_degrees, sin_deg, to_degrees, to_radians, BoundingBox2d,
    BoundingBox3d, MathError, Point2, Point3, Scalar, Tolerance,
};

use crate::error::{GeomError, Result};

/// Extremes of `s * cos(a) + o * sin(a)` for `a` in `[a0, a1]` (radians).
pub(crate) fn angular_extent<T: Scalar>(s: T, o: T, a0: T, a1: T) -> (T, T) {
    let f = |a: T| s * a.cos() + o * a.sin();
    let (f0, f1) = (f(a0), f(a1));
    let (mut lo, mut hi) = (f0.min(f1), f0.max(f1));
    let peak = o.atan2(s);
    let pi = T::pi();
    let mut k = ((a0 - peak) / pi).floor();
    loop {
        let a = peak + k * pi;
        if a > a1 {
            break;
        }
        if a >= a0 {
            let v = f(a);
            lo = lo.min(v);
            hi = hi.max(v);
        }
        k += T::one();
    }
    (lo, hi)
}

fn check_range<T: Scalar>(name: &'static str, value: T, min: f64, max: f64) -> Result<()> {
    if !(value >= lit(min) && value <= lit(max)) {
        return Err(MathError::out_of_range(name, value.as_f64(), min, max).into());
    }
    Ok(())
}

// =============================================================================
// 2D arc
// =============================================================================

/// Arc given by center, radius, start angle and sweep (degrees).
///
/// A negative sweep runs clockwise. The start angle is kept in `[0, 360]`
/// and the sweep in `[-360, 360]`.
#[derive(Debug, Clone)]
pub struct Arc2d<T = f64> {
    center: Point2<T>,
    radius: T,
    start_angle: T,
    sweep_angle: T,
    reversed: bool,
    start: OnceCell<Point2<T>>,
    end: OnceCell<Point2<T>>,
    bbox: OnceCell<BoundingBox2d<T>>,
}

impl<T: Scalar> Arc2d<T> {
    /// Arc from center, radius, start angle and sweep angle.
    pub fn new(center: Point2<T>, radius: T, start_angle: T, sweep_angle: T) -> Result<Self> {
        check_range("radius", radius, 0.0, f64::MAX)?;
        check_range("start angle", start_angle, 0.0, 360.0)?;
        check_range("sweep angle", sweep_angle, -360.0, 360.0)?;
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep_angle,
            reversed: false,
            start: OnceCell::new(),
            end: OnceCell::new(),
            bbox: OnceCell::new(),
        })
    }

    /// Arc around `center` from `start` to `end`.
    ///
    /// Both points must be equidistant from the center within a tolerance
    /// scaled by the magnitude of the inputs. Coincident start and end give
    /// a full circle.
    pub fn from_center_points(
        center: Point2<T>,
        start: Point2<T>,
        end: Point2<T>,
        clockwise: bool,
    ) -> Result<Self> {
        let r0 = center.distance(&start);
        let r1 = center.distance(&end);
        let max_abs = |p: &Point2<T>| p.x.abs().max(p.y.abs());
        let scale = r0 + r1 + max_abs(&start) + max_abs(&end) + max_abs(&center);
        if (r0 - r1).abs() > Tolerance::scaled(scale, T::zero()) {
            return Err(GeomError::invalid_arc(format!(
                "start radius {r0} differs from end radius {r1}"
            )));
        }
        let a0 = (start - center).angle_from_x_axis();
        let a1 = (end - center).angle_from_x_axis();
        let full: T = lit(360.0);
        let mut sweep = a1 - a0;
        if clockwise {
            if sweep >= T::zero() {
                sweep -= full;
            }
        } else if sweep <= T::zero() {
            sweep += full;
        }
        Self::new(center, (r0 + r1) * lit(0.5), a0, sweep)
    }

    fn clear_cache(&mut self) {
        self.start = OnceCell::new();
        self.end = OnceCell::new();
        self.bbox = OnceCell::new();
    }

    /// Fold the reversed flag into the stored angles.
    fn unreverse(&mut self) {
        if self.reversed {
            let (start, sweep) = (self.start_angle(), self.sweep_angle());
            self.start_angle = start;
            self.sweep_angle = sweep;
            self.reversed = false;
        }
        self.clear_cache();
    }

    /// Center.
    pub fn center(&self) -> Point2<T> {
        self.center
    }

    /// Radius.
    pub fn radius(&self) -> T {
        self.radius
    }

    /// Whether [`reverse`](Self::reverse) has been applied an odd number of times.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Geometric start angle in degrees.
    pub fn start_angle(&self) -> T {
        if self.reversed {
            normalize_degrees(self.start_angle + self.sweep_angle)
        } else {
            self.start_angle
        }
    }

    /// Geometric sweep in degrees, negative when clockwise.
    pub fn sweep_angle(&self) -> T {
        if self.reversed {
            -self.sweep_angle
        } else {
            self.sweep_angle
        }
    }

    /// Geometric end angle in degrees, in `[0, 360)`.
    pub fn end_angle(&self) -> T {
        normalize_degrees(self.start_angle() + self.sweep_angle())
    }

    /// Runs clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.sweep_angle() < T::zero()
    }

    /// Move the center.
    pub fn set_center(&mut self, center: Point2<T>) {
        self.unreverse();
        self.center = center;
    }

    /// Change the radius. Fails on a negative value.
    pub fn set_radius(&mut self, radius: T) -> Result<()> {
        check_range("radius", radius, 0.0, f64::MAX)?;
        self.unreverse();
        self.radius = radius;
        Ok(())
    }

    /// Change the start angle. Fails outside `[0, 360]`.
    pub fn set_start_angle(&mut self, angle: T) -> Result<()> {
        check_range("start angle", angle, 0.0, 360.0)?;
        self.unreverse();
        self.start_angle = angle;
        Ok(())
    }

    /// Change the sweep. Fails outside `[-360, 360]`.
    pub fn set_sweep_angle(&mut self, angle: T) -> Result<()> {
        check_range("sweep angle", angle, -360.0, 360.0)?;
        self.unreverse();
        self.sweep_angle = angle;
        Ok(())
    }

    /// Point on the full circle at `angle` degrees.
    pub fn point_at_angle(&self, angle: T) -> Point2<T> {
        self.center + Point2::new(cos_deg(angle), sin_deg(angle)) * self.radius
    }

    /// First point along the arc direction.
    pub fn start_point(&self) -> Point2<T> {
        *self.start.get_or_init(|| {
            let full = self.sweep_angle.abs() == lit(360.0);
            let offset = if self.reversed && !full {
                self.sweep_angle
            } else {
                T::zero()
            };
            self.point_at_angle(self.start_angle + offset)
        })
    }

    /// Last point along the arc direction.
    pub fn end_point(&self) -> Point2<T> {
        *self.end.get_or_init(|| {
            let full = self.sweep_angle.abs() == lit(360.0);
            let offset = if !self.reversed && !full {
                self.sweep_angle
            } else {
                T::zero()
            };
            self.point_at_angle(self.start_angle + offset)
        })
    }

    /// Point halfway along the sweep.
    pub fn mid_point(&self) -> Point2<T> {
        self.point_at_angle(self.start_angle() + self.sweep_angle() * lit(0.5))
    }

    /// Arc length.
    pub fn length(&self) -> T {
        to_radians(self.radius * self.sweep_angle.abs())
    }

    /// Distance between the endpoints.
    pub fn chord_length(&self) -> T {
        self.start_point().distance(&self.end_point())
    }

    /// Tight box: endpoints plus every quadrant point inside the sweep.
    pub fn bounding_box(&self) -> BoundingBox2d<T> {
        *self.bbox.get_or_init(|| {
            let a0 = self.start_angle();
            let a1 = a0 + self.sweep_angle();
            let (lo, hi) = (a0.min(a1), a0.max(a1));
            let mut bb = BoundingBox2d::new();
            bb.enlarge_for_point(&self.start_point());
            bb.enlarge_for_point(&self.end_point());
            for k in -4..=8 {
                let quadrant: T = lit(f64::from(k) * 90.0);
                if quadrant > lo && quadrant < hi {
                    bb.enlarge_for_point(&self.point_at_angle(quadrant));
                }
            }
            bb
        })
    }

    /// Flip direction. Cached endpoints are swapped, not recomputed.
    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
        std::mem::swap(&mut self.start, &mut self.end);
    }
}

impl<T: Scalar> PartialEq for Arc2d<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start_angle() == other.start_angle()
            && self.sweep_angle() == other.sweep_angle()
            && self.radius == other.radius
            && self.center == other.center
    }
}

// =============================================================================
// 3D arc
// =============================================================================

/// Arc in space given by center, start and end vectors, and a normal.
///
/// The arc runs counter-clockwise around the normal from
/// `center + start_vector` to `center + end_vector`.
#[derive(Debug, Clone)]
pub struct Arc3d<T = f64> {
    center: Point3<T>,
    start_vector: Point3<T>,
    end_vector: Point3<T>,
    normal: Point3<T>,
    radius: T,
    sweep_angle: T,
    bbox: OnceCell<BoundingBox3d<T>>,
}

impl<T: Scalar> Arc3d<T> {
    /// Arc with the default tolerance on the start/end radius mismatch.
    pub fn new(
        center: Point3<T>,
        start_vector: Point3<T>,
        end_vector: Point3<T>,
        normal: Point3<T>,
    ) -> Result<Self> {
        Self::with_tolerance(center, start_vector, end_vector, normal, T::zero())
    }

    /// Arc allowing `|start| - |end|` up to `max(scaled tolerance, tolerance)`.
    pub fn with_tolerance(
        center: Point3<T>,
        start_vector: Point3<T>,
        end_vector: Point3<T>,
        normal: Point3<T>,
        tolerance: T,
    ) -> Result<Self> {
        let normal = normal
            .normalized()
            .map_err(|_| GeomError::invalid_arc("normal is a null vector"))?;
        let radius = start_vector.length();
        let end_radius = end_vector.length();
        let scale = center.max_abs_coord() + radius;
        if (radius - end_radius).abs() > Tolerance::scaled(scale, tolerance) {
            return Err(GeomError::invalid_arc(format!(
                "start radius {radius} differs from end radius {end_radius}"
            )));
        }
        let cross = start_vector.cross(&end_vector);
        let mut sweep = to_degrees(cross.length().atan2(start_vector.dot(&end_vector)));
        if normal.dot(&cross) < T::zero() {
            sweep = lit::<T>(360.0) - sweep;
        }
        if sweep <= T::TOLERANCE {
            sweep = lit(360.0);
        }
        Ok(Self {
            center,
            start_vector,
            end_vector,
            normal,
            radius,
            sweep_angle: sweep,
            bbox: OnceCell::new(),
        })
    }

    /// Center.
    pub fn center(&self) -> Point3<T> {
        self.center
    }

    /// Radius (length of the start vector).
    pub fn radius(&self) -> T {
        self.radius
    }

    /// Sweep in degrees, in `(0, 360]`.
    pub fn sweep_angle(&self) -> T {
        self.sweep_angle
    }

    /// Vector from the center to the start point.
    pub fn start_vector(&self) -> Point3<T> {
        self.start_vector
    }

    /// Vector from the center to the end point.
    pub fn end_vector(&self) -> Point3<T> {
        self.end_vector
    }

    /// Unit normal of the arc plane.
    pub fn normal(&self) -> Point3<T> {
        self.normal
    }

    /// `center + start_vector`.
    pub fn start_point(&self) -> Point3<T> {
        self.center + self.start_vector
    }

    /// `center + end_vector`.
    pub fn end_point(&self) -> Point3<T> {
        self.center + self.end_vector
    }

    /// Point reached after turning `angle` degrees from the start.
    pub fn point_at_angle(&self, angle: T) -> Point3<T> {
        let ortho = self.normal.cross(&self.start_vector);
        self.center + self.start_vector * cos_deg(angle) + ortho * sin_deg(angle)
    }

    /// Point halfway along the sweep.
    pub fn mid_point(&self) -> Point3<T> {
        self.point_at_angle(self.sweep_angle * lit(0.5))
    }

    /// Arc length.
    pub fn length(&self) -> T {
        to_radians(self.sweep_angle * self.radius)
    }

    /// Tight box from the per-axis extremes inside the sweep.
    pub fn bounding_box(&self) -> BoundingBox3d<T> {
        *self.bbox.get_or_init(|| {
            let ortho = self.normal.cross(&self.start_vector).to_array();
            let s = self.start_vector.to_array();
            let c = self.center.to_array();
            let sweep = to_radians(self.sweep_angle);
            let mut lo = [T::zero(); 3];
            let mut hi = [T::zero(); 3];
            for i in 0..3 {
                let (mn, mx) = angular_extent(s[i], ortho[i], T::zero(), sweep);
                lo[i] = c[i] + mn;
                hi[i] = c[i] + mx;
            }
            let mut bb = BoundingBox3d::from_corners(&lo.into(), &hi.into());
            bb.enlarge_for_point(&self.start_point());
            bb.enlarge_for_point(&self.end_point());
            bb
        })
    }

    /// Flip direction: swap the vectors and negate the normal.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start_vector, &mut self.end_vector);
        self.normal = -self.normal;
    }
}

impl<T: Scalar> PartialEq for Arc3d<T> {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
            && self.start_vector == other.start_vector
            && self.end_vector == other.end_vector
            && self.normal == other.normal
            && self.sweep_angle == other.sweep_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn close2(a: &Point2<f64>, b: &Point2<f64>) -> bool {
        a.is_tolerant(b, 1e-9)
    }

    fn close3(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        a.is_tolerant(b, 1e-9)
    }

    #[test]
    fn test_arc2d_endpoints() {
        let c = Point2::new(1.0, 2.0);
        let arc = Arc2d::new(c, 2.0, 30.0, 100.0).unwrap();
        let a = 30f64.to_radians();
        let b = 130f64.to_radians();
        assert!(close2(&arc.start_point(), &Point2::new(1.0 + 2.0 * a.cos(), 2.0 + 2.0 * a.sin())));
        assert!(close2(&arc.end_point(), &Point2::new(1.0 + 2.0 * b.cos(), 2.0 + 2.0 * b.sin())));
    }

    #[test]
    fn test_arc2d_range_checks() {
        assert!(Arc2d::new(Point2::zero(), -1.0, 0.0, 90.0).is_err());
        assert!(Arc2d::new(Point2::zero(), 1.0, 361.0, 90.0).is_err());
        assert!(Arc2d::new(Point2::zero(), 1.0, 0.0, -361.0).is_err());
        assert!(Arc2d::new(Point2::zero(), 1.0, 360.0, -360.0).is_ok());
    }

    #[test]
    fn test_arc2d_reverse_twice_restores() {
        let mut arc = Arc2d::new(Point2::zero(), 1.0, 10.0, 80.0).unwrap();
        let (s, e) = (arc.start_point(), arc.end_point());
        arc.reverse();
        assert!(close2(&arc.start_point(), &e));
        assert!(close2(&arc.end_point(), &s));
        assert_relative_eq!(arc.start_angle(), 90.0);
        assert_relative_eq!(arc.sweep_angle(), -80.0);
        assert!(arc.is_clockwise());
        arc.reverse();
        assert_eq!(arc.start_point(), s);
        assert_eq!(arc.end_point(), e);
    }

    #[test]
    fn test_arc2d_reverse_without_cache() {
        let mut arc = Arc2d::new(Point2::zero(), 1.0, 0.0, 90.0).unwrap();
        arc.reverse();
        assert!(close2(&arc.start_point(), &Point2::new(0.0, 1.0)));
        assert!(close2(&arc.end_point(), &Point2::new(1.0, 0.0)));
    }

    #[test]
    fn test_arc2d_setter_unreverses() {
        let mut arc = Arc2d::new(Point2::zero(), 1.0, 0.0, 90.0).unwrap();
        arc.reverse();
        arc.set_radius(2.0).unwrap();
        assert!(!arc.is_reversed());
        assert_relative_eq!(arc.start_angle(), 90.0);
        assert_relative_eq!(arc.sweep_angle(), -90.0);
        assert!(close2(&arc.end_point(), &Point2::new(2.0, 0.0)));
    }

    #[test]
    fn test_arc2d_bbox_includes_quadrant_points() {
        // 45..135 passes the top of the circle.
        let arc = Arc2d::new(Point2::zero(), 1.0, 45.0, 90.0).unwrap();
        let bb = arc.bounding_box();
        assert_relative_eq!(bb.max_corner().unwrap().y, 1.0);
        let h = 0.5f64.sqrt();
        assert_relative_eq!(bb.min_corner().unwrap().y, h, epsilon = 1e-12);
        assert_relative_eq!(bb.min_corner().unwrap().x, -h, epsilon = 1e-12);
    }

    #[test]
    fn test_arc2d_clockwise_bbox() {
        // From 10 degrees clockwise through 0 to 280.
        let arc = Arc2d::new(Point2::zero(), 1.0, 10.0, -90.0).unwrap();
        let bb = arc.bounding_box();
        assert_relative_eq!(bb.max_corner().unwrap().x, 1.0);
    }

    #[test]
    fn test_arc2d_full_circle_bbox() {
        let arc = Arc2d::new(Point2::new(5.0, 5.0), 2.0, 0.0, 360.0).unwrap();
        let bb = arc.bounding_box();
        assert!(close2(&bb.min_corner().unwrap(), &Point2::new(3.0, 3.0)));
        assert!(close2(&bb.max_corner().unwrap(), &Point2::new(7.0, 7.0)));
        assert_relative_eq!(arc.length(), 4.0 * std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_arc2d_from_center_points() {
        let c = Point2::zero();
        let ccw = Arc2d::from_center_points(c, Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), false)
            .unwrap();
        assert_relative_eq!(ccw.sweep_angle(), 90.0);
        let cw = Arc2d::from_center_points(c, Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), true)
            .unwrap();
        assert_relative_eq!(cw.sweep_angle(), -270.0);
        let bad = Arc2d::from_center_points(c, Point2::new(1.0, 0.0), Point2::new(0.0, 2.0), false);
        assert!(matches!(bad, Err(GeomError::InvalidArc(_))));
    }

    #[test]
    fn test_arc2d_equality_and_chord() {
        let a = Arc2d::new(Point2::zero(), 1.0, 0.0, 180.0).unwrap();
        let b = a.clone();
        assert_eq!(a, b);
        assert_relative_eq!(a.chord_length(), 2.0);
        assert!(close2(&a.mid_point(), &Point2::new(0.0, 1.0)));
    }

    #[test]
    fn test_arc3d_quarter() {
        let arc = Arc3d::new(
            Point3::zero(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::unit_z(),
        )
        .unwrap();
        assert_relative_eq!(arc.sweep_angle(), 90.0, epsilon = 1e-12);
        assert_relative_eq!(arc.length(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        let h = 0.5f64.sqrt();
        assert!(close3(&arc.mid_point(), &Point3::new(h, h, 0.0)));
    }

    #[test]
    fn test_arc3d_opposite_normal_takes_long_way() {
        let arc = Arc3d::new(
            Point3::zero(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            -Point3::unit_z(),
        )
        .unwrap();
        assert_relative_eq!(arc.sweep_angle(), 270.0, epsilon = 1e-12);
        let bb = arc.bounding_box();
        assert!(close3(&bb.min_corner().unwrap(), &Point3::new(-1.0, -1.0, 0.0)));
        assert!(close3(&bb.max_corner().unwrap(), &Point3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_arc3d_radius_mismatch() {
        let bad = Arc3d::new(
            Point3::zero(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.1, 0.0),
            Point3::unit_z(),
        );
        assert!(matches!(bad, Err(GeomError::InvalidArc(_))));
        let lenient = Arc3d::with_tolerance(
            Point3::zero(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.1, 0.0),
            Point3::unit_z(),
            0.2,
        );
        assert!(lenient.is_ok());
    }

    #[test]
    fn test_arc3d_reverse() {
        let mut arc = Arc3d::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::unit_x(),
        )
        .unwrap();
        let bb = arc.bounding_box();
        let mid = arc.mid_point();
        arc.reverse();
        assert!(close3(&arc.start_point(), &Point3::new(0.0, 0.0, 3.0)));
        assert!(close3(&arc.mid_point(), &mid));
        assert_eq!(arc.bounding_box(), bb);
    }

    #[test]
    fn test_angular_extent_full_turn() {
        let (lo, hi) = angular_extent(1.0, 0.0, 0.0, 2.0 * std::f64::consts::PI);
        assert_relative_eq!(lo, -1.0, epsilon = 1e-12);
        assert_relative_eq!(hi, 1.0, epsilon = 1e-12);
    }
}
