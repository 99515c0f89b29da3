//! Helical sweeps.

use std::cell::OnceCell;

use camsim_math::{cos_deg, lit, sin_deg, to_radians, BoundingBox3d, Point3, Scalar, Tolerance};

use crate::arc::angular_extent;
use crate::error::{GeomError, Result};

/// Helix around an axis through `center` along `normal`.
///
/// The start point is `center + start_vector`. Over the sweep the point
/// turns around the normal, rises by `height` and its radius grows by the
/// factor `1 + radius_change`.
#[derive(Debug, Clone)]
pub struct Helix<T = f64> {
    center: Point3<T>,
    start_vector: Point3<T>,
    normal: Point3<T>,
    sweep_angle: T,
    height: T,
    radius_change: T,
    bbox: OnceCell<BoundingBox3d<T>>,
}

/// Unit normal, checked against the start vector.
fn validated_normal<T: Scalar>(
    center: &Point3<T>,
    start_vector: &Point3<T>,
    normal: &Point3<T>,
) -> Result<Point3<T>> {
    let n = normal
        .normalized()
        .map_err(|_| GeomError::invalid_helix("normal is a null vector"))?;
    let scale = center.max_abs_coord() + start_vector.length();
    if start_vector.dot(&n).abs() > Tolerance::scaled(scale, T::zero()) {
        return Err(GeomError::invalid_helix(
            "start point is not in the same plane as the center point",
        ));
    }
    Ok(n)
}

impl<T: Scalar> Helix<T> {
    /// Helix from its defining parameters. The sweep is in degrees.
    pub fn new(
        center: Point3<T>,
        start_vector: Point3<T>,
        normal: Point3<T>,
        sweep_angle: T,
        height: T,
        radius_change: T,
    ) -> Result<Self> {
        let normal = validated_normal(&center, &start_vector, &normal)?;
        Ok(Self {
            center,
            start_vector,
            normal,
            sweep_angle,
            height,
            radius_change,
            bbox: OnceCell::new(),
        })
    }

    /// Axis point at the start height.
    pub fn center(&self) -> Point3<T> {
        self.center
    }

    /// Vector from the center to the start point.
    pub fn start_vector(&self) -> Point3<T> {
        self.start_vector
    }

    /// Unit axis direction.
    pub fn normal(&self) -> Point3<T> {
        self.normal
    }

    /// Sweep in degrees.
    pub fn sweep_angle(&self) -> T {
        self.sweep_angle
    }

    /// Rise along the normal over the whole sweep.
    pub fn height(&self) -> T {
        self.height
    }

    /// Relative radius growth over the whole sweep.
    pub fn radius_change(&self) -> T {
        self.radius_change
    }

    /// Start radius.
    pub fn radius(&self) -> T {
        self.start_vector.length()
    }

    /// Rise per full turn. Zero for a zero sweep.
    pub fn pitch(&self) -> T {
        if self.sweep_angle == T::zero() {
            return T::zero();
        }
        self.height * (lit::<T>(360.0) / self.sweep_angle).abs()
    }

    /// Move the axis.
    pub fn set_center(&mut self, center: Point3<T>) {
        self.center = center;
        self.bbox = OnceCell::new();
    }

    /// Replace the start vector. Fails if it leaves the plane of the normal.
    pub fn set_start_vector(&mut self, start_vector: Point3<T>) -> Result<()> {
        self.normal = validated_normal(&self.center, &start_vector, &self.normal)?;
        self.start_vector = start_vector;
        self.bbox = OnceCell::new();
        Ok(())
    }

    /// Replace the normal. Fails if the start vector is not orthogonal to it.
    pub fn set_normal(&mut self, normal: Point3<T>) -> Result<()> {
        self.normal = validated_normal(&self.center, &self.start_vector, &normal)?;
        self.bbox = OnceCell::new();
        Ok(())
    }

    /// Replace the sweep.
    pub fn set_sweep_angle(&mut self, sweep_angle: T) {
        self.sweep_angle = sweep_angle;
        self.bbox = OnceCell::new();
    }

    /// Replace the height.
    pub fn set_height(&mut self, height: T) {
        self.height = height;
        self.bbox = OnceCell::new();
    }

    /// Replace the radius change.
    pub fn set_radius_change(&mut self, radius_change: T) {
        self.radius_change = radius_change;
        self.bbox = OnceCell::new();
    }

    fn rotated_start(&self, angle: T) -> Point3<T> {
        let (c, s) = (cos_deg(angle), sin_deg(angle));
        let v = self.start_vector;
        let n = self.normal;
        v * c + n.cross(&v) * s + n * (n.dot(&v) * (T::one() - c))
    }

    /// Point at parameter `t` in `[0, 1]` along the sweep.
    pub fn point_at(&self, t: T) -> Point3<T> {
        let v = self.rotated_start(self.sweep_angle * t);
        self.center + v * (T::one() + self.radius_change * t) + self.normal * (self.height * t)
    }

    /// `center + start_vector`.
    pub fn start_point(&self) -> Point3<T> {
        self.center + self.start_vector
    }

    /// Point after the full sweep.
    pub fn end_point(&self) -> Point3<T> {
        self.point_at(T::one())
    }

    /// Length from pitch and circumference; radius change is not included.
    pub fn length(&self) -> T {
        if self.sweep_angle == T::zero() {
            return self.height.abs();
        }
        let pitch = self.pitch();
        let circumference = T::two_pi() * self.radius();
        (pitch * pitch + circumference * circumference).sqrt()
            * (self.sweep_angle / lit(360.0)).abs()
    }

    /// Conservative box: the swept circle extremes at both radii, lifted
    /// over the full height.
    pub fn bounding_box(&self) -> BoundingBox3d<T> {
        *self.bbox.get_or_init(|| {
            let s = self.start_vector.to_array();
            let o = self.normal.cross(&self.start_vector).to_array();
            let n = self.normal.to_array();
            let c = self.center.to_array();
            let sweep = to_radians(self.sweep_angle);
            let (a0, a1) = (sweep.min(T::zero()), sweep.max(T::zero()));
            let grown = T::one() + self.radius_change;
            let mut lo = [T::zero(); 3];
            let mut hi = [T::zero(); 3];
            for i in 0..3 {
                let (gmin, gmax) = angular_extent(s[i], o[i], a0, a1);
                let candidates = [gmin, gmin * grown, gmax, gmax * grown];
                let mut pmin = candidates[0];
                let mut pmax = candidates[0];
                for v in candidates {
                    pmin = pmin.min(v);
                    pmax = pmax.max(v);
                }
                let lift = n[i] * self.height;
                lo[i] = c[i] + pmin + lift.min(T::zero());
                hi[i] = c[i] + pmax + lift.max(T::zero());
            }
            let mut bb = BoundingBox3d::from_corners(&lo.into(), &hi.into());
            bb.enlarge_for_point(&self.start_point());
            bb.enlarge_for_point(&self.end_point());
            bb
        })
    }

    /// Run the same helix from its end back to its start.
    pub fn reverse(&mut self) {
        let end = self.end_point();
        self.center += self.normal * self.height;
        self.start_vector = end - self.center;
        self.normal = -self.normal;
        let grown = T::one() + self.radius_change;
        if grown != T::zero() {
            self.radius_change = T::one() / grown - T::one();
        }
    }
}

impl<T: Scalar> PartialEq for Helix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
            && self.start_vector == other.start_vector
            && self.normal == other.normal
            && self.sweep_angle == other.sweep_angle
            && self.height == other.height
            && self.radius_change == other.radius_change
    }
}
