//! Scalar abstraction over `f32` and `f64` plus tolerance helpers.

use std::fmt;

use nalgebra::RealField;

/// Floating point type usable as a coordinate.
///
/// Implemented for `f32` and `f64`. The associated constants mirror the
/// precision each type can hold reliably.
pub trait Scalar: RealField + Copy + Default + fmt::Debug + fmt::Display {
    /// Default comparison tolerance for this precision.
    const TOLERANCE: Self;
    /// Largest magnitude accepted as a finite coordinate.
    const MAX_MAGNITUDE: Self;

    /// Widen to `f64`.
    fn as_f64(self) -> f64;

    /// Narrow to `f32`.
    fn as_f32(self) -> f32;
}

impl Scalar for f64 {
    const TOLERANCE: f64 = 1e-12;
    const MAX_MAGNITUDE: f64 = 1e308;

    fn as_f64(self) -> f64 {
        self
    }

    #[allow(clippy::cast_possible_truncation)]
    fn as_f32(self) -> f32 {
        self as f32
    }
}

impl Scalar for f32 {
    const TOLERANCE: f32 = 1e-6;
    const MAX_MAGNITUDE: f32 = 3e38;

    fn as_f64(self) -> f64 {
        f64::from(self)
    }

    fn as_f32(self) -> f32 {
        self
    }
}

/// Convert an `f64` constant into `T`.
pub fn lit<T: Scalar>(v: f64) -> T {
    nalgebra::convert(v)
}

/// Degrees to radians.
pub fn to_radians<T: Scalar>(degrees: T) -> T {
    degrees * T::pi() / lit(180.0)
}

/// Radians to degrees.
pub fn to_degrees<T: Scalar>(radians: T) -> T {
    radians * lit(180.0) / T::pi()
}

/// Cosine of an angle given in degrees.
///
/// Multiples of 90 degrees are exact so that quadrant points of arcs do
/// not pick up rounding noise.
pub fn cos_deg<T: Scalar>(degrees: T) -> T {
    sin_deg(degrees + lit(90.0))
}

/// Sine of an angle given in degrees.
pub fn sin_deg<T: Scalar>(degrees: T) -> T {
    let quarter: T = lit(90.0);
    let turns = degrees / quarter;
    if turns == turns.round() {
        let q = (turns.as_f64().rem_euclid(4.0)) as i32;
        return match q {
            0 | 2 => T::zero(),
            1 => T::one(),
            _ => -T::one(),
        };
    }
    to_radians(degrees).sin()
}

/// Map an angle in degrees into `[0, 360)`.
pub fn normalize_degrees<T: Scalar>(degrees: T) -> T {
    let full: T = lit(360.0);
    let mut a = degrees % full;
    if a < T::zero() {
        a += full;
    }
    a
}

/// Absolute and scale-relative comparison tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<T = f64> {
    /// Linear distance tolerance.
    pub linear: T,
    /// Angular tolerance in degrees.
    pub angular: T,
}

impl<T: Scalar> Tolerance<T> {
    /// Tolerances derived from the scalar precision.
    pub fn new() -> Self {
        Self {
            linear: T::TOLERANCE,
            angular: T::TOLERANCE,
        }
    }

    /// Tolerance grown with the magnitude of the geometry it guards.
    ///
    /// Returns `max(TOLERANCE * (1 + scale), provided)`.
    pub fn scaled(scale: T, provided: T) -> T {
        (T::TOLERANCE * (T::one() + scale)).max(provided)
    }

    /// `|d| <= linear`.
    pub fn is_zero(&self, d: T) -> bool {
        d.abs() <= self.linear
    }

    /// `|a - b| <= linear`.
    pub fn is_eq(&self, a: T, b: T) -> bool {
        (a - b).abs() <= self.linear
    }

    /// Check if two angles in degrees are effectively equal.
    pub fn angles_equal(&self, a: T, b: T) -> bool {
        (a - b).abs() <= self.angular
    }
}

impl<T: Scalar> Default for Tolerance<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// `|a - b| <= tol`.
pub fn is_eq<T: Scalar>(a: T, b: T, tol: T) -> bool {
    (a - b).abs() <= tol
}

/// `|v| <= tol`.
pub fn is_zero<T: Scalar>(v: T, tol: T) -> bool {
    v.abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadrant_trig_is_exact() {
        assert_eq!(cos_deg(90.0_f64), 0.0);
        assert_eq!(sin_deg(180.0_f64), 0.0);
        assert_eq!(sin_deg(270.0_f64), -1.0);
        assert_eq!(cos_deg(-180.0_f64), -1.0);
        assert_relative_eq!(sin_deg(30.0_f64), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_relative_eq!(normalize_degrees(-90.0_f64), 270.0);
        assert_relative_eq!(normalize_degrees(450.0_f64), 90.0);
        assert_relative_eq!(normalize_degrees(360.0_f64), 0.0);
    }

    #[test]
    fn test_scaled_tolerance() {
        assert_relative_eq!(Tolerance::<f64>::scaled(9.0, 0.0), 1e-11, epsilon = 1e-20);
        assert_relative_eq!(Tolerance::<f64>::scaled(9.0, 1e-3), 1e-3);
    }

    #[test]
    fn test_precision_constants() {
        assert_eq!(<f32 as Scalar>::TOLERANCE, 1e-6);
        assert_eq!(<f64 as Scalar>::MAX_MAGNITUDE, 1e308);
        let t = Tolerance::<f64>::default();
        assert!(t.is_zero(1e-13));
        assert!(!t.is_eq(1.0, 1.0 + 1e-9));
    }
}
