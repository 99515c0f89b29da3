#![warn(missing_docs)]

//! Math primitives for camsim.
//!
//! Points and vectors in 2D and 3D, fixed-size matrices, rotation
//! quaternions, axis-aligned bounding boxes and the transformation
//! factory. Everything is generic over a [`Scalar`] (`f32` or `f64`,
//! defaulting to `f64`). Angles in public APIs are in degrees.

mod bbox;
mod error;
mod matrix;
mod point;
mod quaternion;
mod scalar;
mod transform;

pub use bbox::{BoundingBox2d, BoundingBox3d};
pub use error::{MathError, Result};
pub use matrix::{Matrix, Matrix2, Matrix3, Matrix4};
pub use point::{Point2, Point3};
pub use quaternion::Quaternion;
pub use scalar::{
    cos_deg, is_eq, is_zero, lit, normalize_degrees, sin_deg, to_degrees, to_radians, Scalar,
    Tolerance,
};

/// Degrees to radians.
pub const D2R: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees.
pub const R2D: f64 = 180.0 / std::f64::consts::PI;
