//! # lathe_math - Geometry primitives
//!
//! Value types used by the scene graph and the manipulation tools:
//! vectors, quaternions, 4x4 matrices, transforms, rays and planes.
//! Everything here is `Copy` and free of shared state.

pub mod vector;
pub mod quaternion;
pub mod matrix;
pub mod transform;
pub mod ray;
pub mod plane;

pub use vector::*;
pub use quaternion::*;
pub use matrix::*;
pub use transform::*;
pub use ray::*;
pub use plane::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    /// Threshold below which a denominator is treated as zero
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Sign of `value` as `1.0`, `-1.0` or `0.0`.
///
/// Unlike [`f32::signum`], an exact zero (of either sign) and NaN map to `0.0`,
/// so `signum_or_zero(x) * magnitude` never yields NaN for finite magnitudes.
#[inline]
pub fn signum_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Approximate float equality with an absolute tolerance
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

/// Snap `value` to the nearest multiple of `step`; a non-positive step disables snapping.
#[inline]
pub fn snap(value: f32, step: f32) -> f32 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

pub mod prelude {
    pub use crate::vector::{Vec3, Vec4};
    pub use crate::quaternion::Quat;
    pub use crate::matrix::Mat4;
    pub use crate::transform::Transform;
    pub use crate::ray::Ray;
    pub use crate::plane::Plane;
    pub use crate::{radians, degrees, signum_or_zero, approx_eq, snap};
}
