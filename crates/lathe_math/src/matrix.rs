//! 4x4 transformation matrix

use crate::quaternion::Quat;
use crate::vector::{Vec3, Vec4};
use core::ops::{Mul, MulAssign};

/// 4x4 matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, translation.extend(1.0))
    }

    /// Rotation matrix from a quaternion
    pub fn from_quat(q: Quat) -> Self {
        let x2 = q.x + q.x;
        let y2 = q.y + q.y;
        let z2 = q.z + q.z;

        let xx = q.x * x2;
        let xy = q.x * y2;
        let xz = q.x * z2;
        let yy = q.y * y2;
        let yz = q.y * z2;
        let zz = q.z * z2;
        let wx = q.w * x2;
        let wy = q.w * y2;
        let wz = q.w * z2;

        Self::from_cols(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    /// `T * R * S`
    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        let r = Self::from_quat(rotation);
        Self::from_cols(
            r.cols[0] * scale.x,
            r.cols[1] * scale.y,
            r.cols[2] * scale.z,
            translation.extend(1.0),
        )
    }

    /// Translation component
    #[inline]
    pub fn get_translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Transform a point (w=1)
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let v = *self * point.extend(1.0);
        if v.w != 0.0 && v.w != 1.0 {
            v.truncate() / v.w
        } else {
            v.truncate()
        }
    }

    /// Transform a direction (w=0)
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        (*self * vector.extend(0.0)).truncate()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
