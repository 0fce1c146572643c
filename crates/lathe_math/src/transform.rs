//! Local transform of a scene node

use crate::consts::EPSILON;
use crate::matrix::Mat4;
use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Position, rotation and scale relative to a parent
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    #[inline]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotate about `axis` (in the parent frame) through the node origin.
    pub fn rotate_around_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Multiply the scale component-wise by `factor`.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale = self.scale.mul_elementwise(factor);
    }

    /// Map a direction from the parent frame back into this transform's
    /// frame. `None` when a scale component is zero.
    pub fn inverse_transform_vector(&self, vector: Vec3) -> Option<Vec3> {
        let s = self.scale;
        if s.x.abs() < EPSILON || s.y.abs() < EPSILON || s.z.abs() < EPSILON {
            return None;
        }
        let v = self.rotation.inverse().rotate(vector);
        Some(Vec3::new(v.x / s.x, v.y / s.y, v.z / s.z))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
