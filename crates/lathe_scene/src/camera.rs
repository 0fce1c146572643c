//! Camera collaborator: turns screen coordinates into world-space rays.

use lathe_math::{Ray, Vec3};

/// Anything that can unproject a screen coordinate into a world ray.
pub trait Camera {
    /// World-space ray through screen coordinate `(x, y)`.
    fn get_ray(&self, x: f32, y: f32) -> Ray;
}

/// Parallel-projection camera with a fixed screen-to-world mapping.
///
/// Screen `(x, y)` maps to the ray starting at `eye + right * x * scale +
/// up * y * scale` travelling along `forward`. Used by headless drivers and
/// tests where a real projection is not available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedCamera {
    pub eye: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
    /// World units per screen unit
    pub scale: f32,
}

impl FixedCamera {
    pub fn new(eye: Vec3, right: Vec3, up: Vec3, forward: Vec3) -> Self {
        Self {
            eye,
            right: right.normalize(),
            up: up.normalize(),
            forward: forward.normalize(),
            scale: 1.0,
        }
    }

    /// Looking straight down from `height`: screen x → world X, screen y → world Z.
    pub fn top_down(height: f32) -> Self {
        Self::new(Vec3::new(0.0, height, 0.0), Vec3::X, Vec3::Z, Vec3::new(0.0, -1.0, 0.0))
    }

    /// Looking along -Z from `distance`: screen x → world X, screen y → world Y.
    pub fn front(distance: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, distance), Vec3::X, Vec3::Y, Vec3::new(0.0, 0.0, -1.0))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Camera for FixedCamera {
    fn get_ray(&self, x: f32, y: f32) -> Ray {
        let origin = self.eye + self.right * (x * self.scale) + self.up * (y * self.scale);
        Ray::new(origin, self.forward)
    }
}
