//! 3D ray for picking and drag-plane intersection

use crate::vector::Vec3;

/// Ray with an origin and a direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction; not required to be unit length
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is kept as given.
    #[inline]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from `start` towards `end` with a normalized direction
    #[inline]
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::new(start, (end - start).normalize())
    }

    /// Point at parameter `t`: `origin + t * direction`
    #[inline]
    pub fn point_along_ray(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Check if the ray direction is usable (non-zero length)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > 1e-10
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_along_ray() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.point_along_ray(1.5), Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn test_from_points_normalizes() {
        let ray = Ray::from_points(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_direction_is_invalid() {
        assert!(!Ray::new(Vec3::ONE, Vec3::ZERO).is_valid());
    }
}
