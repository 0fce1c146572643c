//! Infinite plane used as the drag surface of manipulation tools

use crate::consts::EPSILON;
use crate::ray::Ray;
use crate::vector::Vec3;

/// Plane `normal · p = distance`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Plane normal (unit vector)
    pub normal: Vec3,
    /// Signed distance from the origin along `normal`
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal and a signed distance.
    ///
    /// The normal is normalized and the distance scaled to match. A zero
    /// normal yields the default `+Y` plane through the origin.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let len = normal.length();
        if len > 1e-10 {
            Self {
                normal: normal / len,
                distance: distance / len,
            }
        } else {
            Self::default()
        }
    }

    /// Plane through `point` with the given normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        if normal == Vec3::ZERO {
            return Self::default();
        }
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Signed distance from `point` to the plane; positive on the normal side
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.distance_to_point(point)
    }

    /// Parameter `t` at which `ray` crosses the plane.
    ///
    /// Returns `None` when the ray runs parallel to the plane or when the
    /// crossing lies behind the ray origin (`t < 0`).
    pub fn intersects_ray(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.distance - self.normal.dot(ray.origin)) / denom;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        Some(t)
    }

    /// Point where `ray` crosses the plane, if any
    pub fn intersection_point(&self, ray: &Ray) -> Option<Vec3> {
        self.intersects_ray(ray).map(|t| ray.point_along_ray(t))
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            distance: 0.0,
        }
    }
}
