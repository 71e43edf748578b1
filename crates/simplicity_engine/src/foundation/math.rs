//! Math utilities and types
//!
//! Provides the vector, matrix and bounds types used by the scene graph,
//! the renderer chain and picking.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 homogeneous matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// RGBA colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Colour {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Selection orange used for outlines by default
    pub const SELECTION: Self = Self::rgb(1.0, 0.6, 0.0);

    /// Create an opaque colour
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a colour with alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Colour {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Colour> for [f32; 4] {
    fn from(colour: Colour) -> Self {
        [colour.r, colour.g, colour.b, colour.a]
    }
}

/// Ray with an origin and a (not necessarily normalized) direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Point3,
    /// Ray direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine transform.
    ///
    /// The direction is not renormalized, so a parameter `t` addresses the
    /// same physical point before and after the transform.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point(&self.origin),
            direction: matrix.transform_vector(&self.direction),
        }
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Unit cube centered on the origin
    pub fn unit() -> Self {
        Self::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5))
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Test ray intersection with this AABB using the slab method.
    ///
    /// Returns the ray parameter of the entry point (0 when the origin is
    /// inside the box), or `None` when the ray misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = |d: f32| if d != 0.0 { 1.0 / d } else { f32::INFINITY };
        let inv_dir = Vec3::new(inv(ray.direction.x), inv(ray.direction.y), inv(ray.direction.z));
        let origin = ray.origin.coords;

        let t1 = (self.min.x - origin.x) * inv_dir.x;
        let t2 = (self.max.x - origin.x) * inv_dir.x;
        let t3 = (self.min.y - origin.y) * inv_dir.y;
        let t4 = (self.max.y - origin.y) * inv_dir.y;
        let t5 = (self.min.z - origin.z) * inv_dir.z;
        let t6 = (self.max.z - origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point(&corner).coords;
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Self { min, max }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create an OpenGL-style perspective projection (depth mapped to [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an OpenGL-style orthographic projection of the given half height
    fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let half_width = half_height * aspect;
        Mat4::new_orthographic(-half_width, half_width, -half_height, half_height, near, far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_ray_hit_and_miss() {
        let aabb = Aabb::unit();
        let hit = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let miss = Ray::new(Point3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        assert_relative_eq!(aabb.intersect_ray(&hit).unwrap_or(-1.0), 4.5);
        assert!(aabb.intersect_ray(&miss).is_none());
    }

    #[test]
    fn test_aabb_behind_ray_is_missed() {
        let aabb = Aabb::unit();
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_aabb_transformed_by_translation() {
        let moved = Aabb::unit().transformed(&Mat4::new_translation(&Vec3::new(2.0, 0.0, 0.0)));
        assert_relative_eq!(moved.min, Vec3::new(1.5, -0.5, -0.5));
        assert_relative_eq!(moved.max, Vec3::new(2.5, 0.5, 0.5));
    }

    #[test]
    fn test_ray_transform_preserves_parameter() {
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        let scale = Mat4::new_scaling(2.0);
        let scaled = ray.transformed(&scale);

        assert_relative_eq!(scaled.at(3.0), scale.transform_point(&ray.at(3.0)));
    }
}
