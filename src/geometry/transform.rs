use crate::geometry::camera::Camera;
use crate::geometry::math::rotate_euler;
use nalgebra::Vector3;

/// Placement of a mesh in the world: Euler rotation (degrees), component-wise
/// scale, then translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation_euler: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vector3::zeros(),
            rotation_euler: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation_euler: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Transform {
            position,
            rotation_euler,
            scale,
        }
    }

    /// Model space -> world space: rotate, scale, translate.
    pub fn model_to_world(&self, coordinates: &Vector3<f32>) -> Vector3<f32> {
        rotate_euler(coordinates, &self.rotation_euler).component_mul(&self.scale) + self.position
    }
}

/// World space -> camera space. The camera has no orientation, so this is a
/// pure translation.
#[inline]
pub fn world_to_camera(world: &Vector3<f32>, camera: &Camera) -> Vector3<f32> {
    world - camera.position
}

/// Pixel dimensions of the render target. Fixed for the lifetime of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Viewport { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Maps NDC to pixel coordinates. Y is flipped: NDC +1 is the top row.
    /// Z is passed through untouched and later serves as the depth key.
    pub fn ndc_to_pixel(&self, ndc: &Vector3<f32>) -> Vector3<f32> {
        let w = self.width as f32;
        let h = self.height as f32;
        Vector3::new(
            ndc.x * w / 2.0 + w / 2.0,
            -(ndc.y * h / 2.0) + h / 2.0,
            ndc.z,
        )
    }
}

/// Perspective projection of a camera-space point into NDC.
///
/// `point.z` is the distance along the forward axis and must be non-zero;
/// callers filter out points with `z <= 0` before projecting. The returned z
/// is the camera-space z, not a normalized depth.
pub fn project(point: &Vector3<f32>, camera: &Camera, aspect_ratio: f32) -> Vector3<f32> {
    let half_fov_tan = camera.half_fov_tan();
    Vector3::new(
        point.x / (aspect_ratio * half_fov_tan * point.z),
        point.y / (half_fov_tan * point.z),
        point.z,
    )
}
