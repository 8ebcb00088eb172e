use nalgebra::Vector3;

/// Translation-only camera looking down +Z.
///
/// `position` may be moved between frames; the field of view is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3<f32>,
    fov: f32, // degrees
}

impl Camera {
    pub fn new(fov_degrees: f32, position: Vector3<f32>) -> Self {
        Camera {
            position,
            fov: fov_degrees,
        }
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// tan(fov / 2), the half-extent of the view frustum at distance 1.
    pub fn half_fov_tan(&self) -> f32 {
        (self.fov * 0.5).to_radians().tan()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(60.0, Vector3::new(0.0, 0.0, -10.0))
    }
}
