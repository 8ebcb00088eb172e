use crate::core::renderer::RenderConfig;
use crate::geometry::camera::Camera;
use crate::geometry::transform::Transform;
use nalgebra::Vector3;

/// Parses "x,y,z" into a vector.
pub fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("Expected 3 comma-separated values, got '{}'", s));
    }
    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("Invalid number '{}': {}", part.trim(), e))?;
    }
    Ok(Vector3::new(values[0], values[1], values[2]))
}

/// Parses "r,g,b" with each channel in 0..=255.
pub fn parse_rgb(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("Expected 'r,g,b', got '{}'", s));
    }
    let mut rgb = [0u8; 3];
    for (channel, part) in rgb.iter_mut().zip(&parts) {
        *channel = part
            .trim()
            .parse::<u8>()
            .map_err(|e| format!("Invalid color channel '{}': {}", part.trim(), e))?;
    }
    Ok(rgb)
}

/// Every parameter that can be set from a TOML config.
///
/// Vectors and colors are kept as strings so they round-trip through the
/// config file unchanged; the typed getters parse them on demand.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    // ===== files =====
    /// OBJ to render. Without one the built-in cube is used.
    pub obj: Option<String>,
    /// Texture image; a checkerboard is used when absent.
    pub texture: Option<String>,
    /// Base name of output images.
    pub output: String,
    pub output_dir: String,

    // ===== render =====
    pub width: usize,
    pub height: usize,
    /// Clear color, "r,g,b".
    pub background: String,
    /// Also write a colormapped depth image per frame.
    pub save_depth: bool,
    pub use_multithreading: bool,
    pub rows_per_band: usize,

    // ===== camera =====
    /// Field of view in degrees.
    pub camera_fov: f32,
    /// "x,y,z"
    pub camera_position: String,

    // ===== object =====
    pub object_position: String,
    /// Euler angles in degrees, "pitch,yaw,roll".
    pub object_rotation: String,
    pub object_scale: String,

    // ===== animation =====
    /// Number of frames to render.
    pub frames: usize,
    /// Yaw added to the object per frame, degrees.
    pub yaw_step: f32,
    /// Camera z added per frame.
    pub camera_step: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            obj: None,
            texture: None,
            output: "frame".to_string(),
            output_dir: "output".to_string(),

            width: 1024,
            height: 576,
            background: "255,0,0".to_string(),
            save_depth: false,
            use_multithreading: true,
            rows_per_band: 16,

            camera_fov: 60.0,
            camera_position: "0,0,-10".to_string(),

            object_position: "0,-1,0".to_string(),
            object_rotation: "0,0,0".to_string(),
            object_scale: "0.5,0.5,0.5".to_string(),

            frames: 1,
            yaw_step: 3.0,
            camera_step: 0.0,
        }
    }
}

impl RenderSettings {
    pub fn background_rgb(&self) -> Result<[u8; 3], String> {
        parse_rgb(&self.background).map_err(|e| format!("background: {}", e))
    }

    pub fn camera(&self) -> Result<Camera, String> {
        let position =
            parse_vec3(&self.camera_position).map_err(|e| format!("camera position: {}", e))?;
        Ok(Camera::new(self.camera_fov, position))
    }

    pub fn object_transform(&self) -> Result<Transform, String> {
        let position =
            parse_vec3(&self.object_position).map_err(|e| format!("object position: {}", e))?;
        let rotation =
            parse_vec3(&self.object_rotation).map_err(|e| format!("object rotation: {}", e))?;
        let scale = parse_vec3(&self.object_scale).map_err(|e| format!("object scale: {}", e))?;
        Ok(Transform::new(position, rotation, scale))
    }

    pub fn render_config(&self) -> Result<RenderConfig, String> {
        Ok(RenderConfig::default()
            .with_background(self.background_rgb()?)
            .with_multithreading(self.use_multithreading)
            .with_rows_per_band(self.rows_per_band))
    }

    /// Checks everything a render needs before any work starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("Image width and height must be greater than 0".to_string());
        }
        if !(self.camera_fov > 0.0 && self.camera_fov < 180.0) {
            return Err(format!(
                "Camera fov must be in (0, 180) degrees, got {}",
                self.camera_fov
            ));
        }
        if let Some(obj_path) = &self.obj {
            if !std::path::Path::new(obj_path).exists() {
                return Err(format!("OBJ file not found: '{}'", obj_path));
            }
        }
        if self.output.trim().is_empty() {
            return Err("Output name must not be empty".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("Output directory must not be empty".to_string());
        }
        if self.frames == 0 {
            return Err("At least one frame must be rendered".to_string());
        }

        self.background_rgb()?;
        self.camera()?;
        self.object_transform()?;
        Ok(())
    }
}
