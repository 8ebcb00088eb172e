use crate::io::render_settings::{RenderSettings, parse_rgb, parse_vec3};
use log::warn;
use std::path::Path;
use toml::Value;

/// Reads and writes [`RenderSettings`] as TOML.
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::load_from_content(&content)
    }

    pub fn load_from_content(content: &str) -> Result<RenderSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))?;

        Self::parse_toml_to_settings(toml_value)
    }

    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content).map_err(|e| format!("Failed to write config file: {}", e))
    }

    /// Writes a config with every default spelled out.
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let settings = RenderSettings {
            frames: 10,
            ..Default::default()
        };
        Self::save_to_file(&settings, path)
            .map_err(|e| format!("Failed to create example config: {}", e))
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: Value) -> Result<RenderSettings, String> {
        let mut settings = RenderSettings::default();

        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files)?;
        }
        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }
        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera)?;
        }
        if let Some(object) = toml.get("object").and_then(|v| v.as_table()) {
            Self::parse_object_section(&mut settings, object)?;
        }
        if let Some(animation) = toml.get("animation").and_then(|v| v.as_table()) {
            Self::parse_animation_section(&mut settings, animation)?;
        }

        Ok(settings)
    }

    fn parse_files_section(
        settings: &mut RenderSettings,
        files: &toml::Table,
    ) -> Result<(), String> {
        if let Some(obj) = files.get("obj").and_then(|v| v.as_str()) {
            settings.obj = Some(obj.to_string());
        }
        if let Some(texture) = files.get("texture").and_then(|v| v.as_str()) {
            settings.texture = Some(texture.to_string());
        }
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = files.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        Ok(())
    }

    fn parse_render_section(
        settings: &mut RenderSettings,
        render: &toml::Table,
    ) -> Result<(), String> {
        if let Some(width) = render.get("width").and_then(|v| v.as_integer()) {
            match Self::positive_size(width) {
                Some(w) => settings.width = w,
                None => warn!("Invalid width {}, keeping {}", width, settings.width),
            }
        }
        if let Some(height) = render.get("height").and_then(|v| v.as_integer()) {
            match Self::positive_size(height) {
                Some(h) => settings.height = h,
                None => warn!("Invalid height {}, keeping {}", height, settings.height),
            }
        }
        if let Some(background) = render.get("background").and_then(|v| v.as_str()) {
            parse_rgb(background)
                .map_err(|e| format!("render.background: {}", e))?;
            settings.background = background.to_string();
        }
        if let Some(save_depth) = render.get("save_depth").and_then(|v| v.as_bool()) {
            settings.save_depth = save_depth;
        }
        if let Some(use_multithreading) =
            render.get("use_multithreading").and_then(|v| v.as_bool())
        {
            settings.use_multithreading = use_multithreading;
        }
        if let Some(rows) = render.get("rows_per_band").and_then(|v| v.as_integer()) {
            match Self::positive_size(rows) {
                Some(r) => settings.rows_per_band = r,
                None => warn!("Invalid rows_per_band {}, keeping {}", rows, settings.rows_per_band),
            }
        }
        Ok(())
    }

    fn parse_camera_section(
        settings: &mut RenderSettings,
        camera: &toml::Table,
    ) -> Result<(), String> {
        if let Some(fov) = Self::get_number(camera, "fov")? {
            settings.camera_fov = fov;
        }
        if let Some(position) = camera.get("position").and_then(|v| v.as_str()) {
            Self::check_vec3("camera.position", position)?;
            settings.camera_position = position.to_string();
        }
        Ok(())
    }

    fn parse_object_section(
        settings: &mut RenderSettings,
        object: &toml::Table,
    ) -> Result<(), String> {
        if let Some(position) = object.get("position").and_then(|v| v.as_str()) {
            Self::check_vec3("object.position", position)?;
            settings.object_position = position.to_string();
        }
        if let Some(rotation) = object.get("rotation").and_then(|v| v.as_str()) {
            Self::check_vec3("object.rotation", rotation)?;
            settings.object_rotation = rotation.to_string();
        }
        if let Some(scale) = object.get("scale").and_then(|v| v.as_str()) {
            Self::check_vec3("object.scale", scale)?;
            settings.object_scale = scale.to_string();
        }
        Ok(())
    }

    fn parse_animation_section(
        settings: &mut RenderSettings,
        animation: &toml::Table,
    ) -> Result<(), String> {
        if let Some(frames) = animation.get("frames").and_then(|v| v.as_integer()) {
            match Self::positive_size(frames) {
                Some(f) => settings.frames = f,
                None => warn!("Invalid frame count {}, keeping {}", frames, settings.frames),
            }
        }
        if let Some(yaw_step) = Self::get_number(animation, "yaw_step")? {
            settings.yaw_step = yaw_step;
        }
        if let Some(camera_step) = Self::get_number(animation, "camera_step")? {
            settings.camera_step = camera_step;
        }
        Ok(())
    }

    // ===== helpers =====

    fn positive_size(value: i64) -> Option<usize> {
        if value > 0 { usize::try_from(value).ok() } else { None }
    }

    /// Accepts both `60` and `60.0`; any other type is an error.
    fn get_number(table: &toml::Table, key: &str) -> Result<Option<f32>, String> {
        match table.get(key) {
            None => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f as f32)),
            Some(Value::Integer(i)) => Ok(Some(*i as f32)),
            Some(other) => Err(format!("'{}' must be a number, got {}", key, other)),
        }
    }

    fn check_vec3(key: &str, value: &str) -> Result<(), String> {
        parse_vec3(value)
            .map(|_| ())
            .map_err(|e| format!("{}: {}", key, e))
    }

    // ===== RenderSettings -> TOML =====

    fn settings_to_toml(settings: &RenderSettings) -> String {
        let mut content = String::new();

        content.push_str("# Scanline rasterizer configuration\n\n");

        content.push_str("[files]\n");
        if let Some(obj) = &settings.obj {
            content.push_str(&format!("obj = {}\n", quoted(obj)));
        } else {
            content.push_str("# obj = \"path/to/model.obj\"  # built-in cube when unset\n");
        }
        if let Some(texture) = &settings.texture {
            content.push_str(&format!("texture = {}\n", quoted(texture)));
        } else {
            content.push_str("# texture = \"path/to/texture.png\"  # checkerboard when unset\n");
        }
        content.push_str(&format!("output = {}\n", quoted(&settings.output)));
        content.push_str(&format!("output_dir = {}\n", quoted(&settings.output_dir)));
        content.push('\n');

        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push_str(&format!("background = {}\n", quoted(&settings.background)));
        content.push_str(&format!("save_depth = {}\n", settings.save_depth));
        content.push_str(&format!(
            "use_multithreading = {}\n",
            settings.use_multithreading
        ));
        content.push_str(&format!("rows_per_band = {}\n", settings.rows_per_band));
        content.push('\n');

        content.push_str("[camera]\n");
        content.push_str(&format!("fov = {:?}\n", settings.camera_fov));
        content.push_str(&format!("position = {}\n", quoted(&settings.camera_position)));
        content.push('\n');

        content.push_str("[object]\n");
        content.push_str(&format!("position = {}\n", quoted(&settings.object_position)));
        content.push_str(&format!("rotation = {}\n", quoted(&settings.object_rotation)));
        content.push_str(&format!("scale = {}\n", quoted(&settings.object_scale)));
        content.push('\n');

        content.push_str("[animation]\n");
        content.push_str(&format!("frames = {}\n", settings.frames));
        content.push_str(&format!("yaw_step = {:?}\n", settings.yaw_step));
        content.push_str(&format!("camera_step = {:?}\n", settings.camera_step));

        content
    }
}

/// TOML string literal for `value`, escaped as needed.
fn quoted(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}
