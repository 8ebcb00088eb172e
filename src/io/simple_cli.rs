use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::RenderSettings;
use clap::Parser;
use log::info;

/// Headless front end: everything comes from a TOML file.
#[derive(Parser, Debug)]
#[command(name = "scanline-rasterizer")]
#[command(about = "Textured scanline software rasterizer")]
pub struct SimpleCli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Write an example config next to the binary and render with it
    #[arg(long)]
    pub use_example_config: bool,

    /// Override the number of frames to render
    #[arg(short, long, value_name = "N")]
    pub frames: Option<usize>,
}

impl SimpleCli {
    /// Parses the process arguments into validated settings.
    pub fn process() -> Result<RenderSettings, String> {
        Self::parse().into_settings()
    }

    pub fn into_settings(self) -> Result<RenderSettings, String> {
        let mut settings = if self.use_example_config {
            let example_path = "example_config.toml";
            TomlConfigLoader::create_example_config(example_path)?;
            info!("Created example config: {}", example_path);
            TomlConfigLoader::load_from_file(example_path)
                .map_err(|e| format!("Failed to load example config: {}", e))?
        } else if let Some(config_path) = &self.config {
            info!("Loading config file: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("Failed to load config '{}': {}", config_path, e))?
        } else {
            info!("No config given, using defaults");
            RenderSettings::default()
        };

        if let Some(frames) = self.frames {
            settings.frames = frames;
        }

        settings.validate()?;
        Ok(settings)
    }
}
