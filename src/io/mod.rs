pub mod config_loader;
pub mod obj_loader;
pub mod render_settings;
pub mod simple_cli;
