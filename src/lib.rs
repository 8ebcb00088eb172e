pub mod core;
pub mod geometry;
pub mod io;
pub mod material_system;
pub mod scene;
pub mod utils;
