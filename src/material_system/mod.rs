// material_system/mod.rs
pub mod texture;
