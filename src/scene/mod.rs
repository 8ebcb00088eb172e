// scene/mod.rs
pub mod mesh;
pub mod primitives;
