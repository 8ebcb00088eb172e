// geometry/mod.rs
// Vector helpers, camera and coordinate transforms
pub mod camera;
pub mod math;
pub mod transform;
