use crate::geometry::transform::Transform;
use crate::material_system::texture::Texture;
use nalgebra::{Vector2, Vector3};

/// One triangle corner as delivered by geometry ingestion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Model-space position.
    pub coordinates: Vector3<f32>,
    pub uv: Vector2<f32>,
    /// Carried for future shading; rasterization does not read it.
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(coordinates: Vector3<f32>, uv: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Vertex {
            coordinates,
            uv,
            normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Triangle { a, b, c }
    }

    pub fn vertices(&self) -> [&Vertex; 3] {
        [&self.a, &self.b, &self.c]
    }
}

/// Triangles sharing one texture and one transform.
///
/// The transform is public so the control loop can animate it between frames.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub transform: Transform,
    triangles: Vec<Triangle>,
    texture: Texture,
}

impl Mesh {
    pub fn new(name: impl Into<String>, triangles: Vec<Triangle>, texture: Texture) -> Self {
        Mesh {
            name: name.into(),
            transform: Transform::default(),
            triangles,
            texture,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
