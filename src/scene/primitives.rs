use crate::material_system::texture::Texture;
use crate::scene::mesh::{Mesh, Triangle, Vertex};
use nalgebra::{Vector2, Vector3};

/// Axis-aligned unit square in the XY plane facing -Z, UVs covering [0, 1].
pub fn quad(texture: Texture) -> Mesh {
    let normal = -Vector3::z();
    let corner = |x: f32, y: f32| {
        Vertex::new(
            Vector3::new(x - 0.5, y - 0.5, 0.0),
            Vector2::new(x, y),
            normal,
        )
    };
    let (bl, br, tr, tl) = (corner(0.0, 0.0), corner(1.0, 0.0), corner(1.0, 1.0), corner(0.0, 1.0));
    Mesh::new(
        "quad",
        vec![Triangle::new(bl, br, tr), Triangle::new(bl, tr, tl)],
        texture,
    )
}

/// Cube of edge 2 centred at the origin, each face mapped to the full texture.
pub fn cube(texture: Texture) -> Mesh {
    // (normal, u axis, v axis) per face; u × v points along the normal.
    let faces = [
        (Vector3::x(), -Vector3::z(), Vector3::y()),
        (-Vector3::x(), Vector3::z(), Vector3::y()),
        (Vector3::y(), Vector3::x(), -Vector3::z()),
        (-Vector3::y(), Vector3::x(), Vector3::z()),
        (Vector3::z(), Vector3::x(), Vector3::y()),
        (-Vector3::z(), -Vector3::x(), Vector3::y()),
    ];

    let mut triangles = Vec::with_capacity(12);
    for (normal, u_axis, v_axis) in faces {
        let corner = |u: f32, v: f32| {
            let position = normal + u_axis * (u * 2.0 - 1.0) + v_axis * (v * 2.0 - 1.0);
            Vertex::new(position, Vector2::new(u, v), normal)
        };
        let (p00, p10, p11, p01) = (corner(0.0, 0.0), corner(1.0, 0.0), corner(1.0, 1.0), corner(0.0, 1.0));
        triangles.push(Triangle::new(p00, p10, p11));
        triangles.push(Triangle::new(p00, p11, p01));
    }

    Mesh::new("cube", triangles, texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_vertices_lie_on_the_unit_box() {
        let mesh = cube(Texture::solid_color([0, 0, 0]));
        assert_eq!(mesh.triangle_count(), 12);
        for triangle in mesh.triangles() {
            for vertex in triangle.vertices() {
                let p = vertex.coordinates;
                assert!(p.iter().all(|c| (c.abs() - 1.0).abs() < 1e-6));
                assert!((0.0..=1.0).contains(&vertex.uv.x));
                assert!((0.0..=1.0).contains(&vertex.uv.y));
            }
        }
    }

    #[test]
    fn quad_spans_unit_square() {
        let mesh = quad(Texture::solid_color([0, 0, 0]));
        assert_eq!(mesh.triangle_count(), 2);
        let xs: Vec<f32> = mesh
            .triangles()
            .iter()
            .flat_map(|t| t.vertices().map(|v| v.coordinates.x))
            .collect();
        assert!(xs.iter().all(|&x| x == -0.5 || x == 0.5));
    }
}
