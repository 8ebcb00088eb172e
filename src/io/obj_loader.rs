use crate::material_system::texture::Texture;
use crate::scene::mesh::{Mesh, Triangle, Vertex};
use log::{info, warn};
use nalgebra::{Vector2, Vector3};
use std::io::BufRead;
use std::path::Path;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Loads an OBJ file as a single mesh sharing `texture`.
///
/// All models in the file are merged. Materials are ignored: the mesh has
/// exactly one texture.
pub fn load_obj_mesh<P: AsRef<Path>>(path: P, texture: Texture) -> Result<Mesh, String> {
    let path_ref = path.as_ref();
    info!("Loading OBJ file: {:?}", path_ref);

    let (models, _materials) = tobj::load_obj(path_ref, &load_options())
        .map_err(|e| format!("Failed to load OBJ {:?}: {}", path_ref, e))?;

    let name = path_ref
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    build_mesh(name, &models, texture)
}

/// Same as [`load_obj_mesh`] for OBJ text already in memory. `mtllib`
/// references are not followed.
pub fn load_obj_mesh_from_reader<R: BufRead>(
    name: &str,
    reader: &mut R,
    texture: Texture,
) -> Result<Mesh, String> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))
            .map_err(|e| format!("Failed to parse OBJ '{}': {}", name, e))?;
    build_mesh(name.to_string(), &models, texture)
}

fn build_mesh(name: String, models: &[tobj::Model], texture: Texture) -> Result<Mesh, String> {
    let mut triangles = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        if mesh.indices.is_empty() {
            warn!("Skipping model '{}' with no faces", model.name);
            continue;
        }

        let has_texcoords = !mesh.texcoords.is_empty();
        let has_normals = !mesh.normals.is_empty();
        if !has_texcoords {
            warn!("Model '{}' has no texture coordinates, using (0, 0)", model.name);
        }
        if !has_normals {
            warn!("Model '{}' has no normals", model.name);
        }

        let vertex_at = |index: u32| -> Result<Vertex, String> {
            let i = index as usize;
            let position = mesh
                .positions
                .get(i * 3..i * 3 + 3)
                .ok_or_else(|| format!("Model '{}': vertex index {} out of range", model.name, i))?;
            // OBJ is right-handed; the renderer looks down +Z, so Z is negated.
            let coordinates = Vector3::new(position[0], position[1], -position[2]);

            let uv = match mesh.texcoords.get(i * 2..i * 2 + 2) {
                Some(t) if has_texcoords => Vector2::new(t[0], t[1]),
                _ => Vector2::zeros(),
            };
            let normal = match mesh.normals.get(i * 3..i * 3 + 3) {
                Some(n) if has_normals => Vector3::new(n[0], n[1], n[2]),
                _ => Vector3::zeros(),
            };
            Ok(Vertex::new(coordinates, uv, normal))
        };

        for face in mesh.indices.chunks_exact(3) {
            triangles.push(Triangle::new(
                vertex_at(face[0])?,
                vertex_at(face[1])?,
                vertex_at(face[2])?,
            ));
        }
    }

    if triangles.is_empty() {
        return Err(format!("OBJ '{}' contains no triangles", name));
    }

    info!("Mesh '{}': {} triangles", name, triangles.len());
    Ok(Mesh::new(name, triangles, texture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_OBJ: &str = "\
v -1.0 -1.0 2.0
v 1.0 -1.0 2.0
v 1.0 1.0 2.0
v -1.0 1.0 2.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn loads_and_triangulates_faces() {
        let mesh = load_obj_mesh_from_reader(
            "quad",
            &mut Cursor::new(QUAD_OBJ),
            Texture::solid_color([0, 0, 0]),
        )
        .unwrap();
        assert_eq!(mesh.triangle_count(), 2);

        let first = mesh.triangles()[0];
        assert_eq!(first.a.coordinates, Vector3::new(-1.0, -1.0, -2.0));
        assert_eq!(first.b.uv, Vector2::new(1.0, 0.0));
        assert_eq!(first.c.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.transform.scale, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn missing_attributes_default_to_zero() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = load_obj_mesh_from_reader("bare", &mut Cursor::new(obj), Texture::solid_color([0, 0, 0]))
            .unwrap();
        let t = mesh.triangles()[0];
        assert_eq!(t.b.uv, Vector2::zeros());
        assert_eq!(t.c.normal, Vector3::zeros());
        assert_eq!(t.c.coordinates, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn empty_obj_is_an_error() {
        let result = load_obj_mesh_from_reader(
            "empty",
            &mut Cursor::new("# nothing here\n"),
            Texture::solid_color([0, 0, 0]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn loads_from_file_and_names_mesh_after_stem() {
        let path = std::env::temp_dir().join(format!("quad_{}.obj", std::process::id()));
        std::fs::write(&path, QUAD_OBJ).unwrap();
        let mesh = load_obj_mesh(&path, Texture::solid_color([0, 0, 0]));
        std::fs::remove_file(&path).ok();

        let mesh = mesh.unwrap();
        assert_eq!(mesh.name, format!("quad_{}", std::process::id()));
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_obj_mesh("no/such/model.obj", Texture::solid_color([0, 0, 0])).is_err());
    }
}
