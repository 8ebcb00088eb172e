use crate::core::frame_buffer::{Device, RenderTarget};
use crate::core::rasterizer::{ProjectedTriangle, ProjectedVertex, rasterize_triangle};
use crate::geometry::camera::Camera;
use crate::geometry::transform::{Transform, Viewport, project, world_to_camera};
use crate::material_system::texture::Texture;
use crate::scene::mesh::{Mesh, Triangle};
use log::{debug, trace};
use nalgebra::{Vector2, Vector3};
use rayon::prelude::*;
use std::ops::{Add, AddAssign};
use std::time::Instant;

/// Per-call triangle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Triangles handed to the rasterizer.
    pub drawn: usize,
    /// Triangles dropped because a vertex was on or behind the camera plane.
    pub skipped: usize,
}

impl Add for DrawStats {
    type Output = DrawStats;

    fn add(self, rhs: DrawStats) -> DrawStats {
        DrawStats {
            drawn: self.drawn + rhs.drawn,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: DrawStats) {
        *self = *self + rhs;
    }
}

/// Model -> world -> camera -> NDC -> pixel for the three corners of one
/// triangle.
///
/// Returns `None` when any corner has camera-space `z <= 0`: projecting it
/// would divide by zero or mirror the point through the camera.
pub fn project_triangle(
    triangle: &Triangle,
    transform: &Transform,
    camera: &Camera,
    viewport: Viewport,
) -> Option<ProjectedTriangle> {
    let aspect_ratio = viewport.aspect_ratio();
    let mut projected = [ProjectedVertex::new(Vector3::zeros(), Vector2::zeros()); 3];

    for (slot, vertex) in projected.iter_mut().zip(triangle.vertices()) {
        let world = transform.model_to_world(&vertex.coordinates);
        let camera_space = world_to_camera(&world, camera);
        if camera_space.z <= 0.0 {
            return None;
        }
        let ndc = project(&camera_space, camera, aspect_ratio);
        *slot = ProjectedVertex::new(viewport.ndc_to_pixel(&ndc), vertex.uv);
    }

    Some(ProjectedTriangle {
        vertices: projected,
    })
}

/// Draws every triangle of `mesh` into `target` in submission order.
///
/// Does not clear; callers own the frame lifecycle.
pub fn draw_mesh<T: RenderTarget>(target: &mut T, mesh: &Mesh, camera: &Camera) -> DrawStats {
    let viewport = target.viewport();
    let mut stats = DrawStats::default();

    for triangle in mesh.triangles() {
        match project_triangle(triangle, &mesh.transform, camera, viewport) {
            Some(projected) => {
                rasterize_triangle(target, &projected, mesh.texture());
                stats.drawn += 1;
            }
            None => {
                trace!("mesh '{}': triangle behind camera skipped", mesh.name);
                stats.skipped += 1;
            }
        }
    }

    stats
}

/// Frame-level settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Clear color.
    pub background: [u8; 3],
    /// Rasterize horizontal bands of the frame on the rayon pool.
    pub use_multithreading: bool,
    /// Band height when multithreading.
    pub rows_per_band: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: [255, 0, 0],
            use_multithreading: true,
            rows_per_band: 16,
        }
    }
}

impl RenderConfig {
    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_multithreading(mut self, use_multithreading: bool) -> Self {
        self.use_multithreading = use_multithreading;
        self
    }

    pub fn with_rows_per_band(mut self, rows_per_band: usize) -> Self {
        self.rows_per_band = rows_per_band.max(1);
        self
    }
}

/// Projected triangle plus the texture it samples.
type Batch<'a> = Vec<(ProjectedTriangle, &'a Texture)>;

pub struct Renderer {
    pub config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Renderer { config }
    }

    /// Produces one complete frame: clear, project every mesh, rasterize.
    ///
    /// With multithreading the device is split into disjoint bands and every
    /// band replays the whole batch in submission order, so each pixel sees
    /// the same sequence of depth tests as in a single-threaded run.
    pub fn render_frame(&self, device: &mut Device, meshes: &[Mesh], camera: &Camera) -> DrawStats {
        let frame_start = Instant::now();
        let [r, g, b] = self.config.background;
        device.clear(r, g, b);

        let viewport = device.viewport();
        let (batch, stats) = self.project_scene(meshes, camera, viewport);
        let projected_at = frame_start.elapsed();

        if self.config.use_multithreading {
            device
                .bands(self.config.rows_per_band)
                .into_par_iter()
                .for_each(|mut band| rasterize_batch(&mut band, &batch));
        } else {
            rasterize_batch(device, &batch);
        }

        debug!(
            "frame: {} triangles drawn, {} skipped, projection {:?}, total {:?}",
            stats.drawn,
            stats.skipped,
            projected_at,
            frame_start.elapsed()
        );
        stats
    }

    fn project_scene<'a>(
        &self,
        meshes: &'a [Mesh],
        camera: &Camera,
        viewport: Viewport,
    ) -> (Batch<'a>, DrawStats) {
        let total: usize = meshes.iter().map(Mesh::triangle_count).sum();
        let mut batch = Vec::with_capacity(total);
        let mut stats = DrawStats::default();

        for mesh in meshes {
            let project = |t: &Triangle| project_triangle(t, &mesh.transform, camera, viewport);
            let projected: Vec<Option<ProjectedTriangle>> = if self.config.use_multithreading {
                mesh.triangles().par_iter().map(project).collect()
            } else {
                mesh.triangles().iter().map(project).collect()
            };

            let before = batch.len();
            batch.extend(projected.into_iter().flatten().map(|t| (t, mesh.texture())));
            let drawn = batch.len() - before;
            let skipped = mesh.triangle_count() - drawn;
            if skipped > 0 {
                trace!("mesh '{}': {} triangles behind camera", mesh.name, skipped);
            }
            stats += DrawStats { drawn, skipped };
        }

        (batch, stats)
    }
}

fn rasterize_batch<T: RenderTarget>(target: &mut T, batch: &[(ProjectedTriangle, &Texture)]) {
    for (triangle, texture) in batch {
        rasterize_triangle(target, triangle, texture);
    }
}
