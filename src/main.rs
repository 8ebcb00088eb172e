use log::{error, info};
use scanline_rasterizer::core::frame_buffer::Device;
use scanline_rasterizer::core::renderer::{DrawStats, Renderer};
use scanline_rasterizer::io::obj_loader::load_obj_mesh;
use scanline_rasterizer::io::render_settings::RenderSettings;
use scanline_rasterizer::io::simple_cli::SimpleCli;
use scanline_rasterizer::material_system::texture::{Texture, load_texture};
use scanline_rasterizer::scene::mesh::Mesh;
use scanline_rasterizer::scene::primitives;
use scanline_rasterizer::utils::save_utils::save_frame;
use std::time::Instant;

const FALLBACK_TEXTURE_COLOR: [u8; 3] = [255, 0, 255];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let settings = SimpleCli::process()?;
    let mut mesh = load_scene_mesh(&settings)?;
    let mut camera = settings.camera()?;
    let renderer = Renderer::new(settings.render_config()?);
    let mut device = Device::new(settings.width, settings.height);

    info!(
        "Rendering {} frame(s) of '{}' ({} triangles) at {}x{}",
        settings.frames,
        mesh.name,
        mesh.triangle_count(),
        settings.width,
        settings.height
    );

    let start = Instant::now();
    let mut totals = DrawStats::default();
    for frame in 0..settings.frames {
        let stats = renderer.render_frame(&mut device, std::slice::from_ref(&mesh), &camera);
        totals += stats;
        save_frame(
            &device,
            &settings.output_dir,
            &settings.output,
            frame,
            settings.save_depth,
        )?;

        mesh.transform.rotation_euler.y += settings.yaw_step;
        camera.position.z += settings.camera_step;
    }

    info!(
        "Done in {:?}: {} triangles drawn, {} skipped behind the camera",
        start.elapsed(),
        totals.drawn,
        totals.skipped
    );
    Ok(())
}

fn load_scene_mesh(settings: &RenderSettings) -> Result<Mesh, String> {
    let texture = match &settings.texture {
        Some(path) => load_texture(path, FALLBACK_TEXTURE_COLOR),
        None => Texture::checkerboard(8, [255, 255, 255], [40, 40, 40]),
    };

    let mesh = match &settings.obj {
        Some(path) => load_obj_mesh(path, texture)?,
        None => {
            info!("No OBJ configured, rendering the built-in cube");
            primitives::cube(texture)
        }
    };

    Ok(mesh.with_transform(settings.object_transform()?))
}
