use crate::core::frame_buffer::{Device, EMPTY_DEPTH};
use image::ColorType;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Writes an RGB8 buffer to `path`, format picked from the extension.
pub fn save_image<P: AsRef<Path>>(path: P, data: &[u8], width: u32, height: u32) -> Result<(), String> {
    let path = path.as_ref();
    image::save_buffer(path, data, width, height, ColorType::Rgb8)
        .map_err(|e| format!("Failed to save image to {:?}: {}", path, e))?;
    info!("Image saved to {:?}", path);
    Ok(())
}

/// Maps written depths to [0, 1] using the `min_percentile`..`max_percentile`
/// range of the written values.
///
/// Cells still at [`EMPTY_DEPTH`] (or non-finite) become NaN so they can be
/// told apart from the far plane.
pub fn normalize_depth(depth_buffer: &[f32], min_percentile: f32, max_percentile: f32) -> Vec<f32> {
    let is_written = |d: f32| d.is_finite() && d < EMPTY_DEPTH;

    let mut written: Vec<f32> = depth_buffer.iter().copied().filter(|&d| is_written(d)).collect();
    if written.is_empty() {
        return vec![f32::NAN; depth_buffer.len()];
    }
    written.sort_unstable_by(|a, b| a.total_cmp(b));

    let last = written.len() - 1;
    let index_at = |percentile: f32| {
        ((percentile.clamp(0.0, 100.0) / 100.0 * last as f32).round() as usize).min(last)
    };
    let mut min_clip = written[index_at(min_percentile)];
    let mut max_clip = written[index_at(max_percentile)];
    if max_clip - min_clip < 1e-6 {
        min_clip = written[0];
        max_clip = written[last].max(min_clip + 1.0);
    }
    debug!("Depth normalization range [{:.3}, {:.3}]", min_clip, max_clip);

    let inv_range = 1.0 / (max_clip - min_clip);
    depth_buffer
        .iter()
        .map(|&depth| {
            if is_written(depth) {
                ((depth.clamp(min_clip, max_clip) - min_clip) * inv_range).clamp(0.0, 1.0)
            } else {
                f32::NAN
            }
        })
        .collect()
}

/// JET colormap (blue, cyan, green, yellow, red) over values in [0, 1].
/// Non-finite values stay black.
pub fn apply_colormap_jet(values: &[f32]) -> Vec<u8> {
    let mut result = vec![0u8; values.len() * 3];

    for (pixel, &value) in result.chunks_exact_mut(3).zip(values) {
        if !value.is_finite() {
            continue;
        }
        let value = value.clamp(0.0, 1.0);
        let (r, g, b) = if value <= 0.25 {
            (0.0, value * 4.0, 1.0)
        } else if value <= 0.5 {
            (0.0, 1.0, 1.0 - (value - 0.25) * 4.0)
        } else if value <= 0.75 {
            ((value - 0.5) * 4.0, 1.0, 0.0)
        } else {
            (1.0, 1.0 - (value - 0.75) * 4.0, 0.0)
        };
        pixel[0] = (r * 255.0) as u8;
        pixel[1] = (g * 255.0) as u8;
        pixel[2] = (b * 255.0) as u8;
    }

    result
}

/// Saves `<output_name>_<frame>_color.png` and, when `save_depth` is set,
/// `<output_name>_<frame>_depth.png` (near = red) into `output_dir`.
///
/// Returns the paths written.
pub fn save_frame(
    device: &Device,
    output_dir: &str,
    output_name: &str,
    frame: usize,
    save_depth: bool,
) -> Result<Vec<PathBuf>, String> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create output directory '{}': {}", output_dir, e))?;

    let width = device.width as u32;
    let height = device.height as u32;
    let mut written = Vec::new();

    let color_path = Path::new(output_dir).join(format!("{}_{}_color.png", output_name, frame));
    save_image(&color_path, device.color_buffer(), width, height)?;
    written.push(color_path);

    if save_depth {
        let nearness: Vec<f32> = normalize_depth(device.depth_buffer(), 1.0, 99.0)
            .into_iter()
            .map(|d| 1.0 - d)
            .collect();
        let depth_colored = apply_colormap_jet(&nearness);

        let depth_path = Path::new(output_dir).join(format!("{}_{}_depth.png", output_name, frame));
        save_image(&depth_path, &depth_colored, width, height)?;
        written.push(depth_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame_buffer::RenderTarget;

    #[test]
    fn empty_cells_normalize_to_nan() {
        let normalized = normalize_depth(&[EMPTY_DEPTH, 2.0, 4.0, f32::INFINITY], 0.0, 100.0);
        assert!(normalized[0].is_nan());
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 1.0);
        assert!(normalized[3].is_nan());
    }

    #[test]
    fn single_depth_does_not_divide_by_zero() {
        let normalized = normalize_depth(&[3.0, 3.0, EMPTY_DEPTH], 1.0, 99.0);
        assert_eq!(normalized[0], 0.0);
        assert_eq!(normalized[1], 0.0);
        assert!(normalize_depth(&[EMPTY_DEPTH; 4], 1.0, 99.0).iter().all(|d| d.is_nan()));
    }

    #[test]
    fn jet_endpoints() {
        let colors = apply_colormap_jet(&[0.0, 0.5, 1.0, f32::NAN]);
        assert_eq!(&colors[0..3], &[0, 0, 255]);
        assert_eq!(&colors[3..6], &[0, 255, 0]);
        assert_eq!(&colors[6..9], &[255, 0, 0]);
        assert_eq!(&colors[9..12], &[0, 0, 0]);
    }

    #[test]
    fn save_frame_writes_color_and_depth() {
        let mut device = Device::new(4, 2);
        device.clear(255, 0, 0);
        device.put_pixel(1, 1, 2.0, [0, 0, 255]);

        let dir = std::env::temp_dir().join(format!("scanline_rasterizer_save_{}", std::process::id()));
        let dir_str = dir.to_string_lossy().into_owned();
        let written = save_frame(&device, &dir_str, "test", 7, true).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("test_7_color.png"));
        assert!(written[1].ends_with("test_7_depth.png"));

        let color = image::open(&written[0]).unwrap().into_rgb8();
        assert_eq!(color.dimensions(), (4, 2));
        assert_eq!(color.get_pixel(1, 1).0, [0, 0, 255]);
        assert_eq!(color.get_pixel(0, 0).0, [255, 0, 0]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
