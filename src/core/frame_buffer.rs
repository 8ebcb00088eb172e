use crate::geometry::transform::Viewport;
use rayon::prelude::*;
use std::ops::Range;

/// Depth value of an empty cell ("infinitely far").
pub const EMPTY_DEPTH: f32 = f32::MAX;

/// Anything the scanline filler can write pixels into.
pub trait RenderTarget {
    /// Full frame dimensions, used for the NDC -> pixel mapping.
    fn viewport(&self) -> Viewport;

    /// Rows this target owns. Writes outside it are discarded.
    fn rows(&self) -> Range<i32>;

    /// Bounds-checked, depth-tested pixel write.
    fn put_pixel(&mut self, x: i32, y: i32, depth: f32, rgb: [u8; 3]);
}

/// Shared depth test + write for one pixel index.
///
/// The new pixel wins only when strictly nearer than the stored one: equal
/// depths keep the earlier pixel, NaN never writes.
#[inline(always)]
fn depth_tested_write(
    color_buffer: &mut [u8],
    depth_buffer: &mut [f32],
    index: usize,
    depth: f32,
    rgb: [u8; 3],
) {
    if !(depth < depth_buffer[index]) {
        return;
    }
    depth_buffer[index] = depth;
    let pos = index * 3;
    color_buffer[pos..pos + 3].copy_from_slice(&rgb);
}

/// Framebuffer and depth buffer owned by one render context.
pub struct Device {
    pub width: usize,
    pub height: usize,
    /// RGB, 3 bytes per pixel, row-major.
    color_buffer: Vec<u8>,
    /// One camera-space depth per pixel, smaller is nearer.
    depth_buffer: Vec<f32>,
}

impl Device {
    pub fn new(width: usize, height: usize) -> Self {
        let num_pixels = width * height;
        Device {
            width,
            height,
            color_buffer: vec![0u8; num_pixels * 3],
            depth_buffer: vec![EMPTY_DEPTH; num_pixels],
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Fills every pixel with `(r, g, b)` and resets every depth cell.
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        self.depth_buffer
            .par_iter_mut()
            .for_each(|depth| *depth = EMPTY_DEPTH);

        self.color_buffer
            .par_chunks_mut(3)
            .for_each(|pixel| pixel.copy_from_slice(&[r, g, b]));
    }

    pub fn color_buffer(&self) -> &[u8] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Copy of the color buffer, e.g. for handing to an encoder.
    pub fn get_color_buffer_bytes(&self) -> Vec<u8> {
        self.color_buffer.clone()
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let pos = (y * self.width + x) * 3;
        Some([
            self.color_buffer[pos],
            self.color_buffer[pos + 1],
            self.color_buffer[pos + 2],
        ])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth_buffer[y * self.width + x])
    }

    /// Splits the device into disjoint horizontal bands of `rows_per_band`
    /// rows (the last one may be shorter). Each band exclusively owns its
    /// slice of both buffers, so bands can be rasterized on separate threads.
    pub fn bands(&mut self, rows_per_band: usize) -> Vec<DeviceBand<'_>> {
        if self.width == 0 || self.height == 0 {
            return Vec::new();
        }
        // Wider bands than the frame are the same as one band.
        let rows_per_band = rows_per_band.clamp(1, self.height);
        let viewport = self.viewport();
        let width = self.width;

        self.color_buffer
            .chunks_mut(rows_per_band * width * 3)
            .zip(self.depth_buffer.chunks_mut(rows_per_band * width))
            .enumerate()
            .map(|(i, (color, depth))| {
                let row_start = i * rows_per_band;
                DeviceBand {
                    viewport,
                    row_start,
                    row_end: row_start + depth.len() / width,
                    color,
                    depth,
                }
            })
            .collect()
    }
}

impl RenderTarget for Device {
    fn viewport(&self) -> Viewport {
        Device::viewport(self)
    }

    fn rows(&self) -> Range<i32> {
        0..self.height as i32
    }

    fn put_pixel(&mut self, x: i32, y: i32, depth: f32, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let index = y as usize * self.width + x as usize;
        depth_tested_write(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            index,
            depth,
            rgb,
        );
    }
}

/// A horizontal strip of a [`Device`], rows `row_start..row_end`.
pub struct DeviceBand<'a> {
    viewport: Viewport,
    row_start: usize,
    row_end: usize,
    color: &'a mut [u8],
    depth: &'a mut [f32],
}

impl DeviceBand<'_> {
    pub fn row_range(&self) -> Range<usize> {
        self.row_start..self.row_end
    }
}

impl RenderTarget for DeviceBand<'_> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn rows(&self) -> Range<i32> {
        self.row_start as i32..self.row_end as i32
    }

    fn put_pixel(&mut self, x: i32, y: i32, depth: f32, rgb: [u8; 3]) {
        let width = self.viewport.width;
        if x < 0 || x >= width as i32 || y < self.row_start as i32 || y >= self.row_end as i32 {
            return;
        }
        let index = (y as usize - self.row_start) * width + x as usize;
        depth_tested_write(self.color, self.depth, index, depth, rgb);
    }
}
