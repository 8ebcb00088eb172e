use image::RgbaImage;
use log::{info, warn};
use nalgebra::Vector3;
use std::path::Path;

/// Read-only RGBA8 texture.
///
/// Layout is row-major, 4 bytes per texel, row 0 at the top of the image.
#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Texture {
    /// Wraps raw RGBA bytes. Fails on empty dimensions or a size mismatch.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid texture size {}x{}", width, height));
        }
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(format!(
                "Texture data has {} bytes, expected {} for {}x{} RGBA",
                data.len(),
                expected,
                width,
                height
            ));
        }
        Ok(Texture {
            width,
            height,
            data,
        })
    }

    /// Decodes an image file into an RGBA texture.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?;
        let texture = Self::from_rgba_image(img.into_rgba8())?;
        info!(
            "Loaded texture {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    pub fn from_rgba_image(img: RgbaImage) -> Result<Self, String> {
        let (width, height) = img.dimensions();
        Self::new(width as usize, height as usize, img.into_raw())
    }

    /// 1x1 texture of a single color.
    pub fn solid_color(rgb: [u8; 3]) -> Self {
        Texture {
            width: 1,
            height: 1,
            data: vec![rgb[0], rgb[1], rgb[2], 255],
        }
    }

    /// `cells`x`cells` checkerboard, one texel per cell.
    pub fn checkerboard(cells: usize, a: [u8; 3], b: [u8; 3]) -> Self {
        let cells = cells.max(1);
        let mut data = Vec::with_capacity(cells * cells * 4);
        for y in 0..cells {
            for x in 0..cells {
                let c = if (x + y) % 2 == 0 { a } else { b };
                data.extend_from_slice(&[c[0], c[1], c[2], 255]);
            }
        }
        Texture {
            width: cells,
            height: cells,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel coordinates hit by `(u, v)`.
    ///
    /// `floor(u * width)` is wrapped with a Euclidean modulo, so any integer
    /// shift of u or v lands on the same texel and negative coordinates wrap
    /// around instead of mirroring.
    pub fn texel_coords(&self, u: f32, v: f32) -> (usize, usize) {
        let x = ((u * self.width as f32).floor() as i64).rem_euclid(self.width as i64);
        let y = ((v * self.height as f32).floor() as i64).rem_euclid(self.height as i64);
        (x as usize, y as usize)
    }

    /// Nearest-texel lookup. Returns RGB normalized to [0, 1]; alpha is ignored.
    ///
    /// `v` addresses image rows directly (v = 0 is the top row). The scanline
    /// filler flips UV space before calling this.
    pub fn map(&self, u: f32, v: f32) -> Vector3<f32> {
        let (x, y) = self.texel_coords(u, v);
        let pos = (y * self.width + x) * 4;
        Vector3::new(
            self.data[pos] as f32 / 255.0,
            self.data[pos + 1] as f32 / 255.0,
            self.data[pos + 2] as f32 / 255.0,
        )
    }
}

/// Loads a texture, falling back to a 1x1 texture of `fallback` on failure.
pub fn load_texture<P: AsRef<Path>>(path: P, fallback: [u8; 3]) -> Texture {
    Texture::from_file(path).unwrap_or_else(|e| {
        warn!("{}; using solid color {:?}", e, fallback);
        Texture::solid_color(fallback)
    })
}
