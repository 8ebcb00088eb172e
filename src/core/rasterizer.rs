use crate::core::frame_buffer::RenderTarget;
use crate::geometry::math::interpolate;
use crate::material_system::texture::Texture;
use nalgebra::{Vector2, Vector3};

/// A vertex after projection: pixel x, pixel y, camera-space depth in z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    pub position: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl ProjectedVertex {
    pub fn new(position: Vector3<f32>, uv: Vector2<f32>) -> Self {
        ProjectedVertex { position, uv }
    }
}

/// Per-frame projection of one triangle. Produced by the transform step,
/// consumed by [`rasterize_triangle`], never stored on the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedTriangle {
    pub vertices: [ProjectedVertex; 3],
}

/// Which side of the triangle the middle vertex sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddleSide {
    Left,
    Right,
}

/// Orders three vertices top to bottom with three compare-exchanges.
///
/// Only strictly greater `y` swaps, so vertices with equal `y` keep the
/// relative order they have after the previous exchanges.
pub fn sort_by_y(vertices: [ProjectedVertex; 3]) -> [ProjectedVertex; 3] {
    let [mut p1, mut p2, mut p3] = vertices;
    if p1.position.y > p2.position.y {
        std::mem::swap(&mut p1, &mut p2);
    }
    if p2.position.y > p3.position.y {
        std::mem::swap(&mut p2, &mut p3);
    }
    if p1.position.y > p2.position.y {
        std::mem::swap(&mut p1, &mut p2);
    }
    [p1, p2, p3]
}

/// dx/dy of the edge `from -> to`. A horizontal edge yields ±inf (or NaN for
/// coincident points), which the classification below tolerates.
#[inline]
fn inverse_slope(from: &ProjectedVertex, to: &ProjectedVertex) -> f32 {
    (to.position.x - from.position.x) / (to.position.y - from.position.y)
}

/// Decides on which side the middle vertex lies from the two edges leaving
/// the top vertex. Any comparison involving NaN resolves to `Right`.
pub fn classify_middle(
    top: &ProjectedVertex,
    middle: &ProjectedVertex,
    bottom: &ProjectedVertex,
) -> MiddleSide {
    let slope_top_mid = inverse_slope(top, middle);
    let slope_top_bottom = inverse_slope(top, bottom);
    if slope_top_bottom > slope_top_mid {
        MiddleSide::Left
    } else {
        MiddleSide::Right
    }
}

/// Fills one projected triangle row by row.
///
/// Rows run from `floor(top.y)` to `floor(bottom.y)` inclusive, restricted to
/// the rows the target owns.
pub fn rasterize_triangle<T: RenderTarget>(
    target: &mut T,
    triangle: &ProjectedTriangle,
    texture: &Texture,
) {
    let [p1, p2, p3] = sort_by_y(triangle.vertices);
    let side = classify_middle(&p1, &p2, &p3);

    let rows = target.rows();
    if rows.is_empty() {
        return;
    }
    let y_start = p1.position.y.floor().max(rows.start as f32) as i32;
    let y_end = p3.position.y.floor().min((rows.end - 1) as f32) as i32;

    for y in y_start..=y_end {
        let above_middle = (y as f32) < p2.position.y;
        match (side, above_middle) {
            (MiddleSide::Left, true) => scan_line(target, y, &p1, &p2, &p1, &p3, texture),
            (MiddleSide::Left, false) => scan_line(target, y, &p2, &p3, &p1, &p3, texture),
            (MiddleSide::Right, true) => scan_line(target, y, &p1, &p3, &p1, &p2, texture),
            (MiddleSide::Right, false) => scan_line(target, y, &p1, &p3, &p2, &p3, texture),
        }
    }
}

/// Vertical position of row `y` along an edge. A horizontal edge is pinned
/// to 1 rather than dividing by zero.
#[inline]
fn edge_gradient(y: i32, top: &ProjectedVertex, bottom: &ProjectedVertex) -> f32 {
    if top.position.y == bottom.position.y {
        1.0
    } else {
        (y as f32 - top.position.y) / (bottom.position.y - top.position.y)
    }
}

/// Paints row `y` between the left edge (`left_top -> left_bottom`) and the
/// right edge (`right_top -> right_bottom`).
///
/// x bounds, depth and UV are interpolated down each edge, then again across
/// the row for every pixel in `[left, right)`. Texels are fetched at
/// `(u, 1 - v)` because UV space has its origin at the bottom-left while
/// texture rows start at the top. Colors are truncated, not rounded, to 8 bits.
pub fn scan_line<T: RenderTarget>(
    target: &mut T,
    y: i32,
    left_top: &ProjectedVertex,
    left_bottom: &ProjectedVertex,
    right_top: &ProjectedVertex,
    right_bottom: &ProjectedVertex,
    texture: &Texture,
) {
    let gradient_left = edge_gradient(y, left_top, left_bottom);
    let gradient_right = edge_gradient(y, right_top, right_bottom);

    let left = interpolate(left_top.position.x, left_bottom.position.x, gradient_left) as i32;
    let right = interpolate(right_top.position.x, right_bottom.position.x, gradient_right) as i32;

    let z_start = interpolate(left_top.position.z, left_bottom.position.z, gradient_left);
    let z_end = interpolate(right_top.position.z, right_bottom.position.z, gradient_right);

    let u_start = interpolate(left_top.uv.x, left_bottom.uv.x, gradient_left);
    let u_end = interpolate(right_top.uv.x, right_bottom.uv.x, gradient_right);

    let v_start = interpolate(left_top.uv.y, left_bottom.uv.y, gradient_left);
    let v_end = interpolate(right_top.uv.y, right_bottom.uv.y, gradient_right);

    // Pixels left of 0 or right of the frame would be dropped by the bounds
    // check anyway; the gradient still uses the unclipped span.
    let width = target.viewport().width as i32;
    let x_start = left.max(0);
    let x_end = right.min(width);
    let span = right as f32 - left as f32;

    for x in x_start..x_end {
        let gradient = (x as f32 - left as f32) / span;

        let z = interpolate(z_start, z_end, gradient);
        let u = interpolate(u_start, u_end, gradient);
        let v = interpolate(v_start, v_end, gradient);

        let color = texture.map(u, 1.0 - v);
        target.put_pixel(
            x,
            y,
            z,
            [
                (color.x * 255.0) as u8,
                (color.y * 255.0) as u8,
                (color.z * 255.0) as u8,
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame_buffer::{Device, EMPTY_DEPTH};

    fn pv(x: f32, y: f32, z: f32) -> ProjectedVertex {
        ProjectedVertex::new(Vector3::new(x, y, z), Vector2::new(0.5, 0.5))
    }

    fn covered(device: &Device, y: usize) -> Vec<usize> {
        (0..device.width)
            .filter(|&x| device.depth_at(x, y) != Some(EMPTY_DEPTH))
            .collect()
    }

    #[test]
    fn sort_orders_top_to_bottom() {
        let (a, b, c) = (pv(0.0, 9.0, 1.0), pv(1.0, 2.0, 1.0), pv(2.0, 5.0, 1.0));
        for order in [[a, b, c], [a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
            let sorted = sort_by_y(order);
            assert_eq!(sorted, [b, c, a]);
        }
    }

    #[test]
    fn sort_keeps_submission_order_on_ties() {
        let (a, b, c) = (pv(0.0, 0.0, 1.0), pv(5.0, 0.0, 1.0), pv(2.0, 4.0, 1.0));
        assert_eq!(sort_by_y([a, b, c]), [a, b, c]);
        assert_eq!(sort_by_y([b, a, c]), [b, a, c]);
        // c sinks below both tied vertices without reordering them.
        assert_eq!(sort_by_y([c, a, b]), [a, b, c]);
    }

    #[test]
    fn classifies_middle_vertex_side() {
        let top = pv(10.0, 0.0, 1.0);
        let bottom = pv(10.0, 20.0, 1.0);
        assert_eq!(classify_middle(&top, &pv(0.0, 10.0, 1.0), &bottom), MiddleSide::Left);
        assert_eq!(classify_middle(&top, &pv(20.0, 10.0, 1.0), &bottom), MiddleSide::Right);
        // Flat top: the horizontal edge has infinite slope.
        assert_eq!(
            classify_middle(&pv(10.0, 0.0, 1.0), &pv(30.0, 0.0, 1.0), &pv(20.0, 10.0, 1.0)),
            MiddleSide::Right
        );
    }

    #[test]
    fn flat_top_row_spans_midpoints() {
        let texture = Texture::solid_color([255, 0, 255]);
        let triangle = ProjectedTriangle {
            vertices: [pv(10.0, 0.0, 2.0), pv(30.0, 0.0, 2.0), pv(20.0, 10.0, 2.0)],
        };
        let mut device = Device::new(40, 20);
        rasterize_triangle(&mut device, &triangle, &texture);

        assert_eq!(covered(&device, 5), (15..25).collect::<Vec<_>>());
        for x in 15..25 {
            assert_eq!(device.pixel(x, 5), Some([255, 0, 255]));
        }
        // Nothing below the bottom vertex's row.
        assert!(covered(&device, 11).is_empty());
    }

    #[test]
    fn single_scanline_matches_full_rasterization() {
        let texture = Texture::solid_color([255, 255, 255]);
        let (top_left, top_right, bottom) = (pv(10.0, 0.0, 2.0), pv(30.0, 0.0, 2.0), pv(20.0, 10.0, 2.0));
        let mut device = Device::new(40, 20);
        scan_line(&mut device, 5, &top_left, &bottom, &top_right, &bottom, &texture);
        assert_eq!(covered(&device, 5), (15..25).collect::<Vec<_>>());
        assert!(covered(&device, 4).is_empty());
    }

    #[test]
    fn depth_is_interpolated_across_the_row() {
        let texture = Texture::solid_color([0, 0, 0]);
        let left = pv(0.0, 0.0, 1.0);
        let right = pv(10.0, 0.0, 3.0);
        let mut device = Device::new(16, 4);
        // Horizontal edges: both gradients are pinned to 1.
        scan_line(&mut device, 0, &left, &left, &right, &right, &texture);
        assert_eq!(covered(&device, 0), (0..10).collect::<Vec<_>>());
        assert_eq!(device.depth_at(0, 0), Some(1.0));
        assert_eq!(device.depth_at(5, 0), Some(2.0));
        assert!((device.depth_at(9, 0).unwrap() - 2.8).abs() < 1e-5);
    }

    #[test]
    fn zero_width_row_writes_nothing() {
        let texture = Texture::solid_color([0, 0, 0]);
        let a = pv(5.0, 0.0, 1.0);
        let b = pv(5.0, 8.0, 1.0);
        let mut device = Device::new(16, 16);
        scan_line(&mut device, 4, &a, &b, &a, &b, &texture);
        assert!(device.depth_buffer().iter().all(|&d| d == EMPTY_DEPTH));
    }

    #[test]
    fn degenerate_triangles_do_not_panic() {
        let texture = Texture::solid_color([0, 0, 0]);
        let mut device = Device::new(16, 16);
        let point = pv(4.0, 4.0, 1.0);
        rasterize_triangle(&mut device, &ProjectedTriangle { vertices: [point; 3] }, &texture);
        let line = ProjectedTriangle {
            vertices: [pv(0.0, 3.0, 1.0), pv(8.0, 3.0, 1.0), pv(15.0, 3.0, 1.0)],
        };
        rasterize_triangle(&mut device, &line, &texture);
        let off_screen = ProjectedTriangle {
            vertices: [pv(-1e9, -1e9, 1.0), pv(1e9, -1e9, 1.0), pv(0.0, 1e9, 1.0)],
        };
        rasterize_triangle(&mut device, &off_screen, &texture);
    }

    #[test]
    fn samples_texture_with_flipped_v() {
        // Top row red, bottom row blue.
        let texture = Texture::new(1, 2, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let mut device = Device::new(8, 2);

        let low_v = |x: f32| ProjectedVertex::new(Vector3::new(x, 0.0, 1.0), Vector2::new(0.0, 0.25));
        scan_line(&mut device, 0, &low_v(0.0), &low_v(0.0), &low_v(8.0), &low_v(8.0), &texture);
        assert_eq!(device.pixel(3, 0), Some([0, 0, 255]));

        let high_v = |x: f32| ProjectedVertex::new(Vector3::new(x, 1.0, 1.0), Vector2::new(0.0, 0.75));
        scan_line(&mut device, 1, &high_v(0.0), &high_v(0.0), &high_v(8.0), &high_v(8.0), &texture);
        assert_eq!(device.pixel(3, 1), Some([255, 0, 0]));
    }

    #[test]
    fn colors_are_truncated_to_bytes() {
        // Expected bytes use the same truncating cast, never rounding.
        let texture = Texture::solid_color([128, 1, 254]);
        let color = texture.map(0.0, 0.0);
        let expected = [
            (color.x * 255.0) as u8,
            (color.y * 255.0) as u8,
            (color.z * 255.0) as u8,
        ];
        let mut device = Device::new(4, 1);
        let a = pv(0.0, 0.0, 1.0);
        let b = pv(4.0, 0.0, 1.0);
        scan_line(&mut device, 0, &a, &a, &b, &b, &texture);
        assert_eq!(device.pixel(0, 0), Some(expected));
    }
}
