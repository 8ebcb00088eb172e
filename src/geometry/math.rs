use nalgebra::Vector3;

/// Clamps an interpolation factor into [0, 1].
#[inline(always)]
pub fn clamp01(value: f32) -> f32 {
    if value < 0.0 {
        0.0
    } else if value > 1.0 {
        1.0
    } else {
        value
    }
}

/// Linear interpolation from `start` to `end`.
///
/// The gradient is always clamped, so float error in the caller can never push
/// the result outside the segment.
#[inline(always)]
pub fn interpolate(start: f32, end: f32, gradient: f32) -> f32 {
    start + (end - start) * clamp01(gradient)
}

/// Rotates `v` around the Y axis (yaw). Mixes x and z.
///
/// x' =  x·cos + z·sin, z' = -x·sin + z·cos
pub fn rotate_y(v: &Vector3<f32>, angle_degrees: f32) -> Vector3<f32> {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vector3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
}

/// Rotates `v` around the X axis (pitch). Mixes y and z.
///
/// y' = y·cos - z·sin, z' = y·sin + z·cos
pub fn rotate_x(v: &Vector3<f32>, angle_degrees: f32) -> Vector3<f32> {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vector3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
}

/// Rotates `v` around the Z axis (roll). Mixes x and y.
///
/// x' = x·cos - y·sin, y' = x·sin + y·cos
pub fn rotate_z(v: &Vector3<f32>, angle_degrees: f32) -> Vector3<f32> {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vector3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

/// Applies Euler angles (degrees) in fixed Y → X → Z order.
///
/// `euler.y` is yaw, `euler.x` pitch and `euler.z` roll. The three axis
/// rotations are composed one after the other, never as a combined matrix.
pub fn rotate_euler(v: &Vector3<f32>, euler: &Vector3<f32>) -> Vector3<f32> {
    let yawed = rotate_y(v, euler.y);
    let pitched = rotate_x(&yawed, euler.x);
    rotate_z(&pitched, euler.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).norm() < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn interpolate_is_exact_at_the_ends() {
        for &(a, b) in &[(0.0, 1.0), (-3.5, 12.25), (100.0, -100.0), (7.0, 7.0)] {
            assert_eq!(interpolate(a, b, 0.0), a);
            assert_eq!(interpolate(a, b, 1.0), b);
        }
    }

    #[test]
    fn interpolate_clamps_overshoot() {
        assert_eq!(interpolate(2.0, 4.0, -0.5), 2.0);
        assert_eq!(interpolate(2.0, 4.0, 1.5), 4.0);
        assert_eq!(interpolate(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn interpolate_is_monotonic_for_increasing_segments() {
        let (a, b) = (-2.0, 9.0);
        let mut previous = interpolate(a, b, 0.0);
        for step in 1..=100 {
            let value = interpolate(a, b, step as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn axis_rotations_follow_right_handed_signs() {
        assert_vec_eq(rotate_y(&Vector3::x(), 90.0), Vector3::new(0.0, 0.0, -1.0));
        assert_vec_eq(rotate_y(&Vector3::z(), 90.0), Vector3::new(1.0, 0.0, 0.0));
        assert_vec_eq(rotate_x(&Vector3::y(), 90.0), Vector3::new(0.0, 0.0, 1.0));
        assert_vec_eq(rotate_x(&Vector3::z(), 90.0), Vector3::new(0.0, -1.0, 0.0));
        assert_vec_eq(rotate_z(&Vector3::x(), 90.0), Vector3::new(0.0, 1.0, 0.0));
        assert_vec_eq(rotate_z(&Vector3::y(), 90.0), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn euler_rotation_applies_yaw_before_pitch() {
        // Yaw first: x -> -z, then pitch: -z -> y.
        let rotated = rotate_euler(&Vector3::x(), &Vector3::new(90.0, 90.0, 0.0));
        assert_vec_eq(rotated, Vector3::new(0.0, 1.0, 0.0));

        // The opposite order would leave x untouched by the pitch and give -z.
        let wrong_order = rotate_y(&rotate_x(&Vector3::x(), 90.0), 90.0);
        assert_vec_eq(wrong_order, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn zero_rotation_is_identity() {
        let v = Vector3::new(1.5, -2.0, 3.25);
        assert_vec_eq(rotate_euler(&v, &Vector3::zeros()), v);
    }
}
