/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f32; 3]; 3], vector: &[f32; 3]) -> [f32; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Rotation matrix for Euler angles applied in X, then Y, then Z order
pub fn euler_rotation(angles: &[f32; 3]) -> [[f32; 3]; 3] {
    let (sin_x, cos_x) = angles[0].sin_cos();
    let (sin_y, cos_y) = angles[1].sin_cos();
    let (sin_z, cos_z) = angles[2].sin_cos();

    let rotation_x = [[1.0, 0.0, 0.0], [0.0, cos_x, -sin_x], [0.0, sin_x, cos_x]];
    let rotation_y = [[cos_y, 0.0, sin_y], [0.0, 1.0, 0.0], [-sin_y, 0.0, cos_y]];
    let rotation_z = [[cos_z, -sin_z, 0.0], [sin_z, cos_z, 0.0], [0.0, 0.0, 1.0]];

    // Intrinsic XYZ: R = Rx * Ry * Rz
    multiply_matrices(&multiply_matrices(&rotation_x, &rotation_y), &rotation_z)
}

/// Inverse of a rotation matrix
pub fn transpose(m: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

pub fn sub(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn add(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn scale(v: &[f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn dot(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(v: &[f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

/// Normalizes a vector, leaving the zero vector untouched
pub fn normalize(v: &[f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len == 0.0 {
        *v
    } else {
        scale(v, 1.0 / len)
    }
}

pub fn distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    length(&sub(a, b))
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Moves `from` by fraction `t` of the remaining distance to `to`
pub fn lerp_vec(from: &[f32; 3], to: &[f32; 3], t: f32) -> [f32; 3] {
    [
        lerp(from[0], to[0], t),
        lerp(from[1], to[1], t),
        lerp(from[2], to[2], t),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-5, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn zero_rotation_is_identity() {
        let m = euler_rotation(&[0.0, 0.0, 0.0]);
        assert_close(multiply_matrix_vector(&m, &[1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn quarter_turn_about_y_maps_x_to_negative_z() {
        let m = euler_rotation(&[0.0, FRAC_PI_2, 0.0]);
        assert_close(multiply_matrix_vector(&m, &[1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn lerp_vec_moves_one_percent() {
        let v = lerp_vec(&[100.0, -50.0, 0.0], &[0.0, 0.0, 0.0], 0.01);
        assert_close(v, [99.0, -49.5, 0.0]);
    }

    #[test]
    fn normalize_keeps_zero_vector() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
        assert_close(normalize(&[3.0, 0.0, 4.0]), [0.6, 0.0, 0.8]);
    }

    #[test]
    fn transpose_inverts_a_rotation() {
        let m = euler_rotation(&[0.3, -1.1, 2.0]);
        let v = [1.0, 2.0, 3.0];
        assert_close(multiply_matrix_vector(&transpose(&m), &multiply_matrix_vector(&m, &v)), v);
    }
}
