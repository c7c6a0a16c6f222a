//! Chroma normalization strategies

/// Epsilon added to norms so silent vectors normalize to zero instead of NaN
pub const NORM_EPSILON: f32 = 1e-10;

/// L2-normalize a vector, adding `NORM_EPSILON` to the norm
///
/// # Arguments
///
/// * `values` - Vector to normalize
///
/// # Returns
///
/// Fresh vector with (approximately) unit length; an all-zero input stays all-zero.
pub fn l2_normalize<const N: usize>(values: &[f32; N]) -> [f32; N] {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt() + NORM_EPSILON;
    let mut out = [0.0f32; N];
    for (o, &v) in out.iter_mut().zip(values.iter()) {
        *o = v / norm;
    }
    out
}

/// Scale a vector so its largest element is 1.0 (infinity norm)
///
/// Vectors whose maximum is below `NORM_EPSILON` are returned as zeros.
pub fn max_normalize<const N: usize>(values: &[f32; N]) -> [f32; N] {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max < NORM_EPSILON {
        return [0.0; N];
    }
    let mut out = [0.0f32; N];
    for (o, &v) in out.iter_mut().zip(values.iter()) {
        *o = v / max;
    }
    out
}

/// Dot product of two equal-length vectors
pub fn dot<const N: usize>(a: &[f32; N], b: &[f32; N]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
