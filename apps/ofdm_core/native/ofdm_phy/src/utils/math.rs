//! Small DSP math helpers

use rustfft::num_complex::Complex64;

/// Convert a power ratio in dB to linear scale
#[inline]
pub fn db_to_power_ratio(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Mean of |x|² over a block of samples (0 for an empty block)
pub fn mean_power(samples: &[Complex64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.norm_sqr()).sum::<f64>() / samples.len() as f64
}

/// Piecewise-linear interpolation of `(xs, ys)` evaluated at `x`.
///
/// `xs` must be strictly ascending with at least two entries and
/// `xs[0] <= x <= xs[last]`; callers validate the anchors once up front.
pub fn interp_linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(xs.len() >= 2);

    // First segment whose right anchor is >= x
    let seg = match xs[1..].iter().position(|&right| x <= right) {
        Some(pos) => pos,
        None => xs.len() - 2,
    };
    let (x0, x1) = (xs[seg], xs[seg + 1]);
    let (y0, y1) = (ys[seg], ys[seg + 1]);
    let t = (x - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}
