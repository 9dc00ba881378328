//! Numeric helpers shared by the sunsynth crates.

/// Mean of the finite values of a slice. Returns `NaN` if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}
