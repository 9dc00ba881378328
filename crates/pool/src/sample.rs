//! Inverse-square weighting and weighted single draws.

use rand::Rng;

/// Computes `1 / (epsilon + d²)` per distance, with NaN distances weighted 0.
pub(crate) fn inverse_square_weights(dists: &[f64], epsilon: f64) -> Vec<f64> {
    dists
        .iter()
        .map(|&d| {
            let w = 1.0 / (epsilon + d * d);
            if w.is_nan() { 0.0 } else { w }
        })
        .collect()
}

/// Draws one position with probability proportional to `weights`.
///
/// Builds a CDF and uses binary search (`partition_point`). The last CDF
/// entry is forced to 1.0 to eliminate floating-point edge cases.
///
/// # Panics
///
/// Debug-asserts that `weights` is non-empty with a positive sum.
pub(crate) fn weighted_draw(weights: &[f64], rng: &mut impl Rng) -> usize {
    debug_assert!(!weights.is_empty());
    let total: f64 = weights.iter().sum();
    debug_assert!(total > 0.0);

    let mut cdf = Vec::with_capacity(weights.len());
    let mut acc = 0.0;
    for &w in weights {
        acc += w / total;
        cdf.push(acc);
    }
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }

    let u: f64 = rng.random();
    cdf.partition_point(|&c| c < u).min(weights.len() - 1)
}
