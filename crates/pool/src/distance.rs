//! Lp distances between feature vectors.

use crate::features::{ChunkFeatures, ChunkKey};

/// Computes the Lp distance between `a` and `b`.
///
/// ```text
/// p = ∞ : maxⱼ |aⱼ − bⱼ|
/// p ≥ 1 : (Σⱼ |aⱼ − bⱼ|ᵖ)^(1/p)
/// ```
///
/// Any NaN component yields NaN.
pub(crate) fn lp_distance(a: &[f64], b: &[f64], p: f64) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
    if p.is_infinite() {
        let mut acc: f64 = 0.0;
        for d in diffs {
            if d.is_nan() {
                return f64::NAN;
            }
            acc = acc.max(d);
        }
        acc
    } else if p == 2.0 {
        diffs.map(|d| d * d).sum::<f64>().sqrt()
    } else if p == 1.0 {
        diffs.sum()
    } else {
        diffs.map(|d| d.powf(p)).sum::<f64>().powf(1.0 / p)
    }
}

/// Distances from the target row to each candidate's row.
///
/// Candidates without a row have NaN distance.
pub(crate) fn candidate_distances(
    source: &ChunkFeatures,
    candidates: &[ChunkKey],
    target_row: &[f64],
    p: f64,
) -> Vec<f64> {
    candidates
        .iter()
        .map(|key| match source.get(key) {
            Some(row) => lp_distance(row, target_row, p),
            None => f64::NAN,
        })
        .collect()
}
