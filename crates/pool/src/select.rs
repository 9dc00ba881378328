//! Top-k nearest candidate selection.

use std::cmp::Ordering;

/// Orders distances ascending with NaN last.
fn nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Returns the positions of the `k` smallest distances, nearest first.
///
/// The sort is stable, so ties keep candidate order. NaN distances sort
/// last. Fewer than `k` positions are returned when there are fewer
/// candidates.
pub(crate) fn select_k_nearest(dists: &[f64], k: usize) -> Vec<usize> {
    let mut pairs: Vec<(f64, usize)> = dists
        .iter()
        .copied()
        .enumerate()
        .map(|(i, d)| (d, i))
        .collect();
    pairs.sort_by(|a, b| nan_last(a.0, b.0));
    pairs.truncate(k);
    pairs.into_iter().map(|(_, i)| i).collect()
}
