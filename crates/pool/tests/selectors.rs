//! Integration tests for the pool selectors.

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone};
use chrono_tz::UTC;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sunsynth_pool::{
    ChunkFeatures, ChunkKey, NearestSelector, PoolError, PoolSelector, WeightedRandomSelector,
};

fn day_keys(n: usize) -> Vec<ChunkKey> {
    let start = UTC.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
    (0..n as i64).map(|d| start + TimeDelta::days(d)).collect()
}

fn scalar_features(keys: &[ChunkKey], values: &[f64]) -> Arc<ChunkFeatures> {
    let mut f = ChunkFeatures::new(1);
    for (key, v) in keys.iter().zip(values) {
        f.insert(*key, vec![*v]).unwrap();
    }
    Arc::new(f)
}

/// Helper: run many seeded trials and count how often each candidate is drawn.
fn draw_counts(
    selector: &PoolSelector,
    keys: &[ChunkKey],
    target: &ChunkKey,
    n: usize,
) -> Vec<usize> {
    let mut counts = vec![0usize; keys.len()];
    for trial in 0..n {
        let mut rng = StdRng::seed_from_u64(trial as u64);
        let pool = selector.get_pool(keys, target, &mut rng).unwrap();
        assert_eq!(pool.len(), 1);
        let pos = keys.iter().position(|k| *k == pool[0]).unwrap();
        counts[pos] += 1;
    }
    counts
}

#[test]
fn nearest_returns_k_sorted_by_distance() {
    let keys = day_keys(6);
    let source = scalar_features(&keys, &[0.10, 0.60, 0.45, 0.90, 0.52, 0.30]);
    let target = scalar_features(&keys[..1], &[0.50]);
    let selector = PoolSelector::Nearest(NearestSelector::new(source, target).with_k(3));
    let mut rng = StdRng::seed_from_u64(0);

    let pool = selector.get_pool(&keys, &keys[0], &mut rng).unwrap();

    // Distances: 0.40, 0.10, 0.05, 0.40, 0.02, 0.20
    assert_eq!(pool, vec![keys[4], keys[2], keys[1]]);
}

#[test]
fn nearest_multivariate_l1_and_linf() {
    let keys = day_keys(2);
    let mut source = ChunkFeatures::new(2);
    source.insert(keys[0], vec![0.0, 0.9]).unwrap();
    source.insert(keys[1], vec![0.5, 0.5]).unwrap();
    let mut target = ChunkFeatures::new(2);
    target.insert(keys[0], vec![0.0, 0.0]).unwrap();
    let (source, target) = (Arc::new(source), Arc::new(target));
    let mut rng = StdRng::seed_from_u64(0);

    // L1: 0.9 vs 1.0. L∞: 0.9 vs 0.5.
    let l1 = PoolSelector::Nearest(
        NearestSelector::new(source.clone(), target.clone()).with_norm_ord(1.0),
    );
    assert_eq!(l1.get_pool(&keys, &keys[0], &mut rng).unwrap(), vec![keys[0]]);

    let linf = PoolSelector::Nearest(
        NearestSelector::new(source, target).with_norm_ord(f64::INFINITY),
    );
    assert_eq!(linf.get_pool(&keys, &keys[0], &mut rng).unwrap(), vec![keys[1]]);
}

#[test]
fn nearest_puts_featureless_candidates_last() {
    let keys = day_keys(3);
    let source = scalar_features(&keys[1..], &[0.8, 0.2]);
    let target = scalar_features(&keys[..1], &[0.0]);
    let selector = PoolSelector::Nearest(NearestSelector::new(source, target).with_k(3));
    let mut rng = StdRng::seed_from_u64(0);

    let pool = selector.get_pool(&keys, &keys[0], &mut rng).unwrap();
    assert_eq!(pool, vec![keys[2], keys[1], keys[0]]);
}

/// The closest candidate dominates: weight 1e5 against roughly 100 and 1.
#[test]
fn weighted_prefers_similar_chunks() {
    let keys = day_keys(3);
    let source = scalar_features(&keys, &[0.0, 0.1, 1.0]);
    let target = scalar_features(&keys[..1], &[0.0]);
    let selector = PoolSelector::WeightedRandom(WeightedRandomSelector::new(source, target));

    let n = 2000;
    let counts = draw_counts(&selector, &keys, &keys[0], n);
    assert!(
        counts[0] as f64 > 0.99 * n as f64,
        "closest candidate drawn {} of {n}",
        counts[0]
    );
}

/// NaN target features zero every weight; the draw becomes uniform.
#[test]
fn weighted_falls_back_to_uniform() {
    let keys = day_keys(4);
    let source = scalar_features(&keys, &[0.2, 0.4, 0.6, 0.8]);
    let target = scalar_features(&keys[..1], &[f64::NAN]);
    let selector = PoolSelector::WeightedRandom(WeightedRandomSelector::new(source, target));

    let counts = draw_counts(&selector, &keys, &keys[0], 4000);
    for &c in &counts {
        assert!((800..=1200).contains(&c), "uniform count {c} not in 800..1200");
    }
}

#[test]
fn weighted_is_reproducible_with_seed() {
    let keys = day_keys(8);
    let values: Vec<f64> = (0..8).map(|i| (i as f64 * 0.37).sin().abs()).collect();
    let source = scalar_features(&keys, &values);
    let target = scalar_features(&keys, &values);
    let selector = PoolSelector::WeightedRandom(WeightedRandomSelector::new(source, target));

    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        keys.iter()
            .map(|t| selector.get_pool(&keys, t, &mut rng).unwrap()[0])
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn empty_candidates_are_rejected() {
    let keys = day_keys(1);
    let f = scalar_features(&keys, &[0.5]);
    let mut rng = StdRng::seed_from_u64(0);
    for selector in [
        PoolSelector::WeightedRandom(WeightedRandomSelector::new(f.clone(), f.clone())),
        PoolSelector::Nearest(NearestSelector::new(f.clone(), f.clone())),
    ] {
        assert!(matches!(
            selector.get_pool(&[], &keys[0], &mut rng),
            Err(PoolError::EmptyCandidates)
        ));
    }
}

#[test]
fn null_and_predicate_keep_order() {
    let keys = day_keys(10);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(PoolSelector::Null.get_pool(&keys, &keys[3], &mut rng).unwrap(), keys);

    // Same weekday as the target.
    let same_weekday = PoolSelector::predicate(|c, t| (*c - *t).num_days() % 7 == 0);
    let pool = same_weekday.get_pool(&keys, &keys[1], &mut rng).unwrap();
    assert_eq!(pool, vec![keys[1], keys[8]]);
}
