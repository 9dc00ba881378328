//! Pool selection strategies.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tracing::warn;

use crate::distance::candidate_distances;
use crate::error::PoolError;
use crate::features::{ChunkFeatures, ChunkKey};
use crate::sample::{inverse_square_weights, weighted_draw};
use crate::select::select_k_nearest;

/// Added to the squared distance before inversion in the weighted selector.
pub const WEIGHT_EPSILON: f64 = 1e-5;

/// Binary predicate over `(candidate, target)` chunk keys.
pub type ChunkPredicate = dyn Fn(&ChunkKey, &ChunkKey) -> bool + Send + Sync;

/// Strategy that narrows the candidate chunks for one target chunk.
///
/// | Variant | Pool | Random |
/// |---------|------|--------|
/// | `Null` | all candidates | no |
/// | `Predicate` | candidates accepted by the predicate | no |
/// | `WeightedRandom` | one candidate, drawn with weight `1/(ε + d²)` | yes |
/// | `Nearest` | the k closest candidates, nearest first | no |
/// | `Seasonal` | not implemented | |
#[derive(Clone)]
pub enum PoolSelector {
    /// Keeps every candidate.
    Null,
    /// Keeps candidates for which the predicate holds.
    Predicate(Arc<ChunkPredicate>),
    /// Draws a single candidate weighted by feature similarity.
    WeightedRandom(WeightedRandomSelector),
    /// Keeps the k candidates with the closest features.
    Nearest(NearestSelector),
    /// Declared season-aware selector.
    Seasonal(SeasonalSelector),
}

impl fmt::Debug for PoolSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolSelector::Null => f.write_str("Null"),
            PoolSelector::Predicate(_) => f.write_str("Predicate(..)"),
            PoolSelector::WeightedRandom(s) => f.debug_tuple("WeightedRandom").field(s).finish(),
            PoolSelector::Nearest(s) => f.debug_tuple("Nearest").field(s).finish(),
            PoolSelector::Seasonal(s) => f.debug_tuple("Seasonal").field(s).finish(),
        }
    }
}

impl PoolSelector {
    /// Wraps a predicate closure.
    pub fn predicate(f: impl Fn(&ChunkKey, &ChunkKey) -> bool + Send + Sync + 'static) -> Self {
        PoolSelector::Predicate(Arc::new(f))
    }

    /// Short name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            PoolSelector::Null => "null",
            PoolSelector::Predicate(_) => "predicate",
            PoolSelector::WeightedRandom(_) => "weighted",
            PoolSelector::Nearest(_) => "nearest",
            PoolSelector::Seasonal(_) => "seasonal",
        }
    }

    /// Returns the pool of candidate keys for `target`.
    ///
    /// Only `WeightedRandom` consumes randomness.
    pub fn get_pool(
        &self,
        candidates: &[ChunkKey],
        target: &ChunkKey,
        rng: &mut impl Rng,
    ) -> Result<Vec<ChunkKey>, PoolError> {
        match self {
            PoolSelector::Null => Ok(candidates.to_vec()),
            PoolSelector::Predicate(f) => Ok(candidates
                .iter()
                .filter(|&c| f(c, target))
                .copied()
                .collect()),
            PoolSelector::WeightedRandom(s) => s.get_pool(candidates, target, rng),
            PoolSelector::Nearest(s) => s.get_pool(candidates, target),
            PoolSelector::Seasonal(s) => s.get_pool(candidates, target),
        }
    }
}

fn validate_norm(p: f64) -> Result<(), PoolError> {
    if p.is_nan() || p < 1.0 {
        return Err(PoolError::InvalidNorm { p });
    }
    Ok(())
}

fn validate_widths(source: &ChunkFeatures, target: &ChunkFeatures) -> Result<(), PoolError> {
    if source.width() != target.width() {
        return Err(PoolError::FeatureDimensionMismatch {
            expected: target.width(),
            got: source.width(),
        });
    }
    Ok(())
}

fn target_row<'a>(target: &'a ChunkFeatures, key: &ChunkKey) -> Result<&'a [f64], PoolError> {
    target
        .get(key)
        .ok_or(PoolError::UnknownTarget { key: *key })
}

/// Draws one candidate with probability proportional to `1/(ε + d²)`, where
/// `d` is the Lp distance between candidate and target features.
///
/// The returned pool always holds exactly one key. When every weight is
/// zero the draw falls back to uniform and a warning is logged.
#[derive(Debug, Clone)]
pub struct WeightedRandomSelector {
    source: Arc<ChunkFeatures>,
    target: Arc<ChunkFeatures>,
    norm_ord: f64,
}

impl WeightedRandomSelector {
    /// Creates a selector over source and target features with the L2 norm.
    pub fn new(source: Arc<ChunkFeatures>, target: Arc<ChunkFeatures>) -> Self {
        Self {
            source,
            target,
            norm_ord: 2.0,
        }
    }

    /// Sets the order of the Lp norm.
    pub fn with_norm_ord(mut self, p: f64) -> Self {
        self.norm_ord = p;
        self
    }

    /// Returns the order of the Lp norm.
    pub fn norm_ord(&self) -> f64 {
        self.norm_ord
    }

    /// Validates the norm order and feature widths.
    pub fn validate(&self) -> Result<(), PoolError> {
        validate_norm(self.norm_ord)?;
        validate_widths(&self.source, &self.target)
    }

    fn get_pool(
        &self,
        candidates: &[ChunkKey],
        target: &ChunkKey,
        rng: &mut impl Rng,
    ) -> Result<Vec<ChunkKey>, PoolError> {
        self.validate()?;
        if candidates.is_empty() {
            return Err(PoolError::EmptyCandidates);
        }
        let row = target_row(&self.target, target)?;
        let dists = candidate_distances(&self.source, candidates, row, self.norm_ord);
        let mut weights = inverse_square_weights(&dists, WEIGHT_EPSILON);
        if weights.iter().sum::<f64>() == 0.0 {
            warn!(chunk = %target, "degenerate target features, using uniform random sampling");
            weights.fill(1.0);
        }
        let idx = weighted_draw(&weights, rng);
        Ok(vec![candidates[idx]])
    }
}

/// Keeps the k candidates with the smallest Lp feature distance.
///
/// Ties keep candidate order. Candidates without features sort last.
#[derive(Debug, Clone)]
pub struct NearestSelector {
    source: Arc<ChunkFeatures>,
    target: Arc<ChunkFeatures>,
    k: usize,
    norm_ord: f64,
}

impl NearestSelector {
    /// Creates a selector with `k = 1` and the L2 norm.
    pub fn new(source: Arc<ChunkFeatures>, target: Arc<ChunkFeatures>) -> Self {
        Self {
            source,
            target,
            k: 1,
            norm_ord: 2.0,
        }
    }

    /// Sets the number of neighbours kept.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the order of the Lp norm.
    pub fn with_norm_ord(mut self, p: f64) -> Self {
        self.norm_ord = p;
        self
    }

    /// Returns k.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the order of the Lp norm.
    pub fn norm_ord(&self) -> f64 {
        self.norm_ord
    }

    /// Validates k, the norm order and feature widths.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.k < 1 {
            return Err(PoolError::InvalidK { k: self.k });
        }
        validate_norm(self.norm_ord)?;
        validate_widths(&self.source, &self.target)
    }

    fn get_pool(
        &self,
        candidates: &[ChunkKey],
        target: &ChunkKey,
    ) -> Result<Vec<ChunkKey>, PoolError> {
        self.validate()?;
        if candidates.is_empty() {
            return Err(PoolError::EmptyCandidates);
        }
        let row = target_row(&self.target, target)?;
        let dists = candidate_distances(&self.source, candidates, row, self.norm_ord);
        Ok(select_k_nearest(&dists, self.k)
            .into_iter()
            .map(|i| candidates[i])
            .collect())
    }
}

/// Season-aware selector. Declared without an implementation:
/// [`PoolSelector::get_pool`] returns [`PoolError::NotImplemented`].
#[derive(Debug, Clone, Default)]
pub struct SeasonalSelector {
    k: usize,
}

impl SeasonalSelector {
    /// Creates the selector.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Returns k.
    pub fn k(&self) -> usize {
        self.k
    }

    fn get_pool(
        &self,
        _candidates: &[ChunkKey],
        _target: &ChunkKey,
    ) -> Result<Vec<ChunkKey>, PoolError> {
        Err(PoolError::NotImplemented {
            selector: "seasonal",
        })
    }
}
