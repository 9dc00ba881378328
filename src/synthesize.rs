//! The synthesis pipeline.

use std::sync::Arc;

use sunsynth_bootstrap::{BootstrapConfig, bootstrap};
use sunsynth_irradiance::{Component, Family, IrradianceDataset};
use sunsynth_pool::{NearestSelector, PoolSelector, WeightedRandomSelector};
use sunsynth_table::{TimeIndex, TimeTable};
use tracing::info;

use crate::config::{SamplingMethod, SynthesisConfig};
use crate::error::SynthError;
use crate::feature::{FEATURE_COLUMN, FeatureSpace, MeanClearness};

/// Synthesises irradiance for a target site and period by resampling the
/// soft clearness index of a high-resolution source dataset.
#[derive(Debug)]
pub struct IrradianceSynthesizer {
    source: IrradianceDataset,
}

impl IrradianceSynthesizer {
    /// Creates a synthesizer over a source dataset.
    pub fn new(source: IrradianceDataset) -> Self {
        Self { source }
    }

    /// Returns the source dataset.
    pub fn source(&self) -> &IrradianceDataset {
        &self.source
    }

    /// Consumes the synthesizer and returns the source dataset with its
    /// materialised cache.
    pub fn into_source(self) -> IrradianceDataset {
        self.source
    }

    /// Synthesises with [`MeanClearness`] features.
    pub fn synthesize(
        &mut self,
        target: &mut IrradianceDataset,
        config: &SynthesisConfig,
    ) -> Result<IrradianceDataset, SynthError> {
        self.synthesize_with(target, config, &MeanClearness)
    }

    /// Synthesises a dataset over the target's time span at the source
    /// frequency, bound to the target's location.
    ///
    /// 1. Soft clearness of the target, and of the source mean-resampled to
    ///    the target frequency.
    /// 2. Per-chunk features of both through `feature_space`.
    /// 3. A weighted or nearest pool selector over those features.
    /// 4. The source passthrough columns plus its soft clearness, renamed
    ///    `k_*`, are bootstrapped onto the destination index spanning the
    ///    target at the source frequency, without stitching.
    /// 5. The result is re-aligned to the source frequency and wrapped as a
    ///    dataset sharing the target's location and models. Its `k_*`
    ///    columns populate the clearness family, so
    ///    [`IrradianceDataset::irradiance`] rebuilds irradiance from them.
    ///
    /// # Errors
    ///
    /// - [`SynthError::UnsupportedSamplingMethod`] for an unknown method.
    /// - [`SynthError::MissingFrequency`] if either index lacks a frequency.
    /// - [`SynthError::EmptyTarget`] if the target has no timestamps.
    /// - Dataset, selector and bootstrap errors are propagated.
    #[tracing::instrument(
        skip_all,
        fields(method = config.sampling_method(), chunk = config.chunk_size())
    )]
    pub fn synthesize_with<F: FeatureSpace + ?Sized>(
        &mut self,
        target: &mut IrradianceDataset,
        config: &SynthesisConfig,
        feature_space: &F,
    ) -> Result<IrradianceDataset, SynthError> {
        let method = config.sampling()?;
        let chunk = config.chunk()?;
        let source_freq = self
            .source
            .index()
            .freq()
            .ok_or(SynthError::MissingFrequency { which: "source" })?;
        let target_freq = target
            .index()
            .freq()
            .ok_or(SynthError::MissingFrequency { which: "target" })?;
        let (Some(first), Some(last)) = (target.index().first(), target.index().last()) else {
            return Err(SynthError::EmptyTarget);
        };
        let destination = TimeIndex::range(*first, *last, source_freq)?;

        let target_k = feature_input(&target.soft_clearness()?)?;
        let source_k_star = self.source.soft_clearness()?;
        let source_k = feature_input(&source_k_star)?.resample_mean(target_freq)?;

        let source_features = Arc::new(feature_space.features(&source_k, chunk)?);
        let target_features = Arc::new(feature_space.features(&target_k, chunk)?);
        info!(
            source_chunks = source_features.len(),
            target_chunks = target_features.len(),
            "features computed"
        );

        let selector = match method {
            SamplingMethod::Weighted => PoolSelector::WeightedRandom(
                WeightedRandomSelector::new(source_features, target_features)
                    .with_norm_ord(config.norm_ord()),
            ),
            SamplingMethod::Nearest => PoolSelector::Nearest(
                NearestSelector::new(source_features, target_features)
                    .with_k(config.nearest_k())
                    .with_norm_ord(config.norm_ord()),
            ),
        };

        let payload = bootstrap_payload(self.source.table(), &source_k_star)?;
        let mut bootstrap_config = BootstrapConfig::new(chunk);
        if let Some(seed) = config.seed() {
            bootstrap_config = bootstrap_config.with_seed(seed);
        }
        let result = bootstrap(&payload, &destination, &selector, &bootstrap_config)?;
        info!(draws = result.draws().len(), rows = destination.len(), "synthesis complete");

        let table = result.into_table().asfreq(source_freq)?;
        Ok(target.rebind(table))
    }
}

/// The feature column of a soft clearness table.
fn feature_input(k_star: &TimeTable) -> Result<TimeTable, SynthError> {
    k_star.require(FEATURE_COLUMN)?;
    Ok(k_star.select(&[FEATURE_COLUMN]))
}

/// Source passthrough columns plus the soft clearness index as `k_*`.
fn bootstrap_payload(raw: &TimeTable, k_star: &TimeTable) -> Result<TimeTable, SynthError> {
    let mut payload = raw.clone();
    payload.retain_columns(|name| Component::from_name(name).is_none());
    let clearness = k_star.add_prefix(Family::Clearness.prefix());
    for column in clearness.columns() {
        payload.insert_column(column.name.clone(), column.values.clone())?;
    }
    Ok(payload)
}
