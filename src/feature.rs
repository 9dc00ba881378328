//! Per-chunk feature vectors from a soft clearness index series.

use sunsynth_pool::ChunkFeatures;
use sunsynth_stats::nan_mean;
use sunsynth_table::{ChunkSize, TimeTable};

use crate::error::SynthError;

/// Column the features are computed from.
pub const FEATURE_COLUMN: &str = "ghi";

/// Maps a soft clearness index table to one feature vector per chunk.
///
/// Implemented for closures with the same signature as
/// [`features`](Self::features).
pub trait FeatureSpace {
    /// Computes the features of every chunk of `k_star`.
    fn features(&self, k_star: &TimeTable, chunk: ChunkSize) -> Result<ChunkFeatures, SynthError>;
}

impl<F> FeatureSpace for F
where
    F: Fn(&TimeTable, ChunkSize) -> Result<ChunkFeatures, SynthError>,
{
    fn features(&self, k_star: &TimeTable, chunk: ChunkSize) -> Result<ChunkFeatures, SynthError> {
        self(k_star, chunk)
    }
}

/// Mean soft clearness of each chunk, a single feature.
///
/// For daily chunks, values of exactly 1.0 (night, where the soft clearness
/// index is pinned to 1) are treated as missing before averaging.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanClearness;

impl FeatureSpace for MeanClearness {
    fn features(&self, k_star: &TimeTable, chunk: ChunkSize) -> Result<ChunkFeatures, SynthError> {
        let values = k_star.require(FEATURE_COLUMN)?;
        let mut features = ChunkFeatures::new(1);
        for (key, rows) in k_star.group_by_period(chunk) {
            let chunk_values: Vec<f64> = values[rows]
                .iter()
                .map(|&v| {
                    if chunk == ChunkSize::Day && v == 1.0 {
                        f64::NAN
                    } else {
                        v
                    }
                })
                .collect();
            features.insert(key, vec![nan_mean(&chunk_values)])?;
        }
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, TimeZone};
    use chrono_tz::UTC;
    use sunsynth_pool::ChunkKey;
    use sunsynth_table::TimeIndex;

    fn start() -> ChunkKey {
        UTC.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap()
    }

    fn k_star(values: Vec<f64>) -> TimeTable {
        let index = TimeIndex::periods(start(), values.len(), TimeDelta::hours(6)).unwrap();
        TimeTable::new(index).with_column("ghi", values).unwrap()
    }

    #[test]
    fn daily_mean_ignores_night() {
        let table = k_star(vec![1.0, 0.4, 0.6, 1.0, 1.0, 0.2, 0.2, 1.0]);
        let f = MeanClearness.features(&table, ChunkSize::Day).unwrap();
        assert_eq!(f.len(), 2);
        assert_abs_diff_eq!(f.get(&start()).unwrap()[0], 0.5, epsilon = 1e-12);
        let day2 = start() + TimeDelta::days(1);
        assert_abs_diff_eq!(f.get(&day2).unwrap()[0], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn all_night_day_is_nan() {
        let table = k_star(vec![1.0; 4]);
        let f = MeanClearness.features(&table, ChunkSize::Day).unwrap();
        assert!(f.get(&start()).unwrap()[0].is_nan());
    }

    #[test]
    fn other_chunks_keep_ones() {
        let table = k_star(vec![1.0, 0.5, 1.0, 0.5]);
        let twelve_hours = ChunkSize::Fixed(TimeDelta::hours(12));
        let f = MeanClearness.features(&table, twelve_hours).unwrap();
        assert_abs_diff_eq!(f.get(&start()).unwrap()[0], 0.75, epsilon = 1e-12);
    }

    #[test]
    fn missing_column_is_an_error() {
        let index = TimeIndex::periods(start(), 2, TimeDelta::hours(6)).unwrap();
        let table = TimeTable::new(index).with_column("dni", vec![0.5, 0.5]).unwrap();
        assert!(matches!(
            MeanClearness.features(&table, ChunkSize::Day),
            Err(SynthError::Table(_))
        ));
    }

    #[test]
    fn closures_are_feature_spaces() {
        let constant = |table: &TimeTable, chunk: ChunkSize| -> Result<ChunkFeatures, SynthError> {
            let mut f = ChunkFeatures::new(2);
            for key in table.index().period_keys(chunk) {
                f.insert(key, vec![0.0, 1.0])?;
            }
            Ok(f)
        };
        let f = constant.features(&k_star(vec![0.5; 8]), ChunkSize::Day).unwrap();
        assert_eq!(f.width(), 2);
        assert_eq!(f.len(), 2);
    }
}
