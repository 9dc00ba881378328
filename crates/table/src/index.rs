//! Strictly increasing time index with an optional fixed frequency.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::chunk::ChunkSize;
use crate::error::TableError;

/// A timezone-aware instant.
pub type Timestamp = DateTime<Tz>;

/// Ordered timestamps of a table, optionally tagged with a fixed frequency.
///
/// A frequency is only attached when every step between consecutive
/// timestamps equals it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeIndex {
    stamps: Vec<Timestamp>,
    freq: Option<TimeDelta>,
}

impl TimeIndex {
    /// Creates an index without a frequency.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NonMonotonicIndex`] if the timestamps are not
    /// strictly increasing.
    pub fn new(stamps: Vec<Timestamp>) -> Result<Self, TableError> {
        if let Some(position) = stamps
            .windows(2)
            .position(|w| w[1] <= w[0])
            .map(|p| p + 1)
        {
            return Err(TableError::NonMonotonicIndex { position });
        }
        Ok(Self { stamps, freq: None })
    }

    /// Creates an index whose steps all equal `freq`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidFrequency`] for a non-positive or
    /// sub-second frequency and [`TableError::IrregularStep`] when a step
    /// differs from `freq`.
    pub fn with_freq(stamps: Vec<Timestamp>, freq: TimeDelta) -> Result<Self, TableError> {
        validate_freq(freq)?;
        if let Some(position) = stamps
            .windows(2)
            .position(|w| w[1] - w[0] != freq)
            .map(|p| p + 1)
        {
            return Err(TableError::IrregularStep { position, freq });
        }
        Ok(Self {
            stamps,
            freq: Some(freq),
        })
    }

    /// Creates a fixed-frequency index from `start` to `end` inclusive.
    ///
    /// The last timestamp is the latest `start + n * freq` not after `end`.
    /// An `end` before `start` yields an empty index.
    pub fn range(start: Timestamp, end: Timestamp, freq: TimeDelta) -> Result<Self, TableError> {
        validate_freq(freq)?;
        let mut stamps = Vec::new();
        let mut current = start;
        while current <= end {
            stamps.push(current);
            current += freq;
        }
        Ok(Self {
            stamps,
            freq: Some(freq),
        })
    }

    /// Creates a fixed-frequency index of `n` timestamps starting at `start`.
    pub fn periods(start: Timestamp, n: usize, freq: TimeDelta) -> Result<Self, TableError> {
        validate_freq(freq)?;
        let mut stamps = Vec::with_capacity(n);
        let mut current = start;
        for _ in 0..n {
            stamps.push(current);
            current += freq;
        }
        Ok(Self {
            stamps,
            freq: Some(freq),
        })
    }

    /// Attaches a frequency when every step between timestamps is equal.
    ///
    /// Indexes with fewer than two timestamps are returned unchanged.
    pub fn infer_freq(mut self) -> Self {
        if self.freq.is_some() || self.stamps.len() < 2 {
            return self;
        }
        let step = self.stamps[1] - self.stamps[0];
        if validate_freq(step).is_ok() && self.stamps.windows(2).all(|w| w[1] - w[0] == step) {
            self.freq = Some(step);
        }
        self
    }

    /// Returns the fixed frequency, if any.
    pub fn freq(&self) -> Option<TimeDelta> {
        self.freq
    }

    /// Returns the number of timestamps.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns `true` if the index holds no timestamps.
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Returns the first timestamp.
    pub fn first(&self) -> Option<&Timestamp> {
        self.stamps.first()
    }

    /// Returns the last timestamp.
    pub fn last(&self) -> Option<&Timestamp> {
        self.stamps.last()
    }

    /// Returns the timestamp at position `i`.
    pub fn get(&self, i: usize) -> Option<&Timestamp> {
        self.stamps.get(i)
    }

    /// Returns the timestamps as a slice.
    pub fn as_slice(&self) -> &[Timestamp] {
        &self.stamps
    }

    /// Iterates over the timestamps.
    pub fn iter(&self) -> std::slice::Iter<'_, Timestamp> {
        self.stamps.iter()
    }

    /// Returns the zone of the first timestamp.
    pub fn tz(&self) -> Option<Tz> {
        self.stamps.first().map(|t| t.timezone())
    }

    /// Returns the position of `t`, if present.
    pub fn position(&self, t: &Timestamp) -> Option<usize> {
        self.stamps.binary_search(t).ok()
    }

    /// Returns the number of timestamps strictly before `t`.
    pub fn lower_bound(&self, t: &Timestamp) -> usize {
        self.stamps.partition_point(|s| s < t)
    }

    /// Returns the distinct chunk keys covering this index, in order.
    pub fn period_keys(&self, chunk: ChunkSize) -> Vec<Timestamp> {
        let mut keys: Vec<Timestamp> = Vec::new();
        for t in &self.stamps {
            let key = chunk.period_start(t);
            if keys.last() != Some(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Returns the sub-index of positions `range`, keeping the frequency.
    pub(crate) fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            stamps: self.stamps[range].to_vec(),
            freq: self.freq,
        }
    }
}

impl<'a> IntoIterator for &'a TimeIndex {
    type Item = &'a Timestamp;
    type IntoIter = std::slice::Iter<'a, Timestamp>;

    fn into_iter(self) -> Self::IntoIter {
        self.stamps.iter()
    }
}

/// Checks that `freq` is a positive whole number of seconds.
pub(crate) fn validate_freq(freq: TimeDelta) -> Result<(), TableError> {
    if freq <= TimeDelta::zero() || freq.subsec_nanos() != 0 {
        return Err(TableError::InvalidFrequency { freq });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Australia::Darwin;

    fn t(h: u32, m: u32) -> Timestamp {
        Darwin.with_ymd_and_hms(2020, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn new_rejects_unsorted() {
        let err = TimeIndex::new(vec![t(0, 0), t(0, 10), t(0, 5)]).unwrap_err();
        assert_eq!(err, TableError::NonMonotonicIndex { position: 2 });
    }

    #[test]
    fn new_rejects_duplicates() {
        let err = TimeIndex::new(vec![t(0, 0), t(0, 0)]).unwrap_err();
        assert_eq!(err, TableError::NonMonotonicIndex { position: 1 });
    }

    #[test]
    fn with_freq_rejects_gaps() {
        let err = TimeIndex::with_freq(vec![t(0, 0), t(0, 5), t(0, 15)], TimeDelta::minutes(5))
            .unwrap_err();
        assert!(matches!(err, TableError::IrregularStep { position: 2, .. }));
    }

    #[test]
    fn range_is_inclusive() {
        let ix = TimeIndex::range(t(0, 0), t(1, 0), TimeDelta::minutes(5)).unwrap();
        assert_eq!(ix.len(), 13);
        assert_eq!(ix.last(), Some(&t(1, 0)));
        assert_eq!(ix.freq(), Some(TimeDelta::minutes(5)));
    }

    #[test]
    fn range_end_before_start_is_empty() {
        let ix = TimeIndex::range(t(1, 0), t(0, 0), TimeDelta::minutes(5)).unwrap();
        assert!(ix.is_empty());
    }

    #[test]
    fn range_rejects_bad_freq() {
        assert!(TimeIndex::range(t(0, 0), t(1, 0), TimeDelta::zero()).is_err());
        assert!(TimeIndex::range(t(0, 0), t(1, 0), TimeDelta::milliseconds(1500)).is_err());
    }

    #[test]
    fn infer_freq_regular() {
        let ix = TimeIndex::new(vec![t(0, 0), t(0, 5), t(0, 10)])
            .unwrap()
            .infer_freq();
        assert_eq!(ix.freq(), Some(TimeDelta::minutes(5)));
    }

    #[test]
    fn infer_freq_irregular() {
        let ix = TimeIndex::new(vec![t(0, 0), t(0, 5), t(0, 15)])
            .unwrap()
            .infer_freq();
        assert_eq!(ix.freq(), None);
    }

    #[test]
    fn position_and_lower_bound() {
        let ix = TimeIndex::range(t(0, 0), t(1, 0), TimeDelta::minutes(5)).unwrap();
        assert_eq!(ix.position(&t(0, 30)), Some(6));
        assert_eq!(ix.position(&t(0, 31)), None);
        assert_eq!(ix.lower_bound(&t(0, 31)), 7);
        assert_eq!(ix.lower_bound(&t(0, 0)), 0);
    }

    #[test]
    fn period_keys_are_distinct_and_ordered() {
        let start = Darwin.with_ymd_and_hms(2020, 1, 1, 6, 0, 0).unwrap();
        let ix = TimeIndex::periods(start, 72, TimeDelta::hours(1)).unwrap();
        let keys = ix.period_keys(ChunkSize::Day);
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], Darwin.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(keys[3], Darwin.with_ymd_and_hms(2020, 1, 4, 0, 0, 0).unwrap());
    }
}
