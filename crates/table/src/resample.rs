//! Mean resampling, `asfreq` re-alignment and period grouping.

use std::ops::Range;

use chrono::TimeDelta;

use crate::chunk::ChunkSize;
use crate::error::TableError;
use crate::index::{TimeIndex, Timestamp, validate_freq};
use crate::table::{Column, TimeTable};

impl TimeTable {
    /// Resamples to `freq` by averaging the finite values of every bin.
    ///
    /// Bins are keyed by the fixed-duration period start of each row. Bins
    /// in which any column has no finite value are dropped. The result
    /// carries `freq` as its frequency when the surviving bins are regular.
    pub fn resample_mean(&self, freq: TimeDelta) -> Result<Self, TableError> {
        validate_freq(freq)?;
        let chunk = ChunkSize::Fixed(freq);
        let n_cols = self.n_columns();

        let mut keys: Vec<Timestamp> = Vec::new();
        let mut sums: Vec<Vec<(f64, usize)>> = vec![Vec::new(); n_cols];
        for (row, t) in self.index().iter().enumerate() {
            let key = chunk.period_start(t);
            if keys.last() != Some(&key) {
                keys.push(key);
                for acc in &mut sums {
                    acc.push((0.0, 0));
                }
            }
            for (acc, column) in sums.iter_mut().zip(self.columns()) {
                let v = column.values[row];
                if v.is_finite()
                    && let Some(slot) = acc.last_mut()
                {
                    slot.0 += v;
                    slot.1 += 1;
                }
            }
        }

        let keep: Vec<usize> = (0..keys.len())
            .filter(|&b| sums.iter().all(|acc| acc[b].1 > 0))
            .collect();

        let stamps: Vec<Timestamp> = keep.iter().map(|&b| keys[b]).collect();
        let regular = stamps.windows(2).all(|w| w[1] - w[0] == freq);
        let index = if regular {
            TimeIndex::with_freq(stamps, freq)?
        } else {
            TimeIndex::new(stamps)?
        };

        let columns = self
            .columns()
            .iter()
            .zip(&sums)
            .map(|(column, acc)| {
                let values = keep
                    .iter()
                    .map(|&b| acc[b].0 / acc[b].1 as f64)
                    .collect();
                Column::new(column.name.clone(), values)
            })
            .collect();
        Self::from_columns(index, columns)
    }

    /// Re-aligns the table onto a regular `freq` grid from its first to its
    /// last timestamp. Slots without a matching row are `NaN`; rows that do
    /// not fall on the grid are dropped.
    pub fn asfreq(&self, freq: TimeDelta) -> Result<Self, TableError> {
        let (Some(first), Some(last)) = (self.index().first(), self.index().last()) else {
            validate_freq(freq)?;
            return Ok(self.clone());
        };
        let grid = TimeIndex::range(*first, *last, freq)?;
        let mut columns: Vec<Column> = self
            .columns()
            .iter()
            .map(|c| Column::new(c.name.clone(), vec![f64::NAN; grid.len()]))
            .collect();
        for (row, t) in self.index().iter().enumerate() {
            if let Some(slot) = grid.position(t) {
                for (out, column) in columns.iter_mut().zip(self.columns()) {
                    out.values[slot] = column.values[row];
                }
            }
        }
        Self::from_columns(grid, columns)
    }

    /// Groups consecutive rows by chunk key.
    ///
    /// Returns `(key, rows)` pairs in index order.
    pub fn group_by_period(&self, chunk: ChunkSize) -> Vec<(Timestamp, Range<usize>)> {
        let mut groups: Vec<(Timestamp, Range<usize>)> = Vec::new();
        for (row, t) in self.index().iter().enumerate() {
            let key = chunk.period_start(t);
            match groups.last_mut() {
                Some((last, rows)) if *last == key => rows.end = row + 1,
                _ => groups.push((key, row..row + 1)),
            }
        }
        groups
    }
}
