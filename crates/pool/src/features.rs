//! Per-chunk feature vectors.

use std::collections::BTreeMap;

use sunsynth_table::{TimeTable, Timestamp};

use crate::error::PoolError;

/// Key of a chunk: the start of its period.
pub type ChunkKey = Timestamp;

/// Fixed-width feature vectors keyed by chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFeatures {
    width: usize,
    rows: BTreeMap<ChunkKey, Vec<f64>>,
}

impl ChunkFeatures {
    /// Creates an empty set of `width`-dimensional features.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: BTreeMap::new(),
        }
    }

    /// Builds features from a table with one row per chunk; every column is
    /// one feature dimension.
    pub fn from_table(table: &TimeTable) -> Self {
        let width = table.n_columns();
        let rows = table
            .index()
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let row = table.columns().iter().map(|c| c.values[i]).collect();
                (*key, row)
            })
            .collect();
        Self { width, rows }
    }

    /// Inserts or replaces the row of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::FeatureDimensionMismatch`] if `row` does not have
    /// `width` entries.
    pub fn insert(&mut self, key: ChunkKey, row: Vec<f64>) -> Result<(), PoolError> {
        if row.len() != self.width {
            return Err(PoolError::FeatureDimensionMismatch {
                expected: self.width,
                got: row.len(),
            });
        }
        self.rows.insert(key, row);
        Ok(())
    }

    /// Returns the row of `key`.
    pub fn get(&self, key: &ChunkKey) -> Option<&[f64]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Returns the feature width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of chunks.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no chunks.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over chunk keys in time order.
    pub fn keys(&self) -> impl Iterator<Item = &ChunkKey> {
        self.rows.keys()
    }
}
