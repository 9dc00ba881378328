//! Chunked block bootstrap.

use std::collections::HashMap;

use chrono::TimeDelta;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sunsynth_pool::{ChunkKey, PoolSelector};
use sunsynth_table::{Column, TimeIndex, TimeTable, Timestamp};
use tracing::{debug, debug_span, info};

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::result::{BootstrapResult, ChunkDraw};
use crate::stitch::stitch;

/// Bootstraps `source` onto `destination` chunk by chunk.
///
/// Randomness comes from the configured seed, or from the OS when unseeded.
/// See [`bootstrap_with_rng`].
pub fn bootstrap(
    source: &TimeTable,
    destination: &TimeIndex,
    selector: &PoolSelector,
    config: &BootstrapConfig,
) -> Result<BootstrapResult, BootstrapError> {
    let mut rng = match config.seed() {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    bootstrap_with_rng(source, destination, selector, config, &mut rng)
}

/// Bootstraps `source` onto `destination` with caller-owned randomness.
///
/// 1. `source` is mean-resampled to the destination frequency; incomplete
///    rows are dropped.
/// 2. Source and destination are split into chunks keyed by period start.
/// 3. For each destination chunk, in order, the selector builds a pool from
///    the source chunk keys and one key is drawn uniformly from it.
/// 4. The drawn chunk's rows are matched to the destination chunk's rows by
///    their offset, in whole destination steps, from the respective chunk
///    key. Source rows without a matching destination row are dropped;
///    destination rows without a matching source row are NaN.
/// 5. With stitching enabled, the interior destination chunk keys (all but
///    the first and the last) are smoothed.
///
/// The output index is `destination`.
///
/// # Errors
///
/// - [`BootstrapError::MissingFrequency`] if `destination` has no frequency.
/// - [`BootstrapError::InvalidInput`] if `destination` is empty, `source`
///   has no columns, or no complete source row survives resampling.
/// - [`BootstrapError::EmptyPool`] if a selector returns no key.
/// - Selector, table and smoothing errors are propagated.
#[tracing::instrument(skip_all, fields(chunk = %config.chunk_size(), n_rows = destination.len()))]
pub fn bootstrap_with_rng(
    source: &TimeTable,
    destination: &TimeIndex,
    selector: &PoolSelector,
    config: &BootstrapConfig,
    rng: &mut impl Rng,
) -> Result<BootstrapResult, BootstrapError> {
    let freq = destination.freq().ok_or(BootstrapError::MissingFrequency)?;
    if destination.is_empty() {
        return Err(invalid("destination index is empty"));
    }
    if source.n_columns() == 0 {
        return Err(invalid("source has no columns"));
    }

    let resampled = source.resample_mean(freq)?;
    if resampled.is_empty() {
        return Err(invalid("source has no complete rows at the destination frequency"));
    }

    let chunk = config.chunk_size();
    let groups = resampled.group_by_period(chunk);
    let candidates: Vec<ChunkKey> = groups.iter().map(|(key, _)| *key).collect();
    let dest_groups = TimeTable::new(destination.clone()).group_by_period(chunk);
    let dest_keys: Vec<ChunkKey> = dest_groups.iter().map(|(key, _)| *key).collect();
    info!(
        candidates = candidates.len(),
        destinations = dest_keys.len(),
        selector = selector.name(),
        "bootstrapping"
    );

    let mut columns: Vec<Column> = resampled
        .columns()
        .iter()
        .map(|c| Column::new(c.name.clone(), vec![f64::NAN; destination.len()]))
        .collect();
    let mut draws = Vec::with_capacity(dest_keys.len());

    for (key, slots) in &dest_groups {
        let _span = debug_span!("chunk", destination = %key).entered();
        let pool = selector.get_pool(&candidates, key, rng)?;
        if pool.is_empty() {
            return Err(BootstrapError::EmptyPool { key: *key });
        }
        let drawn = pool[rng.random_range(0..pool.len())];
        let Ok(g) = candidates.binary_search(&drawn) else {
            return Err(invalid("selector returned a key that is not a source chunk"));
        };
        let rows = groups[g].1.clone();

        // Source rows by step offset from their chunk key.
        let by_offset: HashMap<i64, usize> = rows
            .clone()
            .map(|row| (step_offset(&resampled.index().as_slice()[row], &drawn, freq), row))
            .collect();

        let mut placed = 0usize;
        for slot in slots.clone() {
            let offset = step_offset(&destination.as_slice()[slot], key, freq);
            let Some(&row) = by_offset.get(&offset) else {
                continue;
            };
            for (out, column) in columns.iter_mut().zip(resampled.columns()) {
                out.values[slot] = column.values[row];
            }
            placed += 1;
        }
        debug!(source = %drawn, pool = pool.len(), rows = rows.len(), placed, "chunk drawn");
        draws.push(ChunkDraw {
            destination: *key,
            source: drawn,
        });
    }

    let mut table = TimeTable::from_columns(destination.clone(), columns)?;
    if let Some(stitch_config) = config.stitch() {
        let interior = if dest_keys.len() > 2 {
            &dest_keys[1..dest_keys.len() - 1]
        } else {
            &[][..]
        };
        table = stitch(&table, interior, stitch_config)?;
    }

    Ok(BootstrapResult::new(table, draws))
}

/// Whole steps of `freq` from `key` to `t`, rounded down.
fn step_offset(t: &Timestamp, key: &ChunkKey, freq: TimeDelta) -> i64 {
    let step = freq.num_milliseconds().max(1);
    (*t - *key).num_milliseconds().div_euclid(step)
}

fn invalid(reason: &str) -> BootstrapError {
    BootstrapError::InvalidInput {
        reason: reason.to_string(),
    }
}
