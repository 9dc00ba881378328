//! Error types for the sunsynth-bootstrap crate.

use chrono::TimeDelta;
use lowess::prelude::LowessError;
use sunsynth_pool::{ChunkKey, PoolError};
use sunsynth_table::TableError;

/// Error type for all fallible operations in the sunsynth-bootstrap crate.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Returned when the inputs cannot be bootstrapped.
    #[error("invalid bootstrap input: {reason}")]
    InvalidInput {
        /// What is wrong with the input.
        reason: String,
    },

    /// Returned when the destination index has no fixed frequency.
    #[error("destination index has no fixed frequency")]
    MissingFrequency,

    /// Returned when a selector yields no candidate for a destination chunk.
    #[error("empty pool for destination chunk {key}")]
    EmptyPool {
        /// The destination chunk key.
        key: ChunkKey,
    },

    /// Returned when an error model name is not recognised.
    #[error("unsupported error model '{name}', expected 'additive' or 'multiplicative'")]
    UnsupportedErrorModel {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when the stitching window is not positive.
    #[error("stitch window must be positive, got {window}")]
    InvalidStitchWindow {
        /// The invalid window.
        window: TimeDelta,
    },

    /// Table error.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Pool selection error.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Smoothing error.
    #[error(transparent)]
    Lowess(#[from] LowessError),
}
