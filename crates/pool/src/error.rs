//! Error types for the sunsynth-pool crate.

use crate::features::ChunkKey;

/// Error type for all fallible operations in the sunsynth-pool crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PoolError {
    /// Returned when a selector that draws from candidates gets none.
    #[error("no candidate chunks provided")]
    EmptyCandidates,

    /// Returned when the target chunk has no feature row.
    #[error("no feature row for target chunk {key}")]
    UnknownTarget {
        /// The target chunk key.
        key: ChunkKey,
    },

    /// Returned when a feature row has the wrong width.
    #[error("feature width {got} does not match {expected}")]
    FeatureDimensionMismatch {
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// Returned when k is zero.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when the Lp norm order is below 1 or NaN.
    #[error("norm order must be >= 1 or infinite, got {p}")]
    InvalidNorm {
        /// The invalid order.
        p: f64,
    },

    /// Returned by declared selectors without an implementation.
    #[error("{selector} pool selector is not implemented")]
    NotImplemented {
        /// Name of the selector.
        selector: &'static str,
    },
}
