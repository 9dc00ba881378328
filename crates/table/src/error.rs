//! Error types for the sunsynth-table crate.

use chrono::TimeDelta;

/// Error type for all fallible operations in the sunsynth-table crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Returned when timestamps are not strictly increasing.
    #[error("index is not strictly increasing at position {position}")]
    NonMonotonicIndex {
        /// Position of the first timestamp that is not after its predecessor.
        position: usize,
    },

    /// Returned when a step of a fixed-frequency index differs from the frequency.
    #[error("index step at position {position} does not match frequency {freq}")]
    IrregularStep {
        /// Position of the first irregular timestamp.
        position: usize,
        /// The declared frequency.
        freq: TimeDelta,
    },

    /// Returned when a frequency is not a positive whole number of seconds.
    #[error("invalid frequency {freq}: must be a positive whole number of seconds")]
    InvalidFrequency {
        /// The rejected frequency.
        freq: TimeDelta,
    },

    /// Returned when an offset string cannot be parsed.
    #[error("invalid offset string: {value:?}")]
    InvalidOffset {
        /// The unparseable input.
        value: String,
    },

    /// Returned when a column length does not match the index length.
    #[error("column {column}: expected {expected} values, got {got}")]
    LengthMismatch {
        /// Name of the offending column.
        column: String,
        /// Index length.
        expected: usize,
        /// Column length.
        got: usize,
    },

    /// Returned when a required column is absent.
    #[error("missing column: {column}")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },
}
