//! Error types for the sunsynth-irradiance crate.

use sunsynth_table::TableError;

/// Error type for all fallible operations in the sunsynth-irradiance crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IrradianceError {
    /// Returned when irradiance is requested from a dataset holding neither
    /// irradiance components nor a clearness index.
    #[error("no irradiance components or clearness index to reconstruct irradiance from")]
    NoIrradiance,

    /// Returned when an external model capability fails or returns an
    /// unusable table.
    #[error("{capability} model failed: {reason}")]
    Model {
        /// Name of the capability (`solar_position`, `clear_sky`).
        capability: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a k-star parameter is not finite.
    #[error("{name} must be finite, got {value}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Table construction or lookup failed.
    #[error(transparent)]
    Table(#[from] TableError),
}
