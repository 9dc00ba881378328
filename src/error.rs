//! Error types for the sunsynth crate.

use std::path::PathBuf;

use sunsynth_bootstrap::BootstrapError;
use sunsynth_irradiance::IrradianceError;
use sunsynth_pool::PoolError;
use sunsynth_table::TableError;

/// Error type for synthesis and configuration.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// Returned when a dataset index has no fixed frequency.
    #[error("{which} index has no fixed frequency")]
    MissingFrequency {
        /// `"source"` or `"target"`.
        which: &'static str,
    },

    /// Returned for a sampling method other than `weighted` or `nearest`.
    #[error("unsupported sampling method '{method}', expected 'weighted' or 'nearest'")]
    UnsupportedSamplingMethod {
        /// The requested method.
        method: String,
    },

    /// Returned when the target dataset has no timestamps.
    #[error("target index is empty")]
    EmptyTarget,

    /// Returned when a configuration file cannot be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// The file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a configuration is not valid TOML for [`SynthesisConfig`](crate::SynthesisConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Irradiance dataset error.
    #[error(transparent)]
    Irradiance(#[from] IrradianceError),

    /// Bootstrap error.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// Pool selection error.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Table error.
    #[error(transparent)]
    Table(#[from] TableError),
}
