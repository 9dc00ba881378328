//! Bootstrap parameters.

use sunsynth_table::ChunkSize;

use crate::stitch::StitchConfig;

/// Configuration of a bootstrap run.
///
/// # Example
///
/// ```
/// use sunsynth_bootstrap::{BootstrapConfig, StitchConfig};
/// use sunsynth_table::ChunkSize;
///
/// let config = BootstrapConfig::new(ChunkSize::Day)
///     .with_seed(42)
///     .with_stitch(StitchConfig::new());
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    chunk_size: ChunkSize,
    seed: Option<u64>,
    stitch: Option<StitchConfig>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::new(ChunkSize::Day)
    }
}

impl BootstrapConfig {
    /// Creates an unseeded configuration without stitching.
    pub fn new(chunk_size: ChunkSize) -> Self {
        Self {
            chunk_size,
            seed: None,
            stitch: None,
        }
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Seeds the draw sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables boundary stitching.
    pub fn with_stitch(mut self, stitch: StitchConfig) -> Self {
        self.stitch = Some(stitch);
        self
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Returns the seed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the stitching parameters, if enabled.
    pub fn stitch(&self) -> Option<&StitchConfig> {
        self.stitch.as_ref()
    }
}
