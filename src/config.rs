//! Synthesis configuration, loadable from TOML.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use sunsynth_table::ChunkSize;

use crate::error::SynthError;

/// How a source chunk is chosen for each destination chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMethod {
    /// One chunk drawn with inverse-square feature distance weights.
    Weighted,
    /// The k chunks with the closest features, one drawn uniformly.
    Nearest,
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMethod::Weighted => f.write_str("weighted"),
            SamplingMethod::Nearest => f.write_str("nearest"),
        }
    }
}

impl FromStr for SamplingMethod {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted" => Ok(SamplingMethod::Weighted),
            "nearest" => Ok(SamplingMethod::Nearest),
            other => Err(SynthError::UnsupportedSamplingMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// Parameters of one synthesis run.
///
/// ```toml
/// chunk_size = "D"
/// sampling_method = "nearest"
/// seed = 42
/// nearest_k = 3
/// norm_ord = 2.0
/// ```
///
/// Every key is optional. `chunk_size` and `sampling_method` are checked
/// when the synthesis runs, or earlier with [`validate`](Self::validate).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    #[serde(default = "default_chunk_size")]
    chunk_size: String,
    #[serde(default = "default_sampling_method")]
    sampling_method: String,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_nearest_k")]
    nearest_k: usize,
    #[serde(default = "default_norm_ord")]
    norm_ord: f64,
}

fn default_chunk_size() -> String {
    "D".to_string()
}
fn default_sampling_method() -> String {
    "weighted".to_string()
}
fn default_nearest_k() -> usize {
    1
}
fn default_norm_ord() -> f64 {
    2.0
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            sampling_method: default_sampling_method(),
            seed: None,
            nearest_k: default_nearest_k(),
            norm_ord: default_norm_ord(),
        }
    }
}

impl SynthesisConfig {
    /// Creates the default configuration: daily chunks, weighted sampling,
    /// unseeded, `nearest_k = 1`, L2 distance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, SynthError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, SynthError> {
        let s = std::fs::read_to_string(path).map_err(|source| SynthError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    /// Sets the chunk size specifier (`D`, `W`, `M`, `A`, `6h`, ...).
    pub fn with_chunk_size(mut self, chunk_size: impl Into<String>) -> Self {
        self.chunk_size = chunk_size.into();
        self
    }

    /// Sets the sampling method name.
    pub fn with_sampling_method(mut self, method: impl Into<String>) -> Self {
        self.sampling_method = method.into();
        self
    }

    /// Seeds the bootstrap draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets k for nearest sampling.
    pub fn with_nearest_k(mut self, k: usize) -> Self {
        self.nearest_k = k;
        self
    }

    /// Sets the order of the Lp feature distance.
    pub fn with_norm_ord(mut self, p: f64) -> Self {
        self.norm_ord = p;
        self
    }

    /// Returns the chunk size specifier.
    pub fn chunk_size(&self) -> &str {
        &self.chunk_size
    }

    /// Returns the sampling method name.
    pub fn sampling_method(&self) -> &str {
        &self.sampling_method
    }

    /// Returns the seed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns k for nearest sampling.
    pub fn nearest_k(&self) -> usize {
        self.nearest_k
    }

    /// Returns the order of the Lp feature distance.
    pub fn norm_ord(&self) -> f64 {
        self.norm_ord
    }

    /// Parses the chunk size.
    pub fn chunk(&self) -> Result<ChunkSize, SynthError> {
        Ok(self.chunk_size.parse::<ChunkSize>()?)
    }

    /// Parses the sampling method.
    pub fn sampling(&self) -> Result<SamplingMethod, SynthError> {
        self.sampling_method.parse()
    }

    /// Checks the chunk size and sampling method.
    pub fn validate(&self) -> Result<(), SynthError> {
        self.chunk()?;
        self.sampling()?;
        Ok(())
    }
}
