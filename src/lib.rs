//! # sunsynth
//!
//! Synthesis of high-resolution solar irradiance for a target site and
//! period by block-resampling the soft clearness index of a measured
//! high-resolution source.
//!
//! # Pipeline
//!
//! ```text
//!  ┌────────────────┐     ┌──────────────┐     ┌─────────────────┐     ┌───────────────┐
//!  │ soft clearness  │────▶│ chunk features│────▶│ pool selector    │────▶│ bootstrap k_* │
//!  │ source + target │     │ (FeatureSpace)│     │ weighted/nearest │     │ onto target   │
//!  └────────────────┘     └──────────────┘     └─────────────────┘     └───────────────┘
//! ```
//!
//! # Crates
//!
//! | Crate | Concern |
//! |-------|---------|
//! | `sunsynth-table` | Time index, chunk periods, columnar tables |
//! | `sunsynth-irradiance` | Location, derived-quantity cache, sky model seam |
//! | `sunsynth-pool` | Chunk features and pool selectors |
//! | `sunsynth-bootstrap` | Chunked bootstrap and boundary stitching |
//!
//! # Quick start
//!
//! ```ignore
//! use sunsynth::{IrradianceSynthesizer, SynthesisConfig};
//!
//! sunsynth::logging::init(1);
//! let config = SynthesisConfig::from_path(Path::new("synth.toml"))?;
//! let mut synth = IrradianceSynthesizer::new(source);
//! let mut synthetic = synth.synthesize(&mut target, &config)?;
//! let ghi = synthetic.irradiance()?;
//! ```

pub mod config;
pub mod error;
pub mod feature;
pub mod logging;
pub mod synthesize;

pub use config::{SamplingMethod, SynthesisConfig};
pub use error::SynthError;
pub use feature::{FEATURE_COLUMN, FeatureSpace, MeanClearness};
pub use synthesize::IrradianceSynthesizer;

pub use sunsynth_bootstrap as bootstrap;
pub use sunsynth_irradiance as irradiance;
pub use sunsynth_pool as pool;
pub use sunsynth_table as table;
