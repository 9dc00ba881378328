//! Chunked block bootstrap of time tables.
//!
//! Whole chunks (days, weeks, ...) of a source table are drawn, with a
//! [`PoolSelector`](sunsynth_pool::PoolSelector) deciding which source chunks
//! are eligible for each destination chunk, and laid onto a destination time
//! index. Optionally the jumps at chunk boundaries are smoothed with LOWESS.
//!
//! # Pipeline
//!
//! ```text
//!  ┌───────────────┐     ┌──────────────────┐     ┌─────────────────┐
//!  │ resample_mean  │────▶│ pool + draw per   │────▶│ stitch interior │
//!  │ (dest. freq.)  │     │ destination chunk │     │ boundaries (opt)│
//!  └───────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use sunsynth_bootstrap::{BootstrapConfig, bootstrap};
//! use sunsynth_pool::PoolSelector;
//! use sunsynth_table::ChunkSize;
//!
//! let config = BootstrapConfig::new(ChunkSize::Day).with_seed(42);
//! let result = bootstrap(&source, &destination, &PoolSelector::Null, &config)?;
//! for draw in result.draws() {
//!     println!("{} <- {}", draw.destination, draw.source);
//! }
//! ```

mod config;
mod engine;
mod error;
mod result;
mod stitch;

pub use config::BootstrapConfig;
pub use engine::{bootstrap, bootstrap_with_rng};
pub use error::BootstrapError;
pub use result::{BootstrapResult, ChunkDraw};
pub use stitch::{ErrorModel, StitchConfig, stitch};
