//! # sunsynth-table
//!
//! Time-indexed columnar tables for irradiance series.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Timestamp (DateTime<Tz>)"] -->|"TimeIndex::range()"| B["TimeIndex"]
//!     B -->|"TimeTable::new()"| C["TimeTable"]
//!     C -->|".resample_mean(freq)"| C
//!     C -->|".group_by_period(chunk)"| D["(key, rows) chunks"]
//!     A -->|"ChunkSize::period_start()"| E["chunk key"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{TimeDelta, TimeZone};
//! use chrono_tz::Australia::Darwin;
//! use sunsynth_table::{ChunkSize, TimeIndex, TimeTable};
//!
//! let start = Darwin.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let end = Darwin.with_ymd_and_hms(2020, 1, 2, 23, 55, 0).unwrap();
//! let index = TimeIndex::range(start, end, TimeDelta::minutes(5)).unwrap();
//! assert_eq!(index.len(), 576);
//!
//! let table = TimeTable::new(index.clone())
//!     .with_column("ghi", vec![1.0; 576])
//!     .unwrap();
//! let chunks = table.group_by_period(ChunkSize::Day);
//! assert_eq!(chunks.len(), 2);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `chunk` | Chunk periods (`ChunkSize`) and local wall-clock arithmetic |
//! | `index` | Strictly increasing time index with optional fixed frequency |
//! | `table` | Named `f64` columns over a time index |
//! | `resample` | Mean resampling, `asfreq` re-alignment, period grouping |
//! | `error` | Error types |

mod chunk;
mod error;
mod index;
mod resample;
mod table;

pub use chunk::{ChunkSize, localize, parse_duration};
pub use error::TableError;
pub use index::{TimeIndex, Timestamp};
pub use table::{Column, TimeTable};
