//! Pool selection for chunked resampling.
//!
//! A [`PoolSelector`] narrows the candidate source chunks for one
//! destination chunk. Feature-based selectors compare per-chunk feature
//! vectors ([`ChunkFeatures`]) with an Lp norm.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{TimeDelta, TimeZone};
//! use chrono_tz::UTC;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sunsynth_pool::{ChunkFeatures, NearestSelector, PoolSelector};
//!
//! let day0 = UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//! let keys: Vec<_> = (0..3).map(|d| day0 + TimeDelta::days(d)).collect();
//! let mut source = ChunkFeatures::new(1);
//! for (key, k) in keys.iter().zip([0.2, 0.8, 0.5]) {
//!     source.insert(*key, vec![k]).unwrap();
//! }
//! let mut target = ChunkFeatures::new(1);
//! target.insert(day0, vec![0.75]).unwrap();
//!
//! let selector = PoolSelector::Nearest(
//!     NearestSelector::new(Arc::new(source), Arc::new(target)).with_k(2),
//! );
//! let mut rng = StdRng::seed_from_u64(42);
//! let pool = selector.get_pool(&keys, &day0, &mut rng).unwrap();
//! assert_eq!(pool, vec![keys[1], keys[2]]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! PoolSelector::get_pool()
//!   ├─ Null / Predicate            (selector.rs)
//!   ├─ candidate_distances()       (distance.rs)
//!   ├─ Nearest: select_k_nearest() (select.rs)
//!   └─ WeightedRandom:
//!        ├─ inverse_square_weights() (sample.rs)
//!        └─ weighted_draw()          (sample.rs)
//! ```

pub mod error;
pub mod features;
pub mod selector;

pub(crate) mod distance;
pub(crate) mod sample;
pub(crate) mod select;

pub use error::PoolError;
pub use features::{ChunkFeatures, ChunkKey};
pub use selector::{
    ChunkPredicate, NearestSelector, PoolSelector, SeasonalSelector, WEIGHT_EPSILON,
    WeightedRandomSelector,
};
