//! # sunsynth-irradiance
//!
//! Irradiance datasets bound to a site, with a memoised cascade of derived
//! quantities:
//!
//! | Family | Prefix | Source |
//! |--------|--------|--------|
//! | Solar position | `sp_` | [`SkyModel::solar_position`] |
//! | Clear-sky reference | `clear_` | [`SkyModel::clear_sky`] |
//! | Clearness index | `k_` | `irradiance / clear_sky` |
//! | Soft clearness ("k-star") | none | clearness blended towards 1 near the horizon, never cached |
//!
//! Solar geometry and clear-sky models are external: callers implement
//! [`SkyModel`]. DNI completion defaults to [`ClearSkyLimitedDni`] and can
//! be replaced through [`DniEstimator`].

mod component;
mod dataset;
mod error;
mod kstar;
mod model;

pub use component::{Component, Location};
pub use dataset::{DNI_CLEARSKY_TOLERANCE, Family, IrradianceDataset};
pub use error::IrradianceError;
pub use kstar::KStarParams;
pub use model::{ClearSkyLimitedDni, DniEstimator, SkyModel};
