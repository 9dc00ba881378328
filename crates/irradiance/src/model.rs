//! External model capabilities consumed by the dataset cache.

use sunsynth_table::{TimeIndex, TimeTable};

use crate::component::Location;
use crate::error::IrradianceError;

/// Solar geometry and clear-sky reference model.
///
/// Implementations are supplied by the caller; the dataset only stores
/// what they return.
pub trait SkyModel: Send + Sync {
    /// Returns solar position angles in degrees over `index`.
    ///
    /// The table must hold a `zenith` column and may hold others such as
    /// `azimuth` or `elevation`.
    fn solar_position(
        &self,
        location: &Location,
        index: &TimeIndex,
    ) -> Result<TimeTable, IrradianceError>;

    /// Returns clear-sky `ghi`, `dhi` and `dni` over `index`.
    fn clear_sky(
        &self,
        location: &Location,
        index: &TimeIndex,
        solar_position: &TimeTable,
    ) -> Result<TimeTable, IrradianceError>;
}

/// Derives direct normal irradiance from global and diffuse irradiance.
pub trait DniEstimator: Send + Sync {
    /// Returns one DNI value per input row. Zenith is in degrees.
    fn estimate_dni(
        &self,
        ghi: &[f64],
        dhi: &[f64],
        zenith: &[f64],
        clearsky_dni: &[f64],
        tolerance: f64,
    ) -> Vec<f64>;
}

/// DNI from the closure relation `(ghi - dhi) / cos(zenith)`, limited by a
/// clear-sky reference near the horizon.
///
/// Negative results are missing. Non-zero results at or beyond
/// `zero_dni_zenith` are missing. Between `clearsky_limit_zenith` and
/// `zero_dni_zenith`, results above `clearsky_dni * tolerance` are capped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearSkyLimitedDni {
    /// Zenith in degrees from which results are capped by the clear-sky DNI.
    pub clearsky_limit_zenith: f64,
    /// Zenith in degrees from which non-zero results are discarded.
    pub zero_dni_zenith: f64,
}

impl Default for ClearSkyLimitedDni {
    fn default() -> Self {
        Self {
            clearsky_limit_zenith: 80.0,
            zero_dni_zenith: 88.0,
        }
    }
}

impl DniEstimator for ClearSkyLimitedDni {
    fn estimate_dni(
        &self,
        ghi: &[f64],
        dhi: &[f64],
        zenith: &[f64],
        clearsky_dni: &[f64],
        tolerance: f64,
    ) -> Vec<f64> {
        ghi.iter()
            .zip(dhi)
            .zip(zenith)
            .zip(clearsky_dni)
            .map(|(((&g, &d), &z), &clear)| {
                let dni = (g - d) / z.to_radians().cos();
                if dni < 0.0 {
                    return f64::NAN;
                }
                if z >= self.zero_dni_zenith && dni != 0.0 {
                    return f64::NAN;
                }
                let max_dni = clear * tolerance;
                if z >= self.clearsky_limit_zenith && z < self.zero_dni_zenith && dni > max_dni {
                    return max_dni;
                }
                dni
            })
            .collect()
    }
}
