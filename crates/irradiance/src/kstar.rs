//! Soft clearness index ("k-star") horizon blend.

use crate::error::IrradianceError;

/// Tuning of the horizon blend.
///
/// The blend weight is `1 / (1 + exp(sensitivity * cutoff))` with
/// `cutoff = zenith - π/2 + angle·π/180` (radians). It is ≈1 with the sun
/// well above the horizon and falls towards 0 within `angle` degrees of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KStarParams {
    sensitivity: f64,
    angle: f64,
}

impl KStarParams {
    /// Creates the default parameters: sensitivity 50, angle 7 degrees.
    pub fn new() -> Self {
        Self {
            sensitivity: 50.0,
            angle: 7.0,
        }
    }

    /// Sets the steepness of the logistic blend.
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Sets the elevation in degrees at which the blend weight is one half.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Returns the sensitivity.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Returns the angle in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Validates that both parameters are finite.
    pub fn validate(&self) -> Result<(), IrradianceError> {
        if !self.sensitivity.is_finite() {
            return Err(IrradianceError::InvalidParameter {
                name: "k_star_sensitivity",
                value: self.sensitivity,
            });
        }
        if !self.angle.is_finite() {
            return Err(IrradianceError::InvalidParameter {
                name: "k_star_angle",
                value: self.angle,
            });
        }
        Ok(())
    }

    /// Blend weight for a zenith angle in degrees.
    pub fn weight(&self, zenith_deg: f64) -> f64 {
        let z = zenith_deg.to_radians();
        let cutoff = z - std::f64::consts::FRAC_PI_2 + self.angle.to_radians();
        1.0 / (1.0 + (self.sensitivity * cutoff).exp())
    }

    /// Soft clearness of one value: `k·w + (1 − w)`, with a non-finite
    /// `k·w` replaced by 0.
    pub fn blend(&self, k: f64, zenith_deg: f64) -> f64 {
        let w = self.weight(zenith_deg);
        let kw = k * w;
        let kw = if kw.is_finite() { kw } else { 0.0 };
        kw + (1.0 - w)
    }
}

impl Default for KStarParams {
    fn default() -> Self {
        Self::new()
    }
}
