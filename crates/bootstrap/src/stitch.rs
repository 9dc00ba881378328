//! LOWESS smoothing of chunk boundaries.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use lowess::prelude::{Batch, Lowess, LowessError};
use sunsynth_table::{Column, TimeTable, Timestamp};
use tracing::debug;

use crate::error::BootstrapError;

/// How noise combines with the trend around a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorModel {
    /// `value = trend + noise`.
    #[default]
    Additive,
    /// `value = trend · noise`.
    Multiplicative,
}

impl ErrorModel {
    fn noise(self, value: f64, trend: f64) -> f64 {
        match self {
            ErrorModel::Additive => value - trend,
            ErrorModel::Multiplicative => value / trend,
        }
    }

    fn combine(self, trend: f64, noise: f64) -> f64 {
        match self {
            ErrorModel::Additive => trend + noise,
            ErrorModel::Multiplicative => trend * noise,
        }
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorModel::Additive => f.write_str("additive"),
            ErrorModel::Multiplicative => f.write_str("multiplicative"),
        }
    }
}

impl FromStr for ErrorModel {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(ErrorModel::Additive),
            "multiplicative" => Ok(ErrorModel::Multiplicative),
            _ => Err(BootstrapError::UnsupportedErrorModel {
                name: s.to_string(),
            }),
        }
    }
}

/// Boundary stitching parameters.
///
/// Defaults: additive error model, a one-hour half window, and LOWESS over
/// two thirds of the window with 3 robustness iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchConfig {
    error_model: ErrorModel,
    window: TimeDelta,
    fraction: f64,
    iterations: usize,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StitchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            error_model: ErrorModel::Additive,
            window: TimeDelta::hours(1),
            fraction: 2.0 / 3.0,
            iterations: 3,
        }
    }

    /// Sets the error model.
    pub fn with_error_model(mut self, model: ErrorModel) -> Self {
        self.error_model = model;
        self
    }

    /// Sets the half width of the window around each boundary.
    pub fn with_window(mut self, window: TimeDelta) -> Self {
        self.window = window;
        self
    }

    /// Sets the share of points in each local fit, in `(0, 1]`.
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    /// Sets the number of robustness iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Returns the error model.
    pub fn error_model(&self) -> ErrorModel {
        self.error_model
    }

    /// Returns the half window.
    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Returns the LOWESS fraction.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Returns the number of robustness iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Validates the window and smoother parameters.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.window <= TimeDelta::zero() {
            return Err(BootstrapError::InvalidStitchWindow {
                window: self.window,
            });
        }
        Lowess::<f64>::new()
            .fraction(self.fraction)
            .iterations(self.iterations)
            .adapter(Batch)
            .build()?;
        Ok(())
    }

    /// Fitted LOWESS values of `y` over sorted `x`.
    fn trend(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, LowessError> {
        let model = Lowess::<f64>::new()
            .fraction(self.fraction)
            .iterations(self.iterations)
            .adapter(Batch)
            .build()?;
        Ok(model.fit(x, y)?.y)
    }
}

/// Smooths the discontinuities at `boundaries`.
///
/// For every boundary `b` and every column, the rows in `[b − w, b + w)` are
/// split at `b`. Each side gets its own LOWESS trend, and the residual noise
/// of each side is kept. A single trend is then fitted over the whole window
/// and recombined with that noise:
///
/// ```text
/// additive:        trend_full + (y − trend_side)
/// multiplicative:  trend_full · (y / trend_side)
/// ```
///
/// Windows always read the input values, so overlapping windows do not
/// compound; the last boundary to touch a row wins.
#[tracing::instrument(skip_all, fields(n_boundaries = boundaries.len(), model = %config.error_model))]
pub fn stitch(
    table: &TimeTable,
    boundaries: &[Timestamp],
    config: &StitchConfig,
) -> Result<TimeTable, BootstrapError> {
    config.validate()?;
    let index = table.index();
    let mut columns: Vec<Column> = table.columns().to_vec();

    for b in boundaries {
        let start = index.lower_bound(&(*b - config.window));
        let split = index.lower_bound(b);
        let end = index.lower_bound(&(*b + config.window));
        if start == end {
            continue;
        }
        let origin = index.as_slice()[start];
        let x: Vec<f64> = index.as_slice()[start..end]
            .iter()
            .map(|t| (*t - origin).num_seconds() as f64)
            .collect();
        let cut = split - start;
        debug!(boundary = %b, rows = end - start, left = cut, "stitching");

        for (out, column) in columns.iter_mut().zip(table.columns()) {
            let y = &column.values[start..end];
            let stitched = stitch_window(&x, y, cut, config)?;
            out.values[start..end].copy_from_slice(&stitched);
        }
    }

    Ok(TimeTable::from_columns(index.clone(), columns)?)
}

/// Reconstructs one window split at `cut`.
fn stitch_window(
    x: &[f64],
    y: &[f64],
    cut: usize,
    config: &StitchConfig,
) -> Result<Vec<f64>, BootstrapError> {
    let model = config.error_model;
    let mut noise = Vec::with_capacity(y.len());
    for (xs, ys) in [(&x[..cut], &y[..cut]), (&x[cut..], &y[cut..])] {
        let trend = smooth(xs, ys, config)?;
        noise.extend(ys.iter().zip(&trend).map(|(&v, &t)| model.noise(v, t)));
    }
    let trend = smooth(x, y, config)?;
    Ok(trend
        .iter()
        .zip(&noise)
        .map(|(&t, &n)| model.combine(t, n))
        .collect())
}

/// LOWESS trend over the finite values of `y`; other positions are NaN.
///
/// Fewer than two finite values are returned as they are.
fn smooth(x: &[f64], y: &[f64], config: &StitchConfig) -> Result<Vec<f64>, BootstrapError> {
    let kept: Vec<usize> = (0..y.len()).filter(|&i| y[i].is_finite()).collect();
    let mut trend = vec![f64::NAN; y.len()];
    if kept.len() < 2 {
        for &i in &kept {
            trend[i] = y[i];
        }
        return Ok(trend);
    }
    let xs: Vec<f64> = kept.iter().map(|&i| x[i]).collect();
    let ys: Vec<f64> = kept.iter().map(|&i| y[i]).collect();
    let fitted = config.trend(&xs, &ys)?;
    for (&i, &v) in kept.iter().zip(&fitted) {
        trend[i] = v;
    }
    Ok(trend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use chrono_tz::UTC;
    use sunsynth_table::TimeIndex;

    fn table(values: Vec<f64>) -> TimeTable {
        let start = UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let index = TimeIndex::periods(start, values.len(), TimeDelta::minutes(10)).unwrap();
        TimeTable::new(index).with_column("v", values).unwrap()
    }

    #[test]
    fn error_model_parsing() {
        assert_eq!("additive".parse::<ErrorModel>().unwrap(), ErrorModel::Additive);
        assert_eq!(
            "Multiplicative".parse::<ErrorModel>().unwrap(),
            ErrorModel::Multiplicative
        );
        assert!(matches!(
            "log".parse::<ErrorModel>(),
            Err(BootstrapError::UnsupportedErrorModel { name }) if name == "log"
        ));
    }

    #[test]
    fn constant_series_is_unchanged() {
        let t = table(vec![4.0; 36]);
        let b = t.index().as_slice()[18];
        for model in [ErrorModel::Additive, ErrorModel::Multiplicative] {
            let config = StitchConfig::new().with_error_model(model);
            let out = stitch(&t, &[b], &config).unwrap();
            for v in out.column("v").unwrap() {
                assert_abs_diff_eq!(*v, 4.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn rows_outside_window_are_untouched() {
        let values: Vec<f64> = (0..36).map(|i| if i < 18 { 1.0 } else { 5.0 }).collect();
        let t = table(values.clone());
        let b = t.index().as_slice()[18];
        let out = stitch(&t, &[b], &StitchConfig::new()).unwrap();
        let v = out.column("v").unwrap();
        // ±1 h at 10 min covers rows 12..24
        assert_eq!(&v[..12], &values[..12]);
        assert_eq!(&v[24..], &values[24..]);
    }

    #[test]
    fn boundary_without_rows_is_skipped() {
        let t = table(vec![1.0, 2.0, 3.0]);
        let far = t.index().as_slice()[0] + TimeDelta::days(3);
        let out = stitch(&t, &[far], &StitchConfig::new()).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn rejects_non_positive_window() {
        let t = table(vec![1.0; 4]);
        let config = StitchConfig::new().with_window(TimeDelta::zero());
        assert!(matches!(
            stitch(&t, &[], &config),
            Err(BootstrapError::InvalidStitchWindow { .. })
        ));
    }

    #[test]
    fn rejects_invalid_fraction() {
        let t = table(vec![1.0; 4]);
        let config = StitchConfig::new().with_fraction(1.5);
        assert!(matches!(
            stitch(&t, &[], &config),
            Err(BootstrapError::Lowess(_))
        ));
    }

    #[test]
    fn missing_values_stay_missing() {
        let mut values: Vec<f64> = (0..36).map(|i| if i < 18 { 1.0 } else { 5.0 }).collect();
        values[15] = f64::NAN;
        let t = table(values);
        let b = t.index().as_slice()[18];
        let out = stitch(&t, &[b], &StitchConfig::new()).unwrap();
        let v = out.column("v").unwrap();
        assert!(v[15].is_nan());
        assert!(v[12..24].iter().enumerate().all(|(i, x)| i == 3 || x.is_finite()));
    }

    #[test]
    fn smooth_passes_through_too_few_points() {
        let config = StitchConfig::new();
        let out = smooth(&[0.0, 1.0], &[f64::NAN, 3.0], &config).unwrap();
        assert!(out[0].is_nan());
        assert_eq!(out[1], 3.0);
    }
}
