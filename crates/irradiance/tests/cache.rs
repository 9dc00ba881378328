//! Integration tests for the derived-quantity cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_abs_diff_eq;
use chrono::{TimeDelta, TimeZone, Timelike};
use chrono_tz::Australia::Darwin;
use sunsynth_irradiance::{
    Component, DniEstimator, Family, IrradianceDataset, IrradianceError, KStarParams, Location,
    SkyModel,
};
use sunsynth_table::{TimeIndex, TimeTable};

/// Zenith grows 15° per hour away from local noon; clear sky follows its
/// cosine and is zero below the horizon.
#[derive(Default)]
struct NoonModel {
    calls: AtomicUsize,
}

impl SkyModel for NoonModel {
    fn solar_position(
        &self,
        _location: &Location,
        index: &TimeIndex,
    ) -> Result<TimeTable, IrradianceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let zenith = index
            .iter()
            .map(|t| (f64::from(t.hour()) - 12.0).abs() * 15.0)
            .collect();
        Ok(TimeTable::new(index.clone()).with_column("zenith", zenith)?)
    }

    fn clear_sky(
        &self,
        _location: &Location,
        index: &TimeIndex,
        solar_position: &TimeTable,
    ) -> Result<TimeTable, IrradianceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let cos: Vec<f64> = solar_position
            .require("zenith")?
            .iter()
            .map(|z| z.to_radians().cos().max(0.0))
            .collect();
        Ok(TimeTable::new(index.clone())
            .with_column("ghi", cos.iter().map(|c| 1000.0 * c).collect())?
            .with_column("dhi", cos.iter().map(|c| 120.0 * c).collect())?
            .with_column("dni", cos.iter().map(|c| 850.0 * c).collect())?)
    }
}

fn index() -> TimeIndex {
    let start = Darwin.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    TimeIndex::periods(start, 24, TimeDelta::hours(1)).unwrap()
}

fn location() -> Location {
    Location::new(-12.46, 130.84, Darwin).with_name("Darwin")
}

#[test]
fn flattened_table_restores_cache() {
    let model = Arc::new(NoonModel::default());
    let table = TimeTable::new(index())
        .with_column("ghi", (0..24).map(|h| 20.0 * h as f64).collect())
        .unwrap();
    let mut ds = IrradianceDataset::new(table, location(), model.clone());
    let k_before = ds.soft_clearness().unwrap();
    let calls = model.calls.load(Ordering::SeqCst);
    assert_eq!(calls, 2);

    let flat = ds.to_table().unwrap();
    let mut restored = IrradianceDataset::new(flat, location(), model.clone());
    for family in Family::ALL {
        assert!(restored.is_materialized(family), "{family:?} not restored");
    }
    assert_eq!(restored.table().column_names(), vec!["ghi"]);
    assert_eq!(restored.soft_clearness().unwrap(), k_before);
    assert_eq!(model.calls.load(Ordering::SeqCst), calls);
}

#[test]
fn irradiance_rebuilt_from_clearness_only() {
    let model = Arc::new(NoonModel::default());
    let table = TimeTable::new(index())
        .with_column("k_ghi", vec![0.6; 24])
        .unwrap();
    let mut ds = IrradianceDataset::new(table, location(), model);
    assert!(ds.components().is_empty());

    let g = ds.irradiance().unwrap();
    assert!(ds.is_ghi_only());
    let ghi = g.column("ghi").unwrap();
    let clear = ds.clear_sky().unwrap();
    assert_eq!(clear.column_names(), vec!["ghi"]);
    // noon: zenith 0, k-star equals k
    assert_abs_diff_eq!(ghi[12], 600.0, epsilon = 1e-6);
    // midnight: no clear-sky irradiance
    assert_abs_diff_eq!(ghi[0], 0.0, epsilon = 1e-12);
}

#[test]
fn soft_clearness_limits() {
    let model = Arc::new(NoonModel::default());
    // ghi far above clear sky near the horizon, moderate at noon
    let ghi: Vec<f64> = (0..24).map(|h| if h == 12 { 450.0 } else { 50.0 }).collect();
    let table = TimeTable::new(index()).with_column("ghi", ghi).unwrap();
    let mut ds = IrradianceDataset::new(table, location(), model);

    let k = ds.clearness_index().unwrap();
    let k_star = ds.soft_clearness().unwrap();
    let (k, k_star) = (k.column("ghi").unwrap(), k_star.column("ghi").unwrap());

    assert_abs_diff_eq!(k_star[12], k[12], epsilon = 1e-9);
    // 7 h from noon: zenith 105°, no clear-sky irradiance, k infinite
    assert!(!k[5].is_finite());
    assert_abs_diff_eq!(k_star[5], 1.0, epsilon = 1e-6);
    // midnight: zenith 180°, k infinite
    assert!(!k[0].is_finite());
    assert_abs_diff_eq!(k_star[0], 1.0, epsilon = 1e-12);
}

#[test]
fn rebind_keeps_parameters() {
    let model = Arc::new(NoonModel::default());
    let params = KStarParams::new().with_angle(3.0).with_sensitivity(20.0);
    let table = TimeTable::new(index())
        .with_column("ghi", vec![100.0; 24])
        .unwrap();
    let ds = IrradianceDataset::new(table, location(), model).with_k_star_params(params);
    let other = ds.rebind(TimeTable::new(index()).with_column("k_ghi", vec![1.0; 24]).unwrap());
    assert_eq!(other.params(), params);
    assert_eq!(other.location(), ds.location());
    assert!(other.is_materialized(Family::Clearness));
    assert!(!other.is_materialized(Family::SolarPosition));
}

#[test]
fn injected_dni_estimator_is_used() {
    struct Fixed {
        tolerance_seen: AtomicUsize,
    }
    impl DniEstimator for Fixed {
        fn estimate_dni(
            &self,
            ghi: &[f64],
            _dhi: &[f64],
            _zenith: &[f64],
            _clearsky_dni: &[f64],
            tolerance: f64,
        ) -> Vec<f64> {
            self.tolerance_seen
                .store((tolerance * 10.0).round() as usize, Ordering::SeqCst);
            vec![42.0; ghi.len()]
        }
    }

    let estimator = Arc::new(Fixed {
        tolerance_seen: AtomicUsize::new(0),
    });
    let table = TimeTable::new(index())
        .with_column("ghi", vec![300.0; 24])
        .unwrap()
        .with_column("dhi", vec![100.0; 24])
        .unwrap();
    let mut ds = IrradianceDataset::new(table, location(), Arc::new(NoonModel::default()))
        .with_dni_estimator(estimator.clone());
    assert_eq!(ds.complete_irradiance().unwrap(), Some(Component::Dni));
    assert!(ds.is_complete());
    assert_eq!(ds.table().column("dni").unwrap(), &[42.0; 24]);
    assert_eq!(estimator.tolerance_seen.load(Ordering::SeqCst), 11);
}

#[test]
fn default_dni_completion_limits_low_sun() {
    let ghi: Vec<f64> = (0..24).map(|h| if h == 12 { 900.0 } else { 30.0 }).collect();
    let table = TimeTable::new(index())
        .with_column("ghi", ghi)
        .unwrap()
        .with_column("dhi", vec![20.0; 24])
        .unwrap();
    let mut ds = IrradianceDataset::new(table, location(), Arc::new(NoonModel::default()));
    let g = ds.irradiance().unwrap();
    let dni = g.column("dni").unwrap();
    // noon: (900 - 20) / cos(0)
    assert_abs_diff_eq!(dni[12], 880.0, epsilon = 1e-9);
    // zenith 90° and beyond: non-zero DNI discarded
    assert!(dni[6].is_nan());
    assert!(dni[0].is_nan());
}
