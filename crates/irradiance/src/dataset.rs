//! Irradiance dataset with a memoised cascade of derived quantities.
//!
//! ```text
//! solar_position() ─┬─► clear_sky() ─┬─► clearness_index() ─► soft_clearness()
//!                   │                │
//!                   └────────────────┴─► complete_irradiance() ◄── irradiance()
//! ```
//!
//! Each family is computed at most once and held in the cache until
//! [`IrradianceDataset::reset`] or [`IrradianceDataset::reset_family`].

use std::fmt;
use std::sync::Arc;

use sunsynth_table::{Column, TimeIndex, TimeTable};
use tracing::info;

use crate::component::{Component, Location};
use crate::error::IrradianceError;
use crate::kstar::KStarParams;
use crate::model::{ClearSkyLimitedDni, DniEstimator, SkyModel};

/// Clearness tolerance passed to the DNI estimator when completing DNI.
pub const DNI_CLEARSKY_TOLERANCE: f64 = 1.1;

/// A family of derived columns, identified by its column-name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Solar position angles (`sp_`).
    SolarPosition,
    /// Clear-sky reference irradiance (`clear_`).
    ClearSky,
    /// Clearness index (`k_`).
    Clearness,
}

impl Family {
    /// All families in dependency order.
    pub const ALL: [Family; 3] = [Family::SolarPosition, Family::ClearSky, Family::Clearness];

    /// Column-name prefix of the family in a flattened table.
    pub fn prefix(self) -> &'static str {
        match self {
            Family::SolarPosition => "sp_",
            Family::ClearSky => "clear_",
            Family::Clearness => "k_",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct DerivedCache {
    solar_position: Option<TimeTable>,
    clear_sky: Option<TimeTable>,
    clearness: Option<TimeTable>,
}

impl DerivedCache {
    fn get(&self, family: Family) -> Option<&TimeTable> {
        match family {
            Family::SolarPosition => self.solar_position.as_ref(),
            Family::ClearSky => self.clear_sky.as_ref(),
            Family::Clearness => self.clearness.as_ref(),
        }
    }

    fn slot(&mut self, family: Family) -> &mut Option<TimeTable> {
        match family {
            Family::SolarPosition => &mut self.solar_position,
            Family::ClearSky => &mut self.clear_sky,
            Family::Clearness => &mut self.clearness,
        }
    }
}

/// A time-indexed irradiance table bound to a location, with lazily
/// materialised derived families.
///
/// The raw table holds any of `ghi`, `dhi`, `dni` plus passthrough columns.
/// Accessors take `&mut self` because they fill the cache on first use, and
/// return owned tables with family prefixes stripped.
pub struct IrradianceDataset {
    table: TimeTable,
    location: Location,
    params: KStarParams,
    model: Arc<dyn SkyModel>,
    dni: Arc<dyn DniEstimator>,
    cache: DerivedCache,
}

impl fmt::Debug for IrradianceDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrradianceDataset")
            .field("columns", &self.table.column_names())
            .field("len", &self.table.len())
            .field("location", &self.location)
            .field("params", &self.params)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl IrradianceDataset {
    /// Wraps a table. Columns carrying a family prefix are moved into the
    /// cache, so a table produced by [`to_table`](Self::to_table) restores
    /// its materialised families.
    pub fn new(mut table: TimeTable, location: Location, model: Arc<dyn SkyModel>) -> Self {
        let mut cache = DerivedCache::default();
        for family in Family::ALL {
            let prefix = family.prefix();
            if table.has_prefix(prefix) {
                *cache.slot(family) = Some(table.strip_prefix(prefix));
                table.retain_columns(|name| !name.starts_with(prefix));
            }
        }
        Self {
            table,
            location,
            params: KStarParams::default(),
            model,
            dni: Arc::new(ClearSkyLimitedDni::default()),
            cache,
        }
    }

    /// Sets the k-star horizon blend parameters.
    pub fn with_k_star_params(mut self, params: KStarParams) -> Self {
        self.params = params;
        self
    }

    /// Replaces the DNI completion capability.
    pub fn with_dni_estimator(mut self, dni: Arc<dyn DniEstimator>) -> Self {
        self.dni = dni;
        self
    }

    /// Builds a dataset over `table` sharing this dataset's location, models
    /// and k-star parameters.
    pub fn rebind(&self, table: TimeTable) -> Self {
        Self::new(table, self.location.clone(), Arc::clone(&self.model))
            .with_k_star_params(self.params)
            .with_dni_estimator(Arc::clone(&self.dni))
    }

    /// Returns the raw table (irradiance and passthrough columns).
    pub fn table(&self) -> &TimeTable {
        &self.table
    }

    /// Returns the time index.
    pub fn index(&self) -> &TimeIndex {
        self.table.index()
    }

    /// Returns the location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the k-star parameters.
    pub fn params(&self) -> KStarParams {
        self.params
    }

    /// Returns `true` if `family` is materialised.
    pub fn is_materialized(&self, family: Family) -> bool {
        self.cache.get(family).is_some()
    }

    /// Drops every materialised family.
    pub fn reset(&mut self) {
        self.cache = DerivedCache::default();
    }

    /// Drops one materialised family.
    pub fn reset_family(&mut self, family: Family) {
        *self.cache.slot(family) = None;
    }

    /// Flattens raw columns and every materialised family into one table
    /// with prefixed column names.
    pub fn to_table(&self) -> Result<TimeTable, IrradianceError> {
        let (index, mut columns) = self.table.clone().into_parts();
        for family in Family::ALL {
            if let Some(derived) = self.cache.get(family) {
                let (_, prefixed) = derived.add_prefix(family.prefix()).into_parts();
                columns.extend(prefixed);
            }
        }
        Ok(TimeTable::from_columns(index, columns)?)
    }

    /// Irradiance components present in the raw table.
    pub fn components(&self) -> Vec<Component> {
        Component::ALL
            .into_iter()
            .filter(|c| self.table.has_column(c.name()))
            .collect()
    }

    /// Returns `true` if all of `ghi`, `dhi` and `dni` are present.
    pub fn is_complete(&self) -> bool {
        self.components().len() == Component::ALL.len()
    }

    /// Returns `true` if `ghi` is the only irradiance component.
    pub fn is_ghi_only(&self) -> bool {
        self.components() == [Component::Ghi]
    }

    /// Solar position angles in degrees, including `zenith`.
    pub fn solar_position(&mut self) -> Result<TimeTable, IrradianceError> {
        self.materialize(Family::SolarPosition).cloned()
    }

    /// Clear-sky reference irradiance.
    pub fn clear_sky(&mut self) -> Result<TimeTable, IrradianceError> {
        self.materialize(Family::ClearSky).cloned()
    }

    /// Clearness index `irradiance / clear_sky` per component.
    pub fn clearness_index(&mut self) -> Result<TimeTable, IrradianceError> {
        self.materialize(Family::Clearness).cloned()
    }

    /// Measured or derived irradiance components.
    ///
    /// With no raw component, irradiance is rebuilt as
    /// `clear_sky · soft_clearness` and stored. With exactly two components
    /// the third is completed and stored.
    ///
    /// # Errors
    ///
    /// Returns [`IrradianceError::NoIrradiance`] when there is neither raw
    /// irradiance nor a clearness index.
    pub fn irradiance(&mut self) -> Result<TimeTable, IrradianceError> {
        if self.components().is_empty() {
            if !self.is_materialized(Family::Clearness) {
                return Err(IrradianceError::NoIrradiance);
            }
            info!("no irradiance data, building from clearness index");
            let clear = self.clear_sky()?;
            let k_star = self.soft_clearness()?;
            for column in k_star.columns() {
                if Component::from_name(&column.name).is_none() {
                    continue;
                }
                if let Some(reference) = clear.column(&column.name) {
                    let values = column
                        .values
                        .iter()
                        .zip(reference)
                        .map(|(k, c)| k * c)
                        .collect();
                    self.table.insert_column(column.name.clone(), values)?;
                }
            }
        }
        self.complete_irradiance()?;
        let names: Vec<&str> = Component::ALL.iter().map(|c| c.name()).collect();
        Ok(self.table.select(&names))
    }

    /// Derives the missing component when exactly two are present.
    ///
    /// Returns the derived component, or `None` when one or three
    /// components are present.
    pub fn complete_irradiance(&mut self) -> Result<Option<Component>, IrradianceError> {
        let present = self.components();
        if present.len() != 2 {
            return Ok(None);
        }
        let zenith = self.zenith()?;
        let derived = if !present.contains(&Component::Dni) {
            info!("completing DNI irradiance");
            let clear = self.clear_sky()?;
            let clear_dni = clear.require(Component::Dni.name())?;
            let ghi = self.table.require(Component::Ghi.name())?;
            let dhi = self.table.require(Component::Dhi.name())?;
            let dni = self
                .dni
                .estimate_dni(ghi, dhi, &zenith, clear_dni, DNI_CLEARSKY_TOLERANCE);
            (Component::Dni, dni)
        } else if !present.contains(&Component::Ghi) {
            info!("completing GHI irradiance");
            let dni = self.table.require(Component::Dni.name())?;
            let dhi = self.table.require(Component::Dhi.name())?;
            let ghi = dni
                .iter()
                .zip(dhi)
                .zip(&zenith)
                .map(|((n, d), z)| n * (z.to_radians() + d).cos())
                .collect();
            (Component::Ghi, ghi)
        } else {
            info!("completing DHI irradiance");
            let ghi = self.table.require(Component::Ghi.name())?;
            let dni = self.table.require(Component::Dni.name())?;
            let dhi = ghi
                .iter()
                .zip(dni)
                .zip(&zenith)
                .map(|((g, n), z)| g - n * z.to_radians().cos())
                .collect();
            (Component::Dhi, dhi)
        };
        let (component, values) = derived;
        self.table.insert_column(component.name(), values)?;
        Ok(Some(component))
    }

    /// Soft clearness index: the clearness index blended towards 1 as the
    /// sun approaches the horizon. Recomputed on every call.
    pub fn soft_clearness(&mut self) -> Result<TimeTable, IrradianceError> {
        self.params.validate()?;
        let params = self.params;
        let zenith = self.zenith()?;
        let k = self.materialize(Family::Clearness)?;
        let columns = k
            .columns()
            .iter()
            .map(|c| {
                let values = c
                    .values
                    .iter()
                    .zip(&zenith)
                    .map(|(&k, &z)| params.blend(k, z))
                    .collect();
                Column::new(c.name.clone(), values)
            })
            .collect();
        Ok(TimeTable::from_columns(k.index().clone(), columns)?)
    }

    fn zenith(&mut self) -> Result<Vec<f64>, IrradianceError> {
        Ok(self
            .materialize(Family::SolarPosition)?
            .require("zenith")?
            .to_vec())
    }

    fn materialize(&mut self, family: Family) -> Result<&TimeTable, IrradianceError> {
        let derived = match self.cache.slot(family).take() {
            Some(derived) => derived,
            None => match family {
                Family::SolarPosition => self.compute_solar_position()?,
                Family::ClearSky => self.compute_clear_sky()?,
                Family::Clearness => self.compute_clearness()?,
            },
        };
        Ok(self.cache.slot(family).insert(derived))
    }

    fn compute_solar_position(&mut self) -> Result<TimeTable, IrradianceError> {
        info!(location = %self.location.name, "calculating solar position");
        let raw = self.model.solar_position(&self.location, self.index())?;
        let sp = self.conform("solar_position", raw)?;
        if !sp.has_column("zenith") {
            return Err(IrradianceError::Model {
                capability: "solar_position",
                reason: "no zenith column".to_string(),
            });
        }
        Ok(sp)
    }

    fn compute_clear_sky(&mut self) -> Result<TimeTable, IrradianceError> {
        let sp = self.materialize(Family::SolarPosition)?.clone();
        info!(location = %self.location.name, "calculating clear sky irradiance");
        let raw = self.model.clear_sky(&self.location, self.index(), &sp)?;
        let reference = self.conform("clear_sky", raw)?;

        let mut wanted = self.clear_sky_components();
        if wanted.is_empty() {
            wanted = Component::ALL.to_vec();
        }
        let mut clear = TimeTable::new(self.index().clone());
        for component in wanted {
            let values = reference
                .column(component.name())
                .ok_or_else(|| IrradianceError::Model {
                    capability: "clear_sky",
                    reason: format!("no {component} column"),
                })?;
            clear.insert_column(component.name(), values.to_vec())?;
        }
        Ok(clear)
    }

    fn compute_clearness(&mut self) -> Result<TimeTable, IrradianceError> {
        let irradiance = self.irradiance()?;
        let clear = self.materialize(Family::ClearSky)?;
        info!("calculating clearness index");
        let mut k = TimeTable::new(irradiance.index().clone());
        for column in irradiance.columns() {
            if let Some(reference) = clear.column(&column.name) {
                let ratio = column
                    .values
                    .iter()
                    .zip(reference)
                    .map(|(g, c)| g / c)
                    .collect();
                k.insert_column(column.name.clone(), ratio)?;
            }
        }
        Ok(k)
    }

    /// Components the clear-sky family must cover: those present as raw
    /// irradiance or clearness index, plus the one completion will derive.
    fn clear_sky_components(&self) -> Vec<Component> {
        let k = self.cache.get(Family::Clearness);
        let mut wanted: Vec<Component> = Component::ALL
            .into_iter()
            .filter(|c| {
                self.table.has_column(c.name()) || k.is_some_and(|k| k.has_column(c.name()))
            })
            .collect();
        if wanted.len() == 2
            && let Some(third) = Component::ALL.into_iter().find(|c| !wanted.contains(c))
        {
            wanted.push(third);
            wanted.sort();
        }
        wanted
    }

    /// Re-indexes a model result onto this dataset's index.
    fn conform(
        &self,
        capability: &'static str,
        table: TimeTable,
    ) -> Result<TimeTable, IrradianceError> {
        if table.len() != self.table.len() {
            return Err(IrradianceError::Model {
                capability,
                reason: format!(
                    "returned {} rows for {} timestamps",
                    table.len(),
                    self.table.len()
                ),
            });
        }
        let (_, columns) = table.into_parts();
        Ok(TimeTable::from_columns(self.index().clone(), columns)?)
    }
}
