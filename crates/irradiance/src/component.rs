//! Irradiance components and site location.

use std::fmt;

use chrono_tz::Tz;

/// One of the three standard irradiance components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    /// Global horizontal irradiance.
    Ghi,
    /// Diffuse horizontal irradiance.
    Dhi,
    /// Direct normal irradiance.
    Dni,
}

impl Component {
    /// All components in canonical order.
    pub const ALL: [Component; 3] = [Component::Ghi, Component::Dhi, Component::Dni];

    /// Column name of the component.
    pub fn name(self) -> &'static str {
        match self {
            Component::Ghi => "ghi",
            Component::Dhi => "dhi",
            Component::Dni => "dni",
        }
    }

    /// Looks up a component by column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Site at which irradiance was measured or is synthesised.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Latitude in degrees north.
    pub latitude: f64,
    /// Longitude in degrees east.
    pub longitude: f64,
    /// Altitude in metres.
    pub altitude: f64,
    /// Local time zone.
    pub tz: Tz,
    /// Display name.
    pub name: String,
}

impl Location {
    /// Creates a location at sea level.
    pub fn new(latitude: f64, longitude: f64, tz: Tz) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
            tz,
            name: String::new(),
        }
    }

    /// Sets the altitude in metres.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
