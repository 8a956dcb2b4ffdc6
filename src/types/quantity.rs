//! The observed quantity and the temporal resolution of a DWD product folder.

use std::fmt;

/// The physical quantity a product folder holds.
///
/// The folder name doubles as the keyword used to look the product up in the
/// folder tree (for example `.../10_minutes/wind/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Mean wind speed (`FF_10`) and direction (`DD_10`).
    Wind,
    /// Global, diffuse and long-wave radiation, sunshine duration.
    Solar,
    /// Air temperature, relative humidity, pressure.
    AirTemperature,
    Precipitation,
}

impl Quantity {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Quantity::Wind => "wind",
            Quantity::Solar => "solar",
            Quantity::AirTemperature => "air_temperature",
            Quantity::Precipitation => "precipitation",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Sampling resolution of a product, which also fixes the native step of the merged grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    OneMinute,
    #[default]
    TenMinutes,
    Hourly,
    Daily,
}

impl Resolution {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Resolution::OneMinute => "1_minute",
            Resolution::TenMinutes => "10_minutes",
            Resolution::Hourly => "hourly",
            Resolution::Daily => "daily",
        }
    }

    /// Native step between two samples, in minutes.
    pub fn step_minutes(&self) -> i64 {
        match self {
            Resolution::OneMinute => 1,
            Resolution::TenMinutes => 10,
            Resolution::Hourly => 60,
            Resolution::Daily => 1440,
        }
    }
}

/// Formats a `Resolution` as its folder name.
///
/// ```
/// use dwd_opendata::Resolution;
///
/// assert_eq!(Resolution::TenMinutes.to_string(), "10_minutes");
/// assert_eq!(Resolution::default(), Resolution::TenMinutes);
/// ```
impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Relative product path below the climate base folder, e.g. `10_minutes/wind/`.
pub(crate) fn product_path(resolution: Resolution, quantity: Quantity) -> String {
    format!("{}/{}/", resolution.path_segment(), quantity.path_segment())
}
