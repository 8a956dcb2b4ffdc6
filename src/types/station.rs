//! Station metadata as published in the `*Beschreibung_Stationen.txt` files of each
//! vintage folder, and the reference coordinate used to rank stations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude in decimal degrees.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use dwd_opendata::LatLon;
///
/// let potsdam = LatLon(52.3813, 13.0622);
/// assert_eq!(potsdam.0, 52.3813); // Latitude
/// assert_eq!(potsdam.1, 13.0622); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// A single DWD observation station, as listed for one product and vintage.
///
/// The same station id can appear in several vintage folders with different
/// validity ranges; each listing yields its own `Station`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Zero-padded DWD station id (e.g. `"00003"`), as used in archive names.
    pub id: String,
    /// First day with data in this product.
    pub valid_from: NaiveDate,
    /// Last day with data in this product.
    pub valid_to: NaiveDate,
    /// Station height above sea level in metres.
    pub height: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    /// German federal state (`Bundesland`).
    pub state: String,
    /// Great-circle distance to the reference coordinate the list was parsed for.
    pub distance_km: f64,
}

impl Station {
    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }
}
