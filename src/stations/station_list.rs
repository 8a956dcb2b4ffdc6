//! Parsing of `*Beschreibung_Stationen.txt` listings and nearest-station selection.

use crate::stations::error::StationError;
use crate::types::station::{LatLon, Station};
use chrono::NaiveDate;
use log::{debug, warn};
use ordered_float::OrderedFloat;

/// Earth radius used for station distances, in km.
pub const EARTH_RADIUS_KM: f64 = 6378.388;

const DATE_FORMAT: &str = "%Y%m%d";
const STATE_COLUMN: &str = "Bundesland";
const FIXED_COLUMNS: usize = 6;

/// Great-circle distance between two coordinates (spherical law of cosines).
///
/// Never negative; `distance_km(a, a) == 0.0` and the result is symmetric.
pub fn distance_km(a: LatLon, b: LatLon) -> f64 {
    if a == b {
        return 0.0;
    }
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

/// Parses a station listing and orders it by distance to `reference`, nearest first.
///
/// The listing starts with a column header and a dashed separator line. Each data row
/// holds id, two `YYYYMMDD` dates, height, latitude and longitude, followed by the
/// free-text name and the federal state. Columns listed after `Bundesland` in the
/// header are dropped from the end of every row. Rows that are too short or do not
/// parse are skipped. Stations at equal distance keep their listing order.
pub fn parse_station_list(raw: &str, reference: LatLon) -> Vec<Station> {
    let mut lines = raw.lines();
    let trailing_columns = lines
        .next()
        .map(|header| {
            let columns: Vec<&str> = header.split_whitespace().collect();
            columns
                .iter()
                .position(|c| *c == STATE_COLUMN)
                .map_or(0, |idx| columns.len() - idx - 1)
        })
        .unwrap_or(0);
    // dashed separator line
    lines.next();

    let mut stations: Vec<Station> = lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let station = parse_row(line, trailing_columns, reference);
            if station.is_none() {
                debug!("Skipping unparsable station row: '{}'", line.trim());
            }
            station
        })
        .collect();
    stations.sort_by_key(|s| OrderedFloat(s.distance_km));
    stations
}

fn parse_row(line: &str, trailing_columns: usize, reference: LatLon) -> Option<Station> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let tokens = &tokens[..tokens.len().checked_sub(trailing_columns)?];
    if tokens.len() < FIXED_COLUMNS + 1 {
        return None;
    }
    let (state, rest) = tokens.split_last()?;
    let latitude = rest[4].parse::<f64>().ok()?;
    let longitude = rest[5].parse::<f64>().ok()?;
    Some(Station {
        id: rest[0].to_string(),
        valid_from: NaiveDate::parse_from_str(rest[1], DATE_FORMAT).ok()?,
        valid_to: NaiveDate::parse_from_str(rest[2], DATE_FORMAT).ok()?,
        height: rest[3].parse().ok()?,
        latitude,
        longitude,
        name: rest[FIXED_COLUMNS..].join(" "),
        state: state.to_string(),
        distance_km: distance_km(reference, LatLon(latitude, longitude)),
    })
}

/// Outcome of choosing a station from a distance-ordered listing.
#[derive(Debug, Clone, PartialEq)]
pub enum StationChoice {
    /// The requested id was listed.
    Requested(Station),
    /// No id was requested; this is the nearest station.
    Nearest(Station),
    /// The requested id was not listed, the nearest station was used instead.
    NearestFallback { requested: String, station: Station },
}

impl StationChoice {
    pub fn station(&self) -> &Station {
        match self {
            StationChoice::Requested(station)
            | StationChoice::Nearest(station)
            | StationChoice::NearestFallback { station, .. } => station,
        }
    }

    pub fn into_station(self) -> Station {
        match self {
            StationChoice::Requested(station)
            | StationChoice::Nearest(station)
            | StationChoice::NearestFallback { station, .. } => station,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StationChoice::NearestFallback { .. })
    }
}

/// Picks `requested_id` from `stations`, or the first (nearest) entry.
///
/// `source` names the listing in errors and log messages.
///
/// # Errors
///
/// [`StationError::NoStations`] if `stations` is empty.
pub fn select_station(
    stations: &[Station],
    requested_id: Option<&str>,
    source: &str,
) -> Result<StationChoice, StationError> {
    let nearest = stations
        .first()
        .ok_or_else(|| StationError::NoStations(source.to_string()))?;
    let Some(requested) = requested_id else {
        return Ok(StationChoice::Nearest(nearest.clone()));
    };
    if let Some(station) = stations.iter().find(|s| s.id == requested) {
        return Ok(StationChoice::Requested(station.clone()));
    }
    warn!(
        "Station '{}' not found in '{}', using nearest station '{}' ({}) {:.1} km away",
        requested, source, nearest.id, nearest.name, nearest.distance_km
    );
    Ok(StationChoice::NearestFallback {
        requested: requested.to_string(),
        station: nearest.clone(),
    })
}
