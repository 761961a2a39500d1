//! Scheduling API response types.
//!
//! Only the fields the scanner reads are modelled; everything else in the
//! payloads is ignored. List fields default to empty so a trimmed-down
//! response (which the API sends when a place has nothing to offer) still
//! parses.

use chrono::NaiveDate;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// geocode
// ---------------------------------------------------------------------------

/// `GET /geocode?address=…` → `{ "results": [ { "geometry": { "location": … } } ] }`.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

// ---------------------------------------------------------------------------
// availabilities (paginated search)
// ---------------------------------------------------------------------------

/// One page of `GET /availabilities`.
#[derive(Debug, Deserialize)]
pub struct AvailabilitiesPage {
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
}

/// A candidate place as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRecord {
    pub id: i64,
    /// Owning establishment ID.
    pub establishment: i64,
    #[serde(default)]
    pub name_en: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Quota counters keyed by unified service (`"su237"` → `{ "t07": 3, "ta7": 0 }`).
    /// Kept loosely typed: other keys carry shapes the scanner never reads.
    #[serde(default)]
    pub availabilities: serde_json::Value,
}

impl PlaceRecord {
    /// Returns the `(t07, ta7)` quota counters for `service_key`, treating
    /// anything missing or non-numeric as zero.
    #[must_use]
    pub fn quota(&self, service_key: &str) -> (i64, i64) {
        let counters = self.availabilities.get(service_key);
        let read = |field: &str| {
            counters
                .and_then(|c| c.get(field))
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0)
        };
        (read("t07"), read("ta7"))
    }
}

// ---------------------------------------------------------------------------
// establishments/{id}/services
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ServiceEntry {
    pub id: i64,
    #[serde(default)]
    pub name_en: Option<String>,
}

// ---------------------------------------------------------------------------
// establishments/{id}/schedules/public
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PublicSchedule {
    /// Calendar days with at least one open slot.
    #[serde(default)]
    pub availabilities: Vec<NaiveDate>,
    /// Openings beyond the requested window. Only its emptiness matters.
    #[serde(default, rename = "upcomingAvailabilities")]
    pub upcoming_availabilities: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// establishments/{id}/schedules/day
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub availabilities: Vec<DaySlot>,
}

#[derive(Debug, Deserialize)]
pub struct DaySlot {
    /// RFC 3339 start timestamp, e.g. `"2024-01-01T16:00:00+00:00"`.
    pub start: String,
}
