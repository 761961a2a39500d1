use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::postal_code::PostalCode;
use crate::ConfigError;

/// Format used for every date the scheduling API accepts or returns.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// The user's position, resolved once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub postal_code: PostalCode,
    pub coordinate: Coordinate,
}

/// Inclusive day-granularity search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDateWindow`] when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if end < start {
            return Err(ConfigError::InvalidDateWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// `[today, today + days]`, saturating at the last representable date.
    #[must_use]
    pub fn next_days(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format(API_DATE_FORMAT).to_string()
    }

    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format(API_DATE_FORMAT).to_string()
    }
}

/// A bookable place within an establishment, annotated with its distance
/// from the user's location.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: i64,
    pub establishment_id: i64,
    pub name_en: String,
    pub coordinate: Coordinate,
    pub distance_km: f64,
}

/// Open slots for one calendar day. Slots are unique and ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAvailability {
    pub date: NaiveDate,
    pub time_slots: Vec<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub name: String,
    pub distance_km: f64,
    pub booking_url: String,
    pub availabilities: Vec<DateAvailability>,
}

impl PlaceResult {
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.availabilities.iter().map(|a| a.time_slots.len()).sum()
    }

    #[must_use]
    pub fn has_availability(&self) -> bool {
        self.availabilities.iter().any(|a| !a.time_slots.is_empty())
    }
}

/// A place whose availabilities could not be collected.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceFailure {
    pub establishment_id: i64,
    pub place_id: i64,
    pub name: String,
    pub distance_km: f64,
    pub reason: String,
}

/// Everything a scan produced, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub results: Vec<PlaceResult>,
    pub failures: Vec<PlaceFailure>,
}

impl ScanReport {
    /// Builds a report with both lists ordered by ascending distance.
    #[must_use]
    pub fn new(mut results: Vec<PlaceResult>, mut failures: Vec<PlaceFailure>) -> Self {
        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        failures.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Self { results, failures }
    }

    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.results.iter().map(PlaceResult::total_slots).sum()
    }
}
