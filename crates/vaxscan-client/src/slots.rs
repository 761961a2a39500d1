use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeDelta};
use vaxscan_core::types::API_DATE_FORMAT;

use crate::client::ClicSanteClient;
use crate::error::ClientError;
use crate::types::DaySchedule;

/// Hours the day-schedule endpoint runs ahead of Montréal wall-clock time.
///
/// The endpoint ignores its `timezone` parameter and labels local times as
/// UTC, so a 12:00 appointment comes back as `16:00:00+00:00`. This is a
/// fixed correction for that upstream defect, not a time-zone conversion: it
/// does not follow DST and must be removed if the upstream is ever fixed.
pub const UPSTREAM_CLOCK_SKEW_HOURS: i64 = 4;

impl ClicSanteClient {
    /// Fetches the open slots of one place for one calendar day.
    ///
    /// Returns local wall-clock times, unique and ascending. A non-success
    /// status means "nothing bookable that day" and yields an empty list, so
    /// the request is sent once and never retried.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if a 2xx body has the wrong shape.
    pub async fn fetch_day_slots(
        &self,
        day: NaiveDate,
        establishment_id: i64,
        service_id: i64,
        place_id: i64,
    ) -> Result<Vec<NaiveDateTime>, ClientError> {
        let next_day = day.checked_add_days(Days::new(1)).unwrap_or(day);
        let params = [
            ("dateStart", day.format(API_DATE_FORMAT).to_string()),
            ("dateStop", next_day.format(API_DATE_FORMAT).to_string()),
            ("service", service_id.to_string()),
            ("timezone", self.timezone.clone()),
            ("places", place_id.to_string()),
            ("filter1", "1".to_owned()),
            ("filter2", "0".to_owned()),
        ];
        let url = self.build_url(
            &format!("establishments/{establishment_id}/schedules/day"),
            &params,
        )?;

        let response = match self.get_once(&url).await {
            Ok(response) => response,
            Err(ClientError::UnexpectedStatus { status, .. }) => {
                tracing::debug!(establishment_id, place_id, %day, status, "day schedule unavailable");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        if !response.status.is_success() {
            tracing::debug!(
                establishment_id,
                place_id,
                %day,
                status = response.status.as_u16(),
                "day schedule unavailable"
            );
            return Ok(Vec::new());
        }

        let schedule: DaySchedule = response.json(&format!(
            "day schedule(establishment={establishment_id}, place={place_id}, day={day})"
        ))?;
        Ok(local_slots(schedule.availabilities.iter().map(|s| s.start.as_str())))
    }
}

/// Parses upstream start timestamps, applies [`UPSTREAM_CLOCK_SKEW_HOURS`],
/// and returns the distinct values in ascending order. Unparseable entries
/// are logged and skipped.
pub(crate) fn local_slots<'a>(starts: impl Iterator<Item = &'a str>) -> Vec<NaiveDateTime> {
    let skew = TimeDelta::hours(UPSTREAM_CLOCK_SKEW_HOURS);
    let slots: BTreeSet<NaiveDateTime> = starts
        .filter_map(|raw| match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.naive_utc() - skew),
            Err(e) => {
                tracing::warn!(start = raw, error = %e, "skipping slot with unparseable start");
                None
            }
        })
        .collect();
    slots.into_iter().collect()
}
