use futures::stream::{self, StreamExt};
use vaxscan_core::{DateAvailability, DateWindow, Place, PlaceResult, PostalCode};

use crate::client::ClicSanteClient;
use crate::error::ClientError;
use crate::types::PublicSchedule;

impl ClicSanteClient {
    /// Collects the bookable days and slots of one place.
    ///
    /// Resolves the first-dose service, asks the public schedule which days
    /// have openings in `window`, then fetches each day's slots (up to
    /// `max_concurrent_days` at once, results kept in schedule order). A day
    /// whose slots have all been taken in the meantime is left out, as is a
    /// day whose slot request fails.
    ///
    /// # Errors
    ///
    /// Fails when the service cannot be resolved or the public schedule
    /// request fails; the place then has no result at all.
    pub async fn aggregate_place(
        &self,
        place: &Place,
        window: &DateWindow,
        postal_code: &PostalCode,
    ) -> Result<PlaceResult, ClientError> {
        let establishment_id = place.establishment_id;
        let service_id = self
            .resolve_service_id(establishment_id, &self.service_marker)
            .await?;

        let params = [
            ("dateStart", window.start_param()),
            ("dateStop", window.end_param()),
            ("service", service_id.to_string()),
            ("timezone", self.timezone.clone()),
            ("places", place.id.to_string()),
            ("filter1", "1".to_owned()),
            ("filter2", "0".to_owned()),
        ];
        let url = self.build_url(
            &format!("establishments/{establishment_id}/schedules/public"),
            &params,
        )?;
        let response = self.get(&url).await?.require_success()?;
        let schedule: PublicSchedule = response.json(&format!(
            "public schedule(establishment={establishment_id}, place={})",
            place.id
        ))?;

        let mut result = PlaceResult {
            name: place.name_en.clone(),
            distance_km: place.distance_km,
            booking_url: booking_url(
                &self.booking_base_url,
                establishment_id,
                place.id,
                self.unified_service_id,
                postal_code,
            ),
            availabilities: Vec::new(),
        };

        if schedule.availabilities.is_empty() && schedule.upcoming_availabilities.is_empty() {
            tracing::debug!(establishment_id, place_id = place.id, "no openings");
            return Ok(result);
        }

        let days: Vec<_> = stream::iter(schedule.availabilities)
            .map(|date| async move {
                let slots = self
                    .fetch_day_slots(date, establishment_id, service_id, place.id)
                    .await;
                (date, slots)
            })
            .buffered(self.max_concurrent_days)
            .collect()
            .await;

        for (date, slots) in days {
            match slots {
                Ok(time_slots) if !time_slots.is_empty() => {
                    result
                        .availabilities
                        .push(DateAvailability { date, time_slots });
                }
                Ok(_) => {
                    tracing::debug!(
                        establishment_id,
                        place_id = place.id,
                        %date,
                        "day listed but no slots left"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        establishment_id,
                        place_id = place.id,
                        %date,
                        error = %e,
                        "failed to fetch day schedule, skipping day"
                    );
                }
            }
        }

        Ok(result)
    }
}

/// Deep link into the booking portal, pre-filled with the place and the
/// user's postal code.
#[must_use]
pub fn booking_url(
    booking_base_url: &str,
    establishment_id: i64,
    place_id: i64,
    unified_service_id: u32,
    postal_code: &PostalCode,
) -> String {
    format!(
        "{}/{establishment_id}/take-appt?unifiedService={unified_service_id}&portalPlace={place_id}&portalPostalCode={}",
        booking_base_url.trim_end_matches('/'),
        postal_code.url_encoded()
    )
}
