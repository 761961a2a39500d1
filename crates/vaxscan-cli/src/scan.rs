//! One scan run: locate the user, find nearby places, then collect each
//! place's availabilities concurrently.

use std::io::Write;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use vaxscan_client::{ClicSanteClient, PlaceFilter};
use vaxscan_core::{
    AppConfig, DateWindow, FailurePolicy, Place, PlaceFailure, PlaceResult, PostalCode, ScanReport,
};

/// What the user asked to scan for.
#[derive(Debug, Clone)]
pub(crate) struct ScanRequest {
    pub postal_code: PostalCode,
    pub window: DateWindow,
    pub max_distance_km: u32,
    pub require_quota: bool,
    pub failure_policy: FailurePolicy,
}

/// Result of aggregating a single place.
enum PlaceOutcome {
    Ok(PlaceResult),
    Failed(PlaceFailure),
}

/// Runs a full scan and returns the report, nearest places first.
///
/// Progress lines for the user go to `out`. Location and search failures
/// abort the run; a failing place is either recorded in
/// [`ScanReport::failures`] or aborts the run, depending on
/// `request.failure_policy`.
pub(crate) async fn run_scan(
    config: &AppConfig,
    client: &ClicSanteClient,
    request: &ScanRequest,
    out: &mut impl Write,
) -> anyhow::Result<ScanReport> {
    let location = client
        .resolve_location(&request.postal_code)
        .await
        .with_context(|| format!("failed to locate postal code {}", request.postal_code))?;

    let filter = PlaceFilter::new(config.unified_service_id, request.require_quota);
    let places = client
        .find_places(&location, &request.window, request.max_distance_km, &filter)
        .await
        .context("failed to search for vaccination places")?;

    writeln!(
        out,
        "Querying {} vaccination centres... This might take a little while...",
        places.len()
    )?;

    let max_concurrent = config.max_concurrent_places.max(1);
    let outcomes: Vec<PlaceOutcome> = stream::iter(&places)
        .map(|place| async move {
            match client
                .aggregate_place(place, &request.window, &request.postal_code)
                .await
            {
                Ok(result) => PlaceOutcome::Ok(result),
                Err(e) => PlaceOutcome::Failed(failure(place, &e)),
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            PlaceOutcome::Ok(result) => results.push(result),
            PlaceOutcome::Failed(f) => {
                tracing::warn!(
                    establishment_id = f.establishment_id,
                    place_id = f.place_id,
                    place = %f.name,
                    error = %f.reason,
                    "failed to collect availabilities"
                );
                if request.failure_policy == FailurePolicy::Abort {
                    anyhow::bail!(
                        "failed to collect availabilities for {} (establishment {}, place {}): {}",
                        f.name,
                        f.establishment_id,
                        f.place_id,
                        f.reason
                    );
                }
                failures.push(f);
            }
        }
    }

    if !failures.is_empty() {
        tracing::warn!(
            failed_places = failures.len(),
            total_places = places.len(),
            "some places failed during the scan"
        );
    }

    Ok(ScanReport::new(results, failures))
}

fn failure(place: &Place, err: &vaxscan_client::ClientError) -> PlaceFailure {
    PlaceFailure {
        establishment_id: place.establishment_id,
        place_id: place.id,
        name: place.name_en.clone(),
        distance_km: place.distance_km,
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
