//! Paginated search for candidate places around a location.
//!
//! The `availabilities` endpoint is paged by a zero-based `page` parameter
//! and signals the end of the result set with `204 No Content`. The total
//! page count is never announced, so [`PlacePages`] is a pull-based pager:
//! callers ask for the next page until it returns `None`.

use reqwest::StatusCode;
use vaxscan_core::{haversine_km, Coordinate, DateWindow, Location, Place};

use crate::client::ClicSanteClient;
use crate::error::ClientError;
use crate::types::{AvailabilitiesPage, PlaceRecord};

/// Upper bound on pages requested in one search. The upstream returns a
/// handful of pages for any realistic radius; hitting this means the 204
/// terminator never came.
pub const MAX_PAGES: u32 = 200;

/// Selection applied to search results before distances are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceFilter {
    /// Keep only places whose `t07` or `ta7` quota counter is positive.
    /// Off by default, in which case every returned place is kept.
    pub require_quota: bool,
    /// Key of the quota entry to inspect (`"su237"`).
    pub service_key: String,
}

impl PlaceFilter {
    #[must_use]
    pub fn new(unified_service_id: u32, require_quota: bool) -> Self {
        Self {
            require_quota,
            service_key: format!("su{unified_service_id}"),
        }
    }

    #[must_use]
    pub fn accepts(&self, place: &PlaceRecord) -> bool {
        if !self.require_quota {
            return true;
        }
        let (t07, ta7) = place.quota(&self.service_key);
        t07 > 0 || ta7 > 0
    }
}

/// Lazy pager over the search endpoint.
///
/// Each [`next_page`](Self::next_page) issues exactly one request. Once the
/// terminator has been seen, further calls return `Ok(None)` without touching
/// the network until [`restart`](Self::restart) is called.
#[derive(Debug)]
pub struct PlacePages<'a> {
    client: &'a ClicSanteClient,
    params: Vec<(&'static str, String)>,
    page: u32,
    max_pages: u32,
    exhausted: bool,
}

impl<'a> PlacePages<'a> {
    fn new(
        client: &'a ClicSanteClient,
        location: &Location,
        window: &DateWindow,
        max_distance_km: u32,
    ) -> Self {
        let params = vec![
            ("dateStart", window.start_param()),
            ("dateStop", window.end_param()),
            ("latitude", location.coordinate.latitude.to_string()),
            ("longitude", location.coordinate.longitude.to_string()),
            ("maxDistance", max_distance_km.to_string()),
            ("serviceUnified", client.unified_service_param()),
            ("postalCode", location.postal_code.as_str().to_owned()),
        ];
        Self {
            client,
            params,
            page: 0,
            max_pages: MAX_PAGES,
            exhausted: false,
        }
    }

    /// Lowers (or raises) the page guard from its [`MAX_PAGES`] default.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Index of the page the next call will request.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Rewinds to page 0 so the sequence can be walked again.
    pub fn restart(&mut self) {
        self.page = 0;
        self.exhausted = false;
    }

    /// Fetches the next page, or `None` once the endpoint answered 204.
    ///
    /// # Errors
    ///
    /// - [`ClientError::PaginationLimit`] after `max_pages` pages
    ///   ([`MAX_PAGES`] unless set with [`with_max_pages`](Self::with_max_pages)).
    /// - [`ClientError::UnexpectedStatus`] for any status other than 200/204.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] on transport or
    ///   shape failures.
    pub async fn next_page(&mut self) -> Result<Option<Vec<PlaceRecord>>, ClientError> {
        if self.exhausted {
            return Ok(None);
        }
        if self.page >= self.max_pages {
            return Err(ClientError::PaginationLimit {
                max_pages: self.max_pages,
            });
        }

        let mut params = self.params.clone();
        params.push(("page", self.page.to_string()));
        let url = self.client.build_url("availabilities", &params)?;
        let response = self.client.get(&url).await?;

        if response.status == StatusCode::NO_CONTENT {
            tracing::debug!(page = self.page, "availability search exhausted");
            self.exhausted = true;
            return Ok(None);
        }

        let response = response.require_success()?;
        let parsed: AvailabilitiesPage =
            response.json(&format!("availabilities(page={})", self.page))?;
        tracing::debug!(
            page = self.page,
            places = parsed.places.len(),
            "fetched availability search page"
        );
        self.page += 1;
        Ok(Some(parsed.places))
    }
}

impl ClicSanteClient {
    /// Starts a lazy walk over the search result pages.
    #[must_use]
    pub fn place_pages<'a>(
        &'a self,
        location: &Location,
        window: &DateWindow,
        max_distance_km: u32,
    ) -> PlacePages<'a> {
        PlacePages::new(self, location, window, max_distance_km)
    }

    /// Collects every place within `max_distance_km` of `location` that has
    /// openings in `window`, nearest first.
    ///
    /// All pages are gathered before sorting.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`PlacePages::next_page`].
    pub async fn find_places(
        &self,
        location: &Location,
        window: &DateWindow,
        max_distance_km: u32,
        filter: &PlaceFilter,
    ) -> Result<Vec<Place>, ClientError> {
        let mut pages = self.place_pages(location, window, max_distance_km);
        let mut records = Vec::new();
        while let Some(batch) = pages.next_page().await? {
            records.extend(batch);
        }

        let total = records.len();
        let places = annotate_and_sort(records, location.coordinate, filter);
        tracing::info!(
            total,
            kept = places.len(),
            pages = pages.page(),
            "availability search complete"
        );
        Ok(places)
    }
}

/// Applies `filter`, computes each place's distance from `origin`, and sorts
/// ascending by distance.
pub(crate) fn annotate_and_sort(
    records: Vec<PlaceRecord>,
    origin: Coordinate,
    filter: &PlaceFilter,
) -> Vec<Place> {
    let mut places: Vec<Place> = records
        .into_iter()
        .filter(|r| filter.accepts(r))
        .map(|r| {
            let coordinate = Coordinate {
                latitude: r.latitude,
                longitude: r.longitude,
            };
            Place {
                id: r.id,
                establishment_id: r.establishment,
                name_en: r.name_en,
                coordinate,
                distance_km: haversine_km(coordinate, origin),
            }
        })
        .collect();
    places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    places
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, latitude: f64, longitude: f64, quota: (i64, i64)) -> PlaceRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "establishment": id * 10,
            "name_en": format!("Place {id}"),
            "latitude": latitude,
            "longitude": longitude,
            "availabilities": { "su237": { "t07": quota.0, "ta7": quota.1 } }
        }))
        .unwrap()
    }

    const ORIGIN: Coordinate = Coordinate {
        latitude: 45.5,
        longitude: -73.6,
    };

    #[test]
    fn permissive_filter_accepts_zero_quota() {
        let filter = PlaceFilter::new(237, false);
        assert!(filter.accepts(&record(1, 45.5, -73.6, (0, 0))));
    }

    #[test]
    fn quota_filter_requires_a_positive_counter() {
        let filter = PlaceFilter::new(237, true);
        assert!(!filter.accepts(&record(1, 45.5, -73.6, (0, 0))));
        assert!(filter.accepts(&record(2, 45.5, -73.6, (1, 0))));
        assert!(filter.accepts(&record(3, 45.5, -73.6, (0, 2))));
    }

    #[test]
    fn places_are_sorted_across_pages_by_distance() {
        let records = vec![
            record(1, 46.8, -71.2, (0, 0)),
            record(2, 45.51, -73.6, (0, 0)),
            record(3, 45.9, -73.6, (0, 0)),
        ];
        let places = annotate_and_sort(records, ORIGIN, &PlaceFilter::new(237, false));
        let ids: Vec<i64> = places.iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 3, 1]);
        assert!(places
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));
        assert!(places.iter().all(|p| p.distance_km >= 0.0));
    }

    #[test]
    fn establishment_id_is_carried_over() {
        let places = annotate_and_sort(
            vec![record(7, 45.5, -73.6, (0, 0))],
            ORIGIN,
            &PlaceFilter::new(237, false),
        );
        assert_eq!(places[0].establishment_id, 70);
        assert_eq!(places[0].name_en, "Place 7");
        assert!(places[0].distance_km.abs() < 1e-9);
    }
}
