use vaxscan_core::{Coordinate, Location, PostalCode};

use crate::client::ClicSanteClient;
use crate::error::ClientError;
use crate::types::GeocodeResponse;

impl ClicSanteClient {
    /// Resolves a postal code to a [`Location`] using the API's geocoder.
    ///
    /// The first geocoder candidate wins.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ClientError::NoGeocodeResult`] if the candidate list is empty.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] on transport or
    ///   shape failures.
    pub async fn resolve_location(&self, postal_code: &PostalCode) -> Result<Location, ClientError> {
        let url = self.build_url("geocode", &[("address", postal_code.as_str().to_owned())])?;
        let response = self.get(&url).await?.require_success()?;
        let parsed: GeocodeResponse = response.json(&format!("geocode(address={postal_code})"))?;

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NoGeocodeResult {
                address: postal_code.to_string(),
            })?;

        let coordinate = Coordinate {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        };
        tracing::debug!(
            postal_code = %postal_code,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "resolved location"
        );

        Ok(Location {
            postal_code: postal_code.clone(),
            coordinate,
        })
    }
}
