use crate::client::ClicSanteClient;
use crate::error::ClientError;
use crate::types::ServiceEntry;

impl ClicSanteClient {
    /// Resolves the bookable service of `establishment_id` whose English name
    /// contains `marker` (e.g. `"1st"` for first doses). The first match wins.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ClientError::ServiceNotFound`] if no entry matches.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] on transport or
    ///   shape failures.
    pub async fn resolve_service_id(
        &self,
        establishment_id: i64,
        marker: &str,
    ) -> Result<i64, ClientError> {
        let url = self.build_url(&format!("establishments/{establishment_id}/services"), &[])?;
        let response = self.get(&url).await?.require_success()?;
        let services: Vec<ServiceEntry> =
            response.json(&format!("services(establishment={establishment_id})"))?;

        select_service(&services, marker).ok_or_else(|| ClientError::ServiceNotFound {
            establishment_id,
            marker: marker.to_owned(),
        })
    }
}

fn select_service(services: &[ServiceEntry], marker: &str) -> Option<i64> {
    services
        .iter()
        .find(|s| s.name_en.as_deref().is_some_and(|name| name.contains(marker)))
        .map(|s| s.id)
}
