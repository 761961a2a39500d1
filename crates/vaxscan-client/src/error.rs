use thiserror::Error;

/// Errors returned by the scheduling API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status the caller does not handle.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The geocoder returned no candidate for the address.
    #[error("no geocoding result for \"{address}\"")]
    NoGeocodeResult { address: String },

    /// No service of the establishment matched the selection marker.
    #[error("establishment {establishment_id} offers no service matching \"{marker}\"")]
    ServiceNotFound { establishment_id: i64, marker: String },

    #[error("availability search exceeded {max_pages} pages")]
    PaginationLimit { max_pages: u32 },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}
