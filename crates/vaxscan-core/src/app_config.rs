/// What the orchestrator does when one establishment cannot be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure, leave the place out of the results, keep scanning.
    Skip,
    /// Turn the first per-place failure into a whole-run error.
    Abort,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Skip => write!(f, "skip"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub booking_base_url: String,
    pub api_authorization: String,
    pub product: String,
    pub role: String,
    pub timezone: String,
    pub unified_service_id: u32,
    pub service_marker: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_concurrent_places: usize,
    pub max_concurrent_days: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub require_quota: bool,
    pub failure_policy: FailurePolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("booking_base_url", &self.booking_base_url)
            .field("api_authorization", &"[redacted]")
            .field("product", &self.product)
            .field("role", &self.role)
            .field("timezone", &self.timezone)
            .field("unified_service_id", &self.unified_service_id)
            .field("service_marker", &self.service_marker)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_concurrent_places", &self.max_concurrent_places)
            .field("max_concurrent_days", &self.max_concurrent_days)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("require_quota", &self.require_quota)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}
