use crate::app_config::{AppConfig, FailurePolicy};
use crate::ConfigError;

const DEFAULT_API_BASE_URL: &str = "https://api3.clicsante.ca/v3/";
const DEFAULT_BOOKING_BASE_URL: &str = "https://clients3.clicsante.ca";
/// Shared credential the public booking portal itself sends; not a user secret.
const DEFAULT_API_AUTHORIZATION: &str = "Basic cHVibGljQHRyaW1vei5jb206MTIzNDU2Nzgh";
const DEFAULT_PRODUCT: &str = "clicsante";
const DEFAULT_ROLE: &str = "public";
const DEFAULT_TIMEZONE: &str = "America/Toronto";
const DEFAULT_UNIFIED_SERVICE_ID: u32 = 237;
const DEFAULT_SERVICE_MARKER: &str = "1st";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_DAYS: usize = 4;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_BASE_MS: u64 = 500;

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            booking_base_url: DEFAULT_BOOKING_BASE_URL.to_string(),
            api_authorization: DEFAULT_API_AUTHORIZATION.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            role: DEFAULT_ROLE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            unified_service_id: DEFAULT_UNIFIED_SERVICE_ID,
            service_marker: DEFAULT_SERVICE_MARKER.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_concurrent_places: default_parallelism(),
            max_concurrent_days: DEFAULT_MAX_CONCURRENT_DAYS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_base_ms: DEFAULT_RETRY_BACKOFF_BASE_MS,
            require_quota: false,
            failure_policy: FailurePolicy::Skip,
        }
    }
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional. The defaults reproduce the behaviour of the
/// public booking portal, so an empty environment yields a working config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(invalid(var, "must be at least 1".to_string())),
            Ok(n) => Ok(n),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let parse_flag = |var: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, "false");
        parse_bool(&raw)
            .ok_or_else(|| invalid(var, format!("expected true or false, got {raw:?}")))
    };

    let defaults = AppConfig::default();

    let api_base_url = or_default("VAXSCAN_API_BASE_URL", &defaults.api_base_url);
    let booking_base_url = or_default("VAXSCAN_BOOKING_BASE_URL", &defaults.booking_base_url);
    let api_authorization = or_default("VAXSCAN_API_AUTHORIZATION", &defaults.api_authorization);
    let product = or_default("VAXSCAN_PRODUCT", &defaults.product);
    let role = or_default("VAXSCAN_ROLE", &defaults.role);
    let timezone = or_default("VAXSCAN_TIMEZONE", &defaults.timezone);
    let unified_service_id = parse_u32(
        "VAXSCAN_UNIFIED_SERVICE_ID",
        &defaults.unified_service_id.to_string(),
    )?;
    let service_marker = or_default("VAXSCAN_SERVICE_MARKER", &defaults.service_marker);
    let log_level = or_default("VAXSCAN_LOG_LEVEL", &defaults.log_level);

    let request_timeout_secs = parse_u64(
        "VAXSCAN_REQUEST_TIMEOUT_SECS",
        &defaults.request_timeout_secs.to_string(),
    )?;
    let max_concurrent_places = parse_positive_usize(
        "VAXSCAN_MAX_CONCURRENT_PLACES",
        &defaults.max_concurrent_places.to_string(),
    )?;
    let max_concurrent_days = parse_positive_usize(
        "VAXSCAN_MAX_CONCURRENT_DAYS",
        &defaults.max_concurrent_days.to_string(),
    )?;
    let max_retries = parse_u32("VAXSCAN_MAX_RETRIES", &defaults.max_retries.to_string())?;
    let retry_backoff_base_ms = parse_u64(
        "VAXSCAN_RETRY_BACKOFF_BASE_MS",
        &defaults.retry_backoff_base_ms.to_string(),
    )?;

    let require_quota = parse_flag("VAXSCAN_REQUIRE_QUOTA")?;
    let failure_policy = if parse_flag("VAXSCAN_FAIL_FAST")? {
        FailurePolicy::Abort
    } else {
        defaults.failure_policy
    };

    Ok(AppConfig {
        api_base_url,
        booking_base_url,
        api_authorization,
        product,
        role,
        timezone,
        unified_service_id,
        service_marker,
        log_level,
        request_timeout_secs,
        max_concurrent_places,
        max_concurrent_days,
        max_retries,
        retry_backoff_base_ms,
        require_quota,
        failure_policy,
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
