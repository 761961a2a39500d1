use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool("true"), Some(true));
    assert_eq!(parse_bool("YES"), Some(true));
    assert_eq!(parse_bool("1"), Some(true));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool(""), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_base_url, "https://api3.clicsante.ca/v3/");
    assert_eq!(cfg.booking_base_url, "https://clients3.clicsante.ca");
    assert_eq!(cfg.product, "clicsante");
    assert_eq!(cfg.role, "public");
    assert_eq!(cfg.timezone, "America/Toronto");
    assert_eq!(cfg.unified_service_id, 237);
    assert_eq!(cfg.service_marker, "1st");
    assert_eq!(cfg.log_level, "warn");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert!(cfg.max_concurrent_places >= 1);
    assert_eq!(cfg.max_concurrent_days, 4);
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert!(!cfg.require_quota);
    assert_eq!(cfg.failure_policy, FailurePolicy::Skip);
}

#[test]
fn debug_output_redacts_authorization() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(rendered.contains("[redacted]"));
    assert!(!rendered.contains("cHVibGlj"));
}

#[test]
fn overrides_are_applied() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_API_BASE_URL", "http://localhost:9999/v3/");
    map.insert("VAXSCAN_SERVICE_MARKER", "2nd");
    map.insert("VAXSCAN_MAX_CONCURRENT_PLACES", "16");
    map.insert("VAXSCAN_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "http://localhost:9999/v3/");
    assert_eq!(cfg.service_marker, "2nd");
    assert_eq!(cfg.max_concurrent_places, 16);
    assert_eq!(cfg.max_retries, 0);
}

#[test]
fn fail_fast_selects_abort_policy() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_FAIL_FAST", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.failure_policy, FailurePolicy::Abort);
}

#[test]
fn require_quota_flag_is_parsed() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_REQUIRE_QUOTA", "1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.require_quota);
}

#[test]
fn invalid_flag_is_rejected() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_REQUIRE_QUOTA", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VAXSCAN_REQUIRE_QUOTA"),
        "expected InvalidEnvVar(VAXSCAN_REQUIRE_QUOTA), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VAXSCAN_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(VAXSCAN_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn zero_concurrency_is_rejected() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_MAX_CONCURRENT_DAYS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VAXSCAN_MAX_CONCURRENT_DAYS"),
        "expected InvalidEnvVar(VAXSCAN_MAX_CONCURRENT_DAYS), got: {result:?}"
    );
}

#[test]
fn unified_service_id_invalid() {
    let mut map = HashMap::new();
    map.insert("VAXSCAN_UNIFIED_SERVICE_ID", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VAXSCAN_UNIFIED_SERVICE_ID"
    ));
}
