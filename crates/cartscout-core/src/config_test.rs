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

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("RAPID_API_KEY", "rapid-test-key");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CARTSCOUT_ENV"));
}

#[test]
fn build_app_config_fails_without_rapid_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "RAPID_API_KEY"),
        "expected MissingEnvVar(RAPID_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_rapid_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("RAPID_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.rapid_api_key, "rapid-test-key");
    assert!(cfg.completion_api_key.is_none());
    assert_eq!(cfg.completion_base_url, "https://api.openai.com/v1");
    assert_eq!(cfg.completion_model, "gpt-4o-mini");
    assert_eq!(
        cfg.amazon_base_url,
        "https://real-time-amazon-data.p.rapidapi.com"
    );
    assert_eq!(cfg.walmart_base_url, "https://walmart-data.p.rapidapi.com");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "cartscout/0.1 (product-search)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
    assert_eq!(cfg.platform_timeout_secs, 60);
}

#[test]
fn build_app_config_reads_completion_key() {
    let mut map = full_env();
    map.insert("OPENAI_API_KEY", "sk-test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.completion_api_key.as_deref(), Some("sk-test"));
}

#[test]
fn build_app_config_overrides_base_urls() {
    let mut map = full_env();
    map.insert("CARTSCOUT_AMAZON_BASE_URL", "http://127.0.0.1:9000");
    map.insert("CARTSCOUT_WALMART_BASE_URL", "http://127.0.0.1:9001");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.amazon_base_url, "http://127.0.0.1:9000");
    assert_eq!(cfg.walmart_base_url, "http://127.0.0.1:9001");
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = full_env();
    map.insert("CARTSCOUT_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTSCOUT_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CARTSCOUT_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_retries_override() {
    let mut map = full_env();
    map.insert("CARTSCOUT_MAX_RETRIES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 5);
}

#[test]
fn build_app_config_rejects_zero_platform_timeout() {
    let mut map = full_env();
    map.insert("CARTSCOUT_PLATFORM_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTSCOUT_PLATFORM_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CARTSCOUT_PLATFORM_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("OPENAI_API_KEY", "sk-very-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("rapid-test-key"));
    assert!(!rendered.contains("sk-very-secret"));
    assert!(rendered.contains("[redacted]"));
}
