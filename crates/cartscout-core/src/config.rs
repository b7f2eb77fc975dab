use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let rapid_api_key = require("RAPID_API_KEY")?;
    let completion_api_key = lookup("OPENAI_API_KEY").ok().filter(|v| !v.is_empty());

    let env = parse_environment(&or_default("CARTSCOUT_ENV", "development"))?;
    let log_level = or_default("CARTSCOUT_LOG_LEVEL", "info");

    let completion_base_url =
        or_default("CARTSCOUT_COMPLETION_BASE_URL", "https://api.openai.com/v1");
    let completion_model = or_default("CARTSCOUT_COMPLETION_MODEL", "gpt-4o-mini");
    let amazon_base_url = or_default(
        "CARTSCOUT_AMAZON_BASE_URL",
        "https://real-time-amazon-data.p.rapidapi.com",
    );
    let walmart_base_url = or_default(
        "CARTSCOUT_WALMART_BASE_URL",
        "https://walmart-data.p.rapidapi.com",
    );

    let request_timeout_secs = parse_u64("CARTSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CARTSCOUT_USER_AGENT", "cartscout/0.1 (product-search)");
    let max_retries = parse_u32("CARTSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("CARTSCOUT_RETRY_BACKOFF_BASE_SECS", "1")?;
    let platform_timeout_secs = parse_u64("CARTSCOUT_PLATFORM_TIMEOUT_SECS", "60")?;

    if platform_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CARTSCOUT_PLATFORM_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        rapid_api_key,
        completion_api_key,
        completion_base_url,
        completion_model,
        amazon_base_url,
        walmart_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        platform_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CARTSCOUT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
