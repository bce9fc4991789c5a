use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so it can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(secs)
    };

    let provider_config_path = PathBuf::from(or_default(
        "FUELWATCH_PROVIDER_CONFIG",
        "./config/fuel.yaml",
    ));
    let log_level = or_default("FUELWATCH_LOG_LEVEL", "info");
    let update_interval_secs = parse_secs("FUELWATCH_UPDATE_INTERVAL_SECS", "600")?;
    let request_timeout_secs = parse_secs("FUELWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FUELWATCH_USER_AGENT", "fuelwatch/0.1 (smart-mirror)");
    let api_key = lookup("FUELWATCH_API_KEY").ok().filter(|v| !v.is_empty());
    let api_secret = lookup("FUELWATCH_API_SECRET").ok().filter(|v| !v.is_empty());

    Ok(AppConfig {
        provider_config_path,
        log_level,
        update_interval_secs,
        request_timeout_secs,
        user_agent,
        api_key,
        api_secret,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
