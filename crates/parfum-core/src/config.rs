use crate::app_config::{AppConfig, BackendSession, Environment};
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
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let backend_url = require("PARFUM_BACKEND_URL")?;
    if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PARFUM_BACKEND_URL".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }
    let backend_anon_key = require("PARFUM_BACKEND_ANON_KEY")?;

    let session = match (lookup("PARFUM_ACCESS_TOKEN").ok(), lookup("PARFUM_USER_ID").ok()) {
        (Some(access_token), Some(user_id)) => Some(BackendSession {
            access_token,
            user_id,
        }),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::MissingEnvVar("PARFUM_USER_ID".to_string())),
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar(
                "PARFUM_ACCESS_TOKEN".to_string(),
            ))
        }
    };

    let env = parse_environment(&or_default("PARFUM_ENV", "development"))?;
    let log_level = or_default("PARFUM_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("PARFUM_DATA_DIR", "./.parfum"));
    let storefront_path = PathBuf::from(or_default(
        "PARFUM_STOREFRONT_PATH",
        "./config/storefront.yaml",
    ));
    let request_timeout_secs = parse_u64("PARFUM_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PARFUM_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("PARFUM_USER_AGENT", "parfum/0.1 (storefront)");
    let invoice_bucket = or_default("PARFUM_INVOICE_BUCKET", "invoices");
    let image_bucket = or_default("PARFUM_IMAGE_BUCKET", "product-images");

    Ok(AppConfig {
        backend_url,
        backend_anon_key,
        session,
        env,
        log_level,
        data_dir,
        storefront_path,
        request_timeout_secs,
        user_agent,
        invoice_bucket,
        image_bucket,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PARFUM_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
