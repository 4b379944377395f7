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

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("PARFUM_BACKEND_URL", "https://shop.example.supabase.co");
    m.insert("PARFUM_BACKEND_ANON_KEY", "anon-key");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PARFUM_ENV"));
}

#[test]
fn build_app_config_fails_without_backend_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PARFUM_BACKEND_URL"),
        "expected MissingEnvVar(PARFUM_BACKEND_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_blank_anon_key() {
    let mut map = full_env();
    map.insert("PARFUM_BACKEND_ANON_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PARFUM_BACKEND_ANON_KEY"),
        "expected MissingEnvVar(PARFUM_BACKEND_ANON_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_backend_url() {
    let mut map = full_env();
    map.insert("PARFUM_BACKEND_URL", "ftp://example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PARFUM_BACKEND_URL"),
        "expected InvalidEnvVar(PARFUM_BACKEND_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.backend_url, "https://shop.example.supabase.co");
    assert_eq!(cfg.backend_anon_key, "anon-key");
    assert!(cfg.session.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir.to_str(), Some("./.parfum"));
    assert_eq!(cfg.storefront_path.to_str(), Some("./config/storefront.yaml"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "parfum/0.1 (storefront)");
    assert_eq!(cfg.invoice_bucket, "invoices");
    assert_eq!(cfg.image_bucket, "product-images");
}

#[test]
fn storage_path_lives_in_data_dir() {
    let mut map = full_env();
    map.insert("PARFUM_DATA_DIR", "/tmp/parfum");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.storage_path().to_str(), Some("/tmp/parfum/storage.json"));
}

#[test]
fn session_requires_both_token_and_user_id() {
    let mut map = full_env();
    map.insert("PARFUM_ACCESS_TOKEN", "jwt");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PARFUM_USER_ID"),
        "expected MissingEnvVar(PARFUM_USER_ID), got: {result:?}"
    );

    let mut map = full_env();
    map.insert("PARFUM_USER_ID", "user-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PARFUM_ACCESS_TOKEN"),
        "expected MissingEnvVar(PARFUM_ACCESS_TOKEN), got: {result:?}"
    );
}

#[test]
fn session_is_built_when_token_and_user_id_present() {
    let mut map = full_env();
    map.insert("PARFUM_ACCESS_TOKEN", "jwt");
    map.insert("PARFUM_USER_ID", "user-1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let session = cfg.session.expect("session should be present");
    assert_eq!(session.access_token, "jwt");
    assert_eq!(session.user_id, "user-1");
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("PARFUM_ACCESS_TOKEN", "super-secret-jwt");
    map.insert("PARFUM_USER_ID", "user-1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("anon-key"), "anon key leaked: {rendered}");
    assert!(!rendered.contains("super-secret-jwt"), "token leaked: {rendered}");
    assert!(rendered.contains("user-1"));
}

#[test]
fn request_timeout_secs_override() {
    let mut map = full_env();
    map.insert("PARFUM_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("PARFUM_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PARFUM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PARFUM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_secs_zero_is_rejected() {
    let mut map = full_env();
    map.insert("PARFUM_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PARFUM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PARFUM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn bucket_overrides() {
    let mut map = full_env();
    map.insert("PARFUM_INVOICE_BUCKET", "orders");
    map.insert("PARFUM_IMAGE_BUCKET", "media");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.invoice_bucket, "orders");
    assert_eq!(cfg.image_bucket, "media");
}
