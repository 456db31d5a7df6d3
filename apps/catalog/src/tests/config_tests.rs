use super::{load_settings_with, normalize_api_base_url, Settings};

use std::{collections::HashMap, fs};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_point_at_public_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_with(&dir.path().join("missing.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_base_url, "https://fakestoreapi.com");
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.toml");
    fs::write(
        &path,
        "api_base_url = \"http://127.0.0.1:9000\"\nlog_filter = \"debug\"\n",
    )
    .expect("write config");

    let settings = load_settings_with(&path, no_env);
    assert_eq!(settings.api_base_url, "http://127.0.0.1:9000");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.toml");
    fs::write(&path, "api_base_url = \"http://from-file.test\"\n").expect("write config");

    let env: HashMap<&str, &str> = HashMap::from([
        ("CATALOG_API_URL", "http://legacy.test"),
        ("APP__API_BASE_URL", "http://app.test"),
        ("APP__LOG_FILTER", "catalog_core=trace"),
    ]);
    let settings = load_settings_with(&path, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.api_base_url, "http://app.test");
    assert_eq!(settings.log_filter, "catalog_core=trace");
}

#[test]
fn malformed_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.toml");
    fs::write(&path, "this is = = not toml").expect("write config");

    assert_eq!(load_settings_with(&path, no_env), Settings::default());
}

#[test]
fn normalizes_trailing_slash_and_missing_scheme() {
    assert_eq!(
        normalize_api_base_url("http://127.0.0.1:8080/").expect("valid"),
        "http://127.0.0.1:8080"
    );
    assert_eq!(
        normalize_api_base_url("  fakestoreapi.com  ").expect("valid"),
        "https://fakestoreapi.com"
    );
    assert_eq!(
        normalize_api_base_url("").expect("valid"),
        "https://fakestoreapi.com"
    );
}

#[test]
fn rejects_non_http_urls() {
    assert!(normalize_api_base_url("ftp://files.test").is_err());
    assert!(normalize_api_base_url("http://").is_err());
}
