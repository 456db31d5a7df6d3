use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use catalog_core::DEFAULT_API_BASE_URL;
use url::Url;

pub const CONFIG_FILE: &str = "catalog.toml";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `catalog.toml` table, then environment variables.
pub fn load_settings_with(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("CATALOG_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

pub fn normalize_api_base_url(raw_api_base_url: &str) -> anyhow::Result<String> {
    let trimmed = raw_api_base_url.trim().trim_end_matches('/');

    if trimmed.is_empty() {
        return Ok(Settings::default().api_base_url);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .with_context(|| format!("invalid catalog API url '{raw_api_base_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("catalog API url '{raw_api_base_url}' must use http or https");
    }
    if url.host_str().is_none() {
        bail!("catalog API url '{raw_api_base_url}' has no host");
    }

    Ok(candidate)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
