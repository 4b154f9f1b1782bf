use std::fs;

use anyhow::Context;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub classifier_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier_url: "http://127.0.0.1:8808/classify".into(),
            request_timeout_seconds: 30,
        }
    }
}

/// Layered settings resolution: defaults, then `classifier.toml` in the
/// working directory, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("classifier.toml") {
        if let Ok(file_cfg) = toml::from_str::<toml::Table>(&raw) {
            if let Some(v) = file_cfg.get("classifier_url").and_then(|v| v.as_str()) {
                settings.classifier_url = v.to_string();
            }
            if let Some(v) = file_cfg
                .get("request_timeout_seconds")
                .and_then(|v| v.as_integer())
            {
                if v > 0 {
                    settings.request_timeout_seconds = v as u64;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("CLASSIFIER_URL") {
        settings.classifier_url = v;
    }
    if let Ok(v) = std::env::var("APP__CLASSIFIER_URL") {
        settings.classifier_url = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            if parsed > 0 {
                settings.request_timeout_seconds = parsed;
            }
        }
    }

    settings
}

pub fn validate_classifier_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())
        .with_context(|| format!("invalid classifier url '{raw}'"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("classifier url '{raw}' must use http or https");
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_point_at_local_classifier() {
        let settings = Settings::default();
        assert_eq!(settings.classifier_url, "http://127.0.0.1:8808/classify");
        assert_eq!(settings.request_timeout_seconds, 30);
    }

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_classifier_url("http://127.0.0.1:8808/classify").is_ok());
        assert!(validate_classifier_url("https://classify.example.com/v1").is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace_before_parsing() {
        let url = validate_classifier_url("  http://127.0.0.1:8808/classify  ").expect("url");
        assert_eq!(url.path(), "/classify");
    }

    #[test]
    fn rejects_non_http_schemes_and_garbage() {
        assert!(validate_classifier_url("ftp://files.example.com").is_err());
        assert!(validate_classifier_url("not a url").is_err());
    }
}
