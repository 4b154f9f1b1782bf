use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use classify_core::ClassifierClient;
use reqwest::Client;
use shared::protocol::ClassifyRequest;
use url::Url;

pub mod config;

pub use config::{load_settings, Settings};

/// HTTP implementation of the classifier boundary. Transport only: the
/// response body is returned untouched, never interpreted.
pub struct HttpClassifierClient {
    http: Client,
    endpoint: Url,
}

impl HttpClassifierClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let endpoint = config::validate_classifier_url(&settings.classifier_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .context("failed to build classifier http client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ClassifierClient for HttpClassifierClient {
    async fn classify(&self, description: &str, supplier: &str) -> Result<String> {
        let started = Instant::now();
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ClassifyRequest {
                description: description.to_string(),
                supplier: supplier.to_string(),
            })
            .send()
            .await
            .with_context(|| format!("failed to reach classifier endpoint {}", self.endpoint))?
            .error_for_status()
            .with_context(|| {
                format!("classifier endpoint {} returned error status", self.endpoint)
            })?;

        let body = response
            .text()
            .await
            .context("failed to read classifier response body")?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "classifier round-trip complete"
        );
        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
