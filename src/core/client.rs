//! HTTP adapters for the image, detection and translation services

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::errors::{PipelineError, Result};
use crate::core::models::{Label, TranslationRequest};
use crate::core::services::{ImageFetcher, LabelDetector, TextTranslator};

/// Shared HTTP client with the configured timeout
pub fn build_client(timeout_ms: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| PipelineError::config(format!("failed to build HTTP client: {}", e)))
}

/// Scheme, host, port and path only; query strings may carry tokens
pub fn redact_url(url: &Url) -> String {
    let mut shown = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        shown.push_str(&format!(":{}", port));
    }
    shown.push_str(url.path());
    shown
}

/// Downloads images over plain GET
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let shown = redact_url(url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PipelineError::fetch(format!("{} for {}", e.without_url(), shown)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(format!("HTTP {} for {}", status.as_u16(), shown)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::fetch(format!("{} for {}", e.without_url(), shown)))?;
        debug!("Fetched {} bytes from {}", bytes.len(), shown);

        Ok(bytes.to_vec())
    }
}

#[derive(Deserialize)]
struct DetectLabelsResponse {
    #[serde(rename = "Labels")]
    labels: Vec<Label>,
}

/// Label detection service client
#[derive(Debug, Clone)]
pub struct HttpLabelDetector {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpLabelDetector {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl LabelDetector for HttpLabelDetector {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<Label>> {
        let body = serde_json::json!({
            "Image": {
                "Bytes": base64::engine::general_purpose::STANDARD.encode(image)
            }
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(PipelineError::detection)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::detection(format!(
                "{} - {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: DetectLabelsResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::detection(format!("invalid response: {}", e)))?;

        if let Some(bad) = parsed
            .labels
            .iter()
            .find(|l| !(0.0..=100.0).contains(&l.confidence))
        {
            return Err(PipelineError::detection(format!(
                "confidence {} out of range for {}",
                bad.confidence, bad.name
            )));
        }

        debug!("Detection service returned {} labels", parsed.labels.len());
        Ok(parsed.labels)
    }
}

#[derive(Deserialize)]
struct TranslateTextResponse {
    #[serde(rename = "TranslatedText")]
    translated_text: String,
}

/// Translation service client
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl TextTranslator for HttpTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        let body = serde_json::json!({
            "SourceLanguageCode": request.source_lang,
            "TargetLanguageCode": request.target_lang,
            "Text": request.text,
        });

        let mut http_request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {}", key));
        }

        let response = http_request
            .send()
            .await
            .map_err(PipelineError::translation)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::translation(format!(
                "{} - {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: TranslateTextResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::translation(format!("invalid response: {}", e)))?;

        Ok(parsed.translated_text)
    }
}
