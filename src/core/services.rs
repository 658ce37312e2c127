//! Service seams used by the handler

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::core::client::{HttpImageFetcher, HttpLabelDetector, HttpTranslator};
use crate::core::config::HandlerConfig;
use crate::core::errors::Result;
use crate::core::models::{Label, TranslationRequest};

/// Retrieves raw image bytes
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Detects labels in raw image bytes
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Unfiltered labels in service order
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<Label>>;
}

/// Translates a single text
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String>;
}

/// Service handles passed to the handler at construction
#[derive(Clone)]
pub struct ServiceContext {
    pub fetcher: Arc<dyn ImageFetcher>,
    pub detector: Arc<dyn LabelDetector>,
    pub translator: Arc<dyn TextTranslator>,
}

impl ServiceContext {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        detector: Arc<dyn LabelDetector>,
        translator: Arc<dyn TextTranslator>,
    ) -> Self {
        Self {
            fetcher,
            detector,
            translator,
        }
    }

    /// HTTP adapters sharing one client
    pub fn from_config(config: &HandlerConfig) -> Result<Self> {
        config.validate()?;

        let client = crate::core::client::build_client(config.timeout_ms)?;

        Ok(Self {
            fetcher: Arc::new(HttpImageFetcher::new(client.clone())),
            detector: Arc::new(HttpLabelDetector::new(
                client.clone(),
                config.detection_endpoint.clone(),
                config.api_key.clone(),
            )),
            translator: Arc::new(HttpTranslator::new(
                client,
                config.translation_endpoint.clone(),
                config.api_key.clone(),
            )),
        })
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}
