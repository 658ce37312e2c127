//! Fakes and stub servers shared by unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::core::errors::{PipelineError, Result};
use crate::core::models::{Label, TranslationRequest};
use crate::core::services::{ImageFetcher, LabelDetector, ServiceContext, TextTranslator};

/// Serve `app` on an ephemeral port and return its base URL
pub async fn spawn_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub struct FakeFetcher {
    pub fail: bool,
}

#[async_trait]
impl ImageFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        if self.fail {
            return Err(PipelineError::fetch(format!("unreachable host: {}", url)));
        }
        Ok(vec![0xff, 0xd8, 0xff])
    }
}

pub struct FakeDetector {
    pub labels: Option<Vec<Label>>,
}

#[async_trait]
impl LabelDetector for FakeDetector {
    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<Label>> {
        self.labels
            .clone()
            .ok_or_else(|| PipelineError::detection("service unavailable"))
    }
}

/// Looks texts up in a dictionary and records every request
#[derive(Default)]
pub struct FakeTranslator {
    pub dictionary: Vec<(String, String)>,
    pub fail: bool,
    pub requests: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl FakeTranslator {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            dictionary: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextTranslator for FakeTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.text.clone());

        if self.fail {
            return Err(PipelineError::translation("service unavailable"));
        }

        self.dictionary
            .iter()
            .find(|(k, _)| k == &request.text)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| PipelineError::translation(format!("no entry for {}", request.text)))
    }
}

pub fn context(
    fetcher: FakeFetcher,
    detector: FakeDetector,
    translator: Arc<FakeTranslator>,
) -> ServiceContext {
    ServiceContext::new(Arc::new(fetcher), Arc::new(detector), translator)
}

/// Captures formatted log output of the current thread
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Install as the thread-local subscriber until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
