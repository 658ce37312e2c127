//! Label pipeline: fetch, detect, translate, format

use tracing::{debug, error, info, info_span, Instrument};
use url::Url;

use crate::core::config::HandlerConfig;
use crate::core::errors::{PipelineError, Result};
use crate::core::models::{
    InvocationEvent, LabelSet, Response, TranslationRequest, TranslationResult, TranslationStrategy,
};
use crate::core::services::ServiceContext;

/// Prefix of every successful body
pub const BODY_PREFIX: &str = "A imagem tem\n ";

/// Stateless request handler
#[derive(Debug, Clone)]
pub struct Handler {
    services: ServiceContext,
    strategy: TranslationStrategy,
}

impl Handler {
    /// Create a handler over the given services
    pub fn new(services: ServiceContext, strategy: TranslationStrategy) -> Self {
        Self { services, strategy }
    }

    /// Create a handler backed by the HTTP adapters
    pub fn from_config(config: &HandlerConfig) -> Result<Self> {
        let services = ServiceContext::from_config(config)?;
        Ok(Self::new(services, config.strategy))
    }

    pub fn strategy(&self) -> TranslationStrategy {
        self.strategy
    }

    /// Run one invocation. Every failure becomes the generic 500 response.
    pub async fn handle(&self, event: &InvocationEvent) -> Response {
        let span = info_span!("invocation", request_id = %event.request_id());

        match self.run(event).instrument(span.clone()).await {
            Ok(body) => Response::ok(body),
            Err(e) => {
                span.in_scope(|| error!(kind = e.kind(), "Error: {}", e));
                Response::internal_error()
            }
        }
    }

    /// Pipeline body, returning the formatted text or the tagged error
    pub async fn run(&self, event: &InvocationEvent) -> Result<String> {
        let image_url = event.image_url().ok_or_else(|| PipelineError::MissingField {
            field: "queryStringParameters.imageUrl".to_string(),
        })?;
        let url = parse_image_url(image_url)?;

        let image = self.services.fetcher.fetch(&url).await?;
        let labels = self.detect_labels(&image).await?;
        info!("Detecting labels...");

        info!("Translating to portuguese...");
        let translated = self.translate_labels(&labels).await?;

        info!("Handling final objects...");
        let text = format_results(&translated, &labels)?;

        info!("Finishing...");
        Ok(format!("{}{}", BODY_PREFIX, text))
    }

    /// Detect labels and keep the confident ones
    pub async fn detect_labels(&self, image: &[u8]) -> Result<LabelSet> {
        let detected = self.services.detector.detect_labels(image).await?;
        let total = detected.len();
        let labels = LabelSet::filtered(detected);
        debug!("Kept {} of {} labels", labels.len(), total);
        Ok(labels)
    }

    /// Translate label names to Portuguese, one token per label
    pub async fn translate_labels(&self, labels: &LabelSet) -> Result<TranslationResult> {
        if labels.is_empty() {
            debug!("No labels passed the threshold, skipping translation");
            return Ok(TranslationResult::default());
        }

        let result = match self.strategy {
            TranslationStrategy::PerLabel => {
                let mut tokens = Vec::with_capacity(labels.len());
                for name in labels.names() {
                    let request = TranslationRequest::en_to_pt(name);
                    tokens.push(self.services.translator.translate(&request).await?);
                }
                TranslationResult::new(tokens)
            }
            TranslationStrategy::Joined => {
                let request = TranslationRequest::en_to_pt(labels.joined_names());
                let translated = self.services.translator.translate(&request).await?;
                TranslationResult::from_joined(&translated)
            }
        };

        if result.len() != labels.len() {
            return Err(PipelineError::Alignment {
                expected: labels.len(),
                actual: result.len(),
            });
        }

        Ok(result)
    }
}

/// Parse the invocation URL; only absolute http(s) URLs are fetchable
pub fn parse_image_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PipelineError::fetch(format!("unsupported URL scheme: {}", other))),
    }
}

/// One line per label: `" 95.50% de ser do tipo Gato"`, joined with newlines
pub fn format_results(translated: &TranslationResult, labels: &LabelSet) -> Result<String> {
    if translated.len() != labels.len() {
        return Err(PipelineError::Alignment {
            expected: labels.len(),
            actual: translated.len(),
        });
    }

    let lines: Vec<String> = translated
        .tokens
        .iter()
        .zip(labels.labels())
        .map(|(token, label)| format!(" {}% de ser do tipo {}", to_fixed_2(label.confidence), token))
        .collect();

    Ok(lines.join("\n"))
}

/// Two decimals, exact halves rounded away from zero (`80.125` -> `80.13`).
///
/// Rounding looks at the full decimal expansion of the float, so `1.005`
/// (stored as `1.00499...`) gives `1.00`.
pub fn to_fixed_2(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // f64 has at most 1074 fractional decimal digits
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), "00"));

    let mut digits: Vec<u8> = int_part.bytes().chain(frac.bytes().take(2)).collect();
    if frac.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - 2;
    let sign = if value < 0.0 { "-" } else { "" };
    let whole: String = digits[..split].iter().map(|&b| b as char).collect();
    let cents: String = digits[split..].iter().map(|&b| b as char).collect();

    format!("{}{}.{}", sign, whole, cents)
}
