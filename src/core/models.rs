//! Core data models for the label pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Labels below this confidence are discarded
pub const CONFIDENCE_THRESHOLD: f64 = 80.0;

/// Source language sent to the translation service
pub const SOURCE_LANG: &str = "en";

/// Target language sent to the translation service
pub const TARGET_LANG: &str = "pt";

/// A detected label with its confidence (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

impl Label {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Labels that passed the confidence threshold, in detection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Keep labels with confidence >= [`CONFIDENCE_THRESHOLD`], preserving order
    pub fn filtered(labels: Vec<Label>) -> Self {
        let labels = labels
            .into_iter()
            .filter(|l| l.confidence >= CONFIDENCE_THRESHOLD)
            .collect();
        Self { labels }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.name.as_str())
    }

    /// Names joined with `" and "`
    pub fn joined_names(&self) -> String {
        self.names().collect::<Vec<_>>().join(" and ")
    }
}

/// Translated tokens, one per label of the [`LabelSet`] they came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationResult {
    pub tokens: Vec<String>,
}

impl TranslationResult {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Split a translated joined string on the Portuguese `" e "`
    pub fn from_joined(translated: &str) -> Self {
        Self {
            tokens: translated.split(" e ").map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Single text translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    /// English to Portuguese request
    pub fn en_to_pt(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: SOURCE_LANG.to_string(),
            target_lang: TARGET_LANG.to_string(),
        }
    }
}

/// How label names are sent to the translation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationStrategy {
    /// One request per label; alignment is structural
    #[default]
    PerLabel,
    /// One request for `"a and b"`, split back on `" e "`
    Joined,
}

impl fmt::Display for TranslationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationStrategy::PerLabel => write!(f, "per-label"),
            TranslationStrategy::Joined => write!(f, "joined"),
        }
    }
}

impl FromStr for TranslationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-label" | "per_label" => Ok(TranslationStrategy::PerLabel),
            "joined" => Ok(TranslationStrategy::Joined),
            other => Err(format!("unknown translation strategy: {}", other)),
        }
    }
}

/// Query string of an invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParameters {
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request metadata of an invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Incoming invocation event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub query_string_parameters: Option<QueryParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
}

impl InvocationEvent {
    /// Event carrying only an image URL
    pub fn for_image(image_url: impl Into<String>) -> Self {
        Self {
            query_string_parameters: Some(QueryParameters {
                image_url: Some(image_url.into()),
            }),
            request_context: None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|q| q.image_url.as_deref())
    }

    /// Request id from the context, or `inv-<unix millis>`
    pub fn request_id(&self) -> String {
        self.request_context
            .as_ref()
            .and_then(|c| c.request_id.clone())
            .unwrap_or_else(|| format!("inv-{}", chrono::Utc::now().timestamp_millis()))
    }
}

/// Terminal output of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub const INTERNAL_ERROR_BODY: &'static str = "Internal server error.";

    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn internal_error() -> Self {
        Self {
            status_code: 500,
            body: Self::INTERNAL_ERROR_BODY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_all_above_threshold() {
        let labels = vec![Label::new("Cat", 95.5), Label::new("Dog", 80.0)];
        let set = LabelSet::filtered(labels.clone());
        assert_eq!(set.labels(), labels.as_slice());
    }

    #[test]
    fn test_filter_mixed_preserves_order() {
        let set = LabelSet::filtered(vec![
            Label::new("Pet", 99.1),
            Label::new("Tree", 79.99),
            Label::new("Cat", 85.0),
            Label::new("Grass", 12.0),
            Label::new("Animal", 80.0),
        ]);
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["Pet", "Cat", "Animal"]);
    }

    #[test]
    fn test_joined_names() {
        let set = LabelSet::filtered(vec![Label::new("Cat", 95.5), Label::new("Dog", 82.1)]);
        assert_eq!(set.joined_names(), "Cat and Dog");
        assert_eq!(LabelSet::filtered(vec![]).joined_names(), "");
    }

    #[test]
    fn test_split_joined_translation() {
        let result = TranslationResult::from_joined("Gato e Cachorro");
        assert_eq!(result.tokens, vec!["Gato", "Cachorro"]);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("joined".parse::<TranslationStrategy>().unwrap(), TranslationStrategy::Joined);
        assert_eq!(
            "Per-Label".parse::<TranslationStrategy>().unwrap(),
            TranslationStrategy::PerLabel
        );
        assert!("batch".parse::<TranslationStrategy>().is_err());
        assert_eq!(TranslationStrategy::default().to_string(), "per-label");
    }

    #[test]
    fn test_event_deserialize() {
        let event: InvocationEvent = serde_json::from_str(
            r#"{"queryStringParameters":{"imageUrl":"https://img.test/cat.jpg"},"requestContext":{"requestId":"abc"}}"#,
        )
        .unwrap();
        assert_eq!(event.image_url(), Some("https://img.test/cat.jpg"));
        assert_eq!(event.request_id(), "abc");

        let empty: InvocationEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.image_url(), None);
        assert!(empty.request_id().starts_with("inv-"));
    }

    #[test]
    fn test_label_wire_names() {
        let label: Label = serde_json::from_str(r#"{"Name":"Cat","Confidence":95.5}"#).unwrap();
        assert_eq!(label, Label::new("Cat", 95.5));
    }
}
