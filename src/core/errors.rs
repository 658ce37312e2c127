//! Custom error types for the label pipeline

use thiserror::Error;

/// Pipeline errors, tagged by the step that raised them
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image could not be retrieved
    #[error("Fetch error: {message}")]
    Fetch {
        message: String,
    },

    /// Label detection service failed or answered with garbage
    #[error("Detection error: {message}")]
    Detection {
        message: String,
    },

    /// Translation service failed or answered with garbage
    #[error("Translation error: {message}")]
    Translation {
        message: String,
    },

    /// Translated tokens do not line up with the detected labels
    #[error("Alignment error: expected {expected} translated labels, got {actual}")]
    Alignment {
        expected: usize,
        actual: usize,
    },

    /// Missing required field in the invocation event
    #[error("Missing required field: {field}")]
    MissingField {
        field: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Short stable tag used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Detection { .. } => "detection",
            PipelineError::Translation { .. } => "translation",
            PipelineError::Alignment { .. } => "alignment",
            PipelineError::MissingField { .. } => "missing_field",
            PipelineError::Config { .. } => "config",
            PipelineError::Io(_) => "io",
            PipelineError::Json(_) => "json",
        }
    }

    pub(crate) fn fetch(message: impl ToString) -> Self {
        PipelineError::Fetch {
            message: message.to_string(),
        }
    }

    pub(crate) fn detection(message: impl ToString) -> Self {
        PipelineError::Detection {
            message: message.to_string(),
        }
    }

    pub(crate) fn translation(message: impl ToString) -> Self {
        PipelineError::Translation {
            message: message.to_string(),
        }
    }

    pub(crate) fn config(message: impl ToString) -> Self {
        PipelineError::Config {
            message: message.to_string(),
        }
    }
}

impl From<url::ParseError> for PipelineError {
    fn from(err: url::ParseError) -> Self {
        PipelineError::fetch(format!("invalid image URL: {}", err))
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_message() {
        let err = PipelineError::Alignment {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.kind(), "alignment");
        assert_eq!(
            err.to_string(),
            "Alignment error: expected 2 translated labels, got 3"
        );
    }

    #[test]
    fn test_url_parse_error_is_fetch() {
        let err: PipelineError = url::Url::parse("not a url").unwrap_err().into();
        assert_eq!(err.kind(), "fetch");
    }
}
