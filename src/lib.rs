//! Image Label Translator
//!
//! Fetches an image, asks a label-detection service what it shows, translates
//! the confident labels to Portuguese and renders them as a short text
//! response. Service clients are injected through [`ServiceContext`].

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    config::HandlerConfig,
    errors::{PipelineError, Result},
    handler::Handler,
    models::{InvocationEvent, Label, LabelSet, Response, TranslationResult, TranslationStrategy},
    services::{ImageFetcher, LabelDetector, ServiceContext, TextTranslator},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
