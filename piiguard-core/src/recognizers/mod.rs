// piiguard-core/src/recognizers/mod.rs
//! Concrete recognizer implementations.
//!
//! `pattern_recognizer` evaluates compiled regex patterns. `external_recognizer`
//! adapts any [`EntityModel`] (a statistical or NLP tagger) to the recognizer
//! contract, and `http_model` provides an `EntityModel` backed by a model server.
//!
//! License: MIT OR APACHE 2.0

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod external_recognizer;
pub mod http_model;
pub mod pattern_recognizer;

/// One entity as reported by a model, before label mapping and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntity {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

/// Failures a model backend may report.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model backend unavailable: {0}")]
    Unavailable(String),

    #[error("model returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// A statistical/NLP entity tagger consumed as an opaque capability.
///
/// Implementations must be deterministic for a fixed model version and must
/// synchronize any internal state (caches, batching buffers) themselves.
#[async_trait]
pub trait EntityModel: Send + Sync {
    fn name(&self) -> &str;

    /// Tags `text`. Offsets are byte offsets into `text`.
    async fn infer(&self, text: &str, language: &str) -> Result<Vec<ModelEntity>, ModelError>;
}
