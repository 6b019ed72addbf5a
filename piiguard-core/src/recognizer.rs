// piiguard-core/src/recognizer.rs
//! Defines the `Recognizer` capability value.
//!
//! A recognizer is plain data plus a `kind` tag: either a set of compiled
//! patterns or a handle to an external entity model. A single `detect` method
//! dispatches on the tag, so new detectors plug in without an inheritance
//! hierarchy and the engine never needs to know which technology backs a
//! recognizer.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use piiguard_context::context::ContextScanner;

use crate::config::{RecognizerConfig, RecognizerKindConfig};
use crate::detection::{Detection, EntityType};
use crate::errors::PiiGuardError;
use crate::pattern::{compile_patterns, Pattern};
use crate::recognizers::external_recognizer::ExternalRecognizer;
use crate::recognizers::http_model::HttpEntityModel;
use crate::recognizers::pattern_recognizer::PatternRecognizer;
use crate::recognizers::EntityModel;

/// The detection strategy of a recognizer.
#[derive(Debug, Clone)]
pub enum RecognizerKind {
    Pattern(PatternRecognizer),
    External(ExternalRecognizer),
}

/// A detector for one or more entity types in one language.
///
/// Immutable after construction; shared across requests as `Arc<Recognizer>`.
#[derive(Debug)]
pub struct Recognizer {
    name: String,
    supported_entities: BTreeSet<EntityType>,
    language: String,
    context: ContextScanner,
    kind: RecognizerKind,
}

fn compile_context<S: AsRef<str>>(name: &str, words: &[S]) -> Result<ContextScanner, PiiGuardError> {
    ContextScanner::new(words).map_err(|e| {
        PiiGuardError::InvalidRecognizer(format!("Recognizer '{}': {}", name, e))
    })
}

impl Recognizer {
    /// Builds a pattern recognizer emitting `entity_type`.
    pub fn pattern<S: AsRef<str>>(
        name: &str,
        entity_type: EntityType,
        language: &str,
        patterns: Vec<Pattern>,
        context_words: &[S],
    ) -> Result<Self, PiiGuardError> {
        if patterns.is_empty() {
            return Err(PiiGuardError::InvalidRecognizer(format!(
                "Recognizer '{}' has no patterns.",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            supported_entities: BTreeSet::from([entity_type.clone()]),
            language: language.to_string(),
            context: compile_context(name, context_words)?,
            kind: RecognizerKind::Pattern(PatternRecognizer::new(entity_type, patterns)),
        })
    }

    /// Builds a recognizer backed by an external model. `labels` maps model
    /// labels to entity types; the supported entities are its values.
    pub fn external<S: AsRef<str>>(
        name: &str,
        language: &str,
        model: Arc<dyn EntityModel>,
        labels: BTreeMap<String, EntityType>,
        context_words: &[S],
    ) -> Result<Self, PiiGuardError> {
        if labels.is_empty() {
            return Err(PiiGuardError::InvalidRecognizer(format!(
                "Recognizer '{}' maps no model labels to entity types.",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            supported_entities: labels.values().cloned().collect(),
            language: language.to_string(),
            context: compile_context(name, context_words)?,
            kind: RecognizerKind::External(ExternalRecognizer::new(model, labels)),
        })
    }

    /// Builds a recognizer from its configuration, compiling every pattern.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self, PiiGuardError> {
        match config.kind {
            RecognizerKindConfig::Pattern => {
                let entity_type = config
                    .entity_type
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .ok_or_else(|| {
                        PiiGuardError::InvalidRecognizer(format!(
                            "Recognizer '{}' is missing the `entity_type` field.",
                            config.name
                        ))
                    })?;
                let patterns = compile_patterns(&config.name, &config.patterns)?;
                Self::pattern(
                    &config.name,
                    EntityType::from(entity_type),
                    &config.language,
                    patterns,
                    &config.context,
                )
            }
            RecognizerKindConfig::External => {
                let model_config = config.model.as_ref().ok_or_else(|| {
                    PiiGuardError::InvalidRecognizer(format!(
                        "Recognizer '{}' is missing the `model` section.",
                        config.name
                    ))
                })?;
                let labels = model_config
                    .labels
                    .iter()
                    .map(|(label, entity)| (label.clone(), EntityType::from(entity.as_str())))
                    .collect();
                let model = Arc::new(HttpEntityModel::from_config(&config.name, model_config));
                Self::external(&config.name, &config.language, model, labels, &config.context)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn supported_entities(&self) -> &BTreeSet<EntityType> {
        &self.supported_entities
    }

    pub fn context(&self) -> &ContextScanner {
        &self.context
    }

    pub fn kind(&self) -> &RecognizerKind {
        &self.kind
    }

    pub fn is_external(&self) -> bool {
        matches!(self.kind, RecognizerKind::External(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            RecognizerKind::Pattern(_) => "pattern",
            RecognizerKind::External(_) => "external",
        }
    }

    /// True if the recognizer emits at least one entity type in `filter`
    /// (always true without a filter).
    pub fn supports_any(&self, filter: Option<&BTreeSet<EntityType>>) -> bool {
        match filter {
            None => true,
            Some(wanted) => self.supported_entities.iter().any(|e| wanted.contains(e)),
        }
    }

    /// Runs the recognizer. A request in a language this recognizer does not
    /// serve yields no detections.
    pub async fn detect(&self, text: &str, language: &str) -> Result<Vec<Detection>, PiiGuardError> {
        if language != self.language {
            return Ok(Vec::new());
        }
        match &self.kind {
            RecognizerKind::Pattern(recognizer) => Ok(recognizer.detect(text, &self.name)),
            RecognizerKind::External(recognizer) => recognizer.detect(text, language, &self.name).await,
        }
    }
}
