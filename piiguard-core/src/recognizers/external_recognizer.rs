// piiguard-core/src/recognizers/external_recognizer.rs
//! Adapts an [`EntityModel`] to the recognizer contract.
//!
//! The model is opaque: its labels are mapped to entity types, malformed
//! entities are discarded, and backend failures become `ModelUnavailable`
//! so the analyzer can isolate them.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use piiguard_context::scoring::is_valid_score;

use super::{EntityModel, ModelEntity};
use crate::detection::{Detection, EntityType};
use crate::errors::PiiGuardError;

/// A recognizer backed by an external entity model.
#[derive(Clone)]
pub struct ExternalRecognizer {
    model: Arc<dyn EntityModel>,
    labels: BTreeMap<String, EntityType>,
}

impl fmt::Debug for ExternalRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalRecognizer")
            .field("model", &self.model.name())
            .field("labels", &self.labels)
            .finish()
    }
}

impl ExternalRecognizer {
    /// `labels` maps model labels to the entity types they report as.
    pub fn new(model: Arc<dyn EntityModel>, labels: BTreeMap<String, EntityType>) -> Self {
        Self { model, labels }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn labels(&self) -> &BTreeMap<String, EntityType> {
        &self.labels
    }

    pub async fn detect(
        &self,
        text: &str,
        language: &str,
        recognizer_name: &str,
    ) -> Result<Vec<Detection>, PiiGuardError> {
        let entities = self
            .model
            .infer(text, language)
            .await
            .map_err(|e| PiiGuardError::ModelUnavailable {
                recognizer: recognizer_name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(entities
            .into_iter()
            .filter_map(|entity| self.to_detection(text, entity, recognizer_name))
            .collect())
    }

    fn to_detection(&self, text: &str, entity: ModelEntity, recognizer_name: &str) -> Option<Detection> {
        let Some(entity_type) = self.labels.get(&entity.label) else {
            debug!("{}: dropping unmapped model label '{}'", recognizer_name, entity.label);
            return None;
        };

        let span_ok = entity.start < entity.end
            && entity.end <= text.len()
            && text.is_char_boundary(entity.start)
            && text.is_char_boundary(entity.end);
        if !span_ok {
            debug!(
                "{}: dropping '{}' entity with invalid span {}..{}",
                recognizer_name, entity.label, entity.start, entity.end
            );
            return None;
        }

        if !is_valid_score(entity.score) {
            debug!(
                "{}: dropping '{}' entity with out-of-range score {}",
                recognizer_name, entity.label, entity.score
            );
            return None;
        }

        Detection::try_new(
            entity_type.clone(),
            entity.start,
            entity.end,
            entity.score,
            recognizer_name,
        )
    }
}
