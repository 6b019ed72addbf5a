// piiguard-core/src/registry.rs
//! The startup-built directory of recognizers per language.
//!
//! A [`RegistryBuilder`] collects recognizers once during initialization and
//! [`RegistryBuilder::build`] freezes them into a [`RecognizerRegistry`]. The
//! registry has no mutating methods, so it can be shared across concurrent
//! requests behind an `Arc` without locks.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use log::{debug, info};

use crate::config::PiiGuardConfig;
use crate::detection::EntityType;
use crate::errors::PiiGuardError;
use crate::recognizer::Recognizer;

/// Accumulates recognizers before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    names: HashSet<String>,
    by_language: BTreeMap<String, Vec<Arc<Recognizer>>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a recognizer. Registration order is preserved per language.
    pub fn add(mut self, recognizer: Recognizer) -> Result<Self, PiiGuardError> {
        if !self.names.insert(recognizer.name().to_string()) {
            return Err(PiiGuardError::InvalidRecognizer(format!(
                "Duplicate recognizer name found: '{}'.",
                recognizer.name()
            )));
        }
        debug!(
            "Registering {} recognizer '{}' for language '{}'",
            recognizer.kind_name(),
            recognizer.name(),
            recognizer.language()
        );
        self.by_language
            .entry(recognizer.language().to_string())
            .or_default()
            .push(Arc::new(recognizer));
        Ok(self)
    }

    pub fn build(self) -> RecognizerRegistry {
        RecognizerRegistry {
            by_language: self.by_language,
        }
    }
}

/// Immutable mapping from language code to its ordered recognizers.
#[derive(Debug, Default)]
pub struct RecognizerRegistry {
    by_language: BTreeMap<String, Vec<Arc<Recognizer>>>,
}

impl RecognizerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Compiles every recognizer in `config`. Any invalid recognizer fails the
    /// whole build.
    pub fn from_config(config: &PiiGuardConfig) -> Result<Self, PiiGuardError> {
        let mut builder = RegistryBuilder::new();
        for recognizer_config in &config.recognizers {
            builder = builder.add(Recognizer::from_config(recognizer_config)?)?;
        }
        let registry = builder.build();
        info!(
            "Recognizer registry built: {} recognizers across languages {:?}",
            registry.len(),
            registry.supported_languages()
        );
        Ok(registry)
    }

    pub fn supported_languages(&self) -> Vec<&str> {
        self.by_language.keys().map(String::as_str).collect()
    }

    pub fn supports_language(&self, language: &str) -> bool {
        self.by_language.contains_key(language)
    }

    pub fn len(&self) -> usize {
        self.by_language.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }

    /// All recognizers for `language`, in registration order.
    pub fn recognizers_for(&self, language: &str) -> Result<&[Arc<Recognizer>], PiiGuardError> {
        self.by_language
            .get(language)
            .map(Vec::as_slice)
            .ok_or_else(|| PiiGuardError::UnsupportedLanguage(language.to_string()))
    }

    /// Recognizers for `language` emitting at least one entity type in `filter`.
    pub fn select(
        &self,
        language: &str,
        filter: Option<&BTreeSet<EntityType>>,
    ) -> Result<Vec<Arc<Recognizer>>, PiiGuardError> {
        Ok(self
            .recognizers_for(language)?
            .iter()
            .filter(|r| r.supports_any(filter))
            .cloned()
            .collect())
    }

    /// Every registered recognizer, grouped by language.
    pub fn all(&self) -> impl Iterator<Item = &Arc<Recognizer>> {
        self.by_language.values().flatten()
    }

    /// Entity types any recognizer for `language` can emit.
    pub fn entities_for(&self, language: &str) -> BTreeSet<EntityType> {
        self.by_language
            .get(language)
            .into_iter()
            .flatten()
            .flat_map(|r| r.supported_entities().iter().cloned())
            .collect()
    }
}
