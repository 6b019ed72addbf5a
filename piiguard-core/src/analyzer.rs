// piiguard-core/src/analyzer.rs
//! The `AnalyzerEngine` orchestrates one analysis request end to end.
//!
//! Flow: select recognizers for the language and entity filter, run them
//! (pattern recognizers inline, external ones concurrently under a timeout),
//! boost each raw detection with its recognizer's context words, resolve
//! conflicts over the union, then re-apply the entity filter.
//!
//! A recognizer that fails is logged and recorded in
//! [`AnalysisResult::failures`]; it contributes nothing. Only when every
//! selected recognizer fails does the request itself fail.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::config::{PiiGuardConfig, DEFAULT_EXTERNAL_TIMEOUT_MS, DEFAULT_LANGUAGE};
use crate::context::ContextEnhancer;
use crate::detection::{log_detection_debug, Detection, EntityType};
use crate::errors::PiiGuardError;
use crate::recognizer::Recognizer;
use crate::registry::RecognizerRegistry;
use crate::resolver::ConflictResolver;

/// One request to analyze a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub language: String,
    /// Entity types to report. `None` means the engine's default set.
    pub entity_filter: Option<BTreeSet<EntityType>>,
}

impl AnalysisRequest {
    /// A request in the default language with no explicit entity filter.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            entity_filter: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Restricts the request to `entities`. An empty list leaves the filter unset.
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityType>,
    {
        let filter: BTreeSet<EntityType> = entities.into_iter().map(Into::into).collect();
        self.entity_filter = (!filter.is_empty()).then_some(filter);
        self
    }
}

/// A recognizer that contributed nothing because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecognizerFailure {
    pub recognizer: String,
    pub error: String,
}

/// Outcome of a successful analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Surviving detections, ascending by start, ties by descending score.
    pub detections: Vec<Detection>,
    pub failures: Vec<RecognizerFailure>,
}

impl AnalysisResult {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs recognizers against text and reconciles their findings.
///
/// Holds only immutable state, so one engine can serve concurrent requests
/// from behind an `Arc`.
#[derive(Debug)]
pub struct AnalyzerEngine {
    registry: Arc<RecognizerRegistry>,
    enhancer: ContextEnhancer,
    resolver: ConflictResolver,
    default_entities: Option<BTreeSet<EntityType>>,
    external_timeout: Duration,
}

impl AnalyzerEngine {
    /// Creates an engine over `registry`. `default_entities` is the allow-list
    /// used when a request names no entity types; `None` allows everything.
    pub fn new(registry: Arc<RecognizerRegistry>, default_entities: Option<BTreeSet<EntityType>>) -> Self {
        Self {
            registry,
            enhancer: ContextEnhancer::default(),
            resolver: ConflictResolver::default(),
            default_entities,
            external_timeout: Duration::from_millis(DEFAULT_EXTERNAL_TIMEOUT_MS),
        }
    }

    pub fn with_enhancer(mut self, enhancer: ContextEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    pub fn with_resolver(mut self, resolver: ConflictResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_external_timeout(mut self, timeout: Duration) -> Self {
        self.external_timeout = timeout;
        self
    }

    /// Builds the registry and every engine setting from `config`.
    pub fn from_config(config: &PiiGuardConfig) -> Result<Self, PiiGuardError> {
        let registry = Arc::new(RecognizerRegistry::from_config(config)?);
        let default_entities = config
            .default_entities
            .as_ref()
            .map(|tags| tags.iter().map(|t| EntityType::from(t.as_str())).collect());

        Ok(Self::new(registry, default_entities)
            .with_enhancer(ContextEnhancer::from_config(&config.engines))
            .with_resolver(ConflictResolver::from_config(&config.engines))
            .with_external_timeout(config.engines.external_timeout()))
    }

    pub fn registry(&self) -> &Arc<RecognizerRegistry> {
        &self.registry
    }

    pub fn default_entities(&self) -> Option<&BTreeSet<EntityType>> {
        self.default_entities.as_ref()
    }

    pub fn external_timeout(&self) -> Duration {
        self.external_timeout
    }

    /// Analyzes one request.
    ///
    /// Dropping the returned future aborts any external recognizer still running.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, PiiGuardError> {
        let request_id = Uuid::new_v4();

        if request.text.is_empty() {
            debug!("[{}] Empty text, nothing to analyze", request_id);
            return Ok(AnalysisResult::default());
        }

        let filter = match &request.entity_filter {
            Some(requested) if !requested.is_empty() => Some(requested),
            _ => self.default_entities.as_ref(),
        };

        let selected = self.registry.select(&request.language, filter)?;
        info!(
            "[{}] Analyzing {} bytes in '{}' with {} recognizers",
            request_id,
            request.text.len(),
            request.language,
            selected.len()
        );
        if selected.is_empty() {
            return Ok(AnalysisResult::default());
        }

        let text: Arc<str> = Arc::from(request.text.as_str());
        let mut raw = Vec::new();
        let mut failures = Vec::new();
        let mut pending = JoinSet::new();

        for recognizer in &selected {
            if recognizer.is_external() {
                let recognizer = Arc::clone(recognizer);
                let text = Arc::clone(&text);
                let language = request.language.clone();
                let timeout = self.external_timeout;
                pending.spawn(async move {
                    let outcome = match tokio::time::timeout(timeout, recognizer.detect(&text, &language)).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(PiiGuardError::RecognizerTimeout {
                            recognizer: recognizer.name().to_string(),
                            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        }),
                    };
                    (recognizer, outcome)
                });
            } else {
                let outcome = recognizer.detect(&text, &request.language).await;
                self.collect(request_id, &text, recognizer, outcome, &mut raw, &mut failures);
            }
        }

        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok((recognizer, outcome)) => {
                    self.collect(request_id, &text, &recognizer, outcome, &mut raw, &mut failures)
                }
                Err(e) => {
                    warn!("[{}] External recognizer task did not complete: {}", request_id, e);
                    failures.push(RecognizerFailure {
                        recognizer: "<external>".to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if failures.len() == selected.len() {
            return Err(PiiGuardError::AllRecognizersFailed {
                failures: failures.into_iter().map(|f| f.error).collect(),
            });
        }

        let mut detections = self.resolver.resolve(raw);
        if let Some(wanted) = filter {
            detections.retain(|d| wanted.contains(&d.entity_type));
        }

        info!(
            "[{}] Analysis finished: {} detections, {} failed recognizers",
            request_id,
            detections.len(),
            failures.len()
        );
        Ok(AnalysisResult { detections, failures })
    }

    fn collect(
        &self,
        request_id: Uuid,
        text: &str,
        recognizer: &Recognizer,
        outcome: Result<Vec<Detection>, PiiGuardError>,
        raw: &mut Vec<Detection>,
        failures: &mut Vec<RecognizerFailure>,
    ) {
        match outcome {
            Ok(found) => {
                debug!("[{}] '{}' produced {} raw detections", request_id, recognizer.name(), found.len());
                for detection in found {
                    let detection = self.enhancer.enhance(text, detection, recognizer.context());
                    log_detection_debug(module_path!(), &detection, text);
                    raw.push(detection);
                }
            }
            Err(e) => {
                warn!("[{}] Recognizer '{}' failed: {}", request_id, recognizer.name(), e);
                failures.push(RecognizerFailure {
                    recognizer: recognizer.name().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
}
