// piiguard-core/src/context.rs
//! Context-based confidence boosting.

use piiguard_context::context::ContextScanner;
use piiguard_context::scoring::{boosted_score, BoostWeights};

use crate::config::EngineConfig;
use crate::detection::Detection;

/// Raises a detection's score when one of its recognizer's context words
/// appears within a bounded word window around the span.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContextEnhancer {
    weights: BoostWeights,
}

impl ContextEnhancer {
    pub fn new(weights: BoostWeights) -> Self {
        Self { weights }
    }

    pub fn from_config(engines: &EngineConfig) -> Self {
        Self::new(engines.boost_weights())
    }

    pub fn weights(&self) -> &BoostWeights {
        &self.weights
    }

    /// Returns `detection` with its score boosted at most once.
    ///
    /// Span and entity type are never touched. A detection that was already
    /// boosted comes back unchanged, however many context words match.
    pub fn enhance(&self, text: &str, detection: Detection, context: &ContextScanner) -> Detection {
        if detection.is_context_boosted() || context.is_empty() {
            return detection;
        }

        if context.scan_window(text, detection.start, detection.end, self.weights.window_words) {
            let score = boosted_score(detection.score, &self.weights);
            log::debug!(
                "Context boost for '{}' at {}..{}: {:.2} -> {:.2}",
                detection.entity_type,
                detection.start,
                detection.end,
                detection.score,
                score
            );
            return detection.with_boosted_score(score);
        }

        detection
    }
}
