// piiguard-core/src/recognizers/pattern_recognizer.rs
//! A recognizer that evaluates a list of compiled regex patterns.
//! License: MIT OR APACHE 2.0

use crate::detection::{log_captured_match_debug, Detection, EntityType};
use crate::pattern::Pattern;

/// Evaluates its patterns over the text; every match becomes a detection of
/// `entity_type` scored with the pattern's base score.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    entity_type: EntityType,
    patterns: Vec<Pattern>,
}

impl PatternRecognizer {
    pub fn new(entity_type: EntityType, patterns: Vec<Pattern>) -> Self {
        Self { entity_type, patterns }
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Finds all matches of every pattern. Matches of one pattern never overlap
    /// each other (leftmost-first scan); matches of different patterns may.
    pub fn detect(&self, text: &str, recognizer_name: &str) -> Vec<Detection> {
        let mut detections = Vec::new();

        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                log_captured_match_debug(module_path!(), &pattern.name, m.as_str());

                if !pattern.accepts(m.as_str()) {
                    log::debug!(
                        "Pattern '{}' match at {}..{} rejected by {:?} validation.",
                        pattern.name,
                        m.start(),
                        m.end(),
                        pattern.validator
                    );
                    continue;
                }

                detections.push(Detection::new(
                    self.entity_type.clone(),
                    m.start(),
                    m.end(),
                    pattern.score,
                    recognizer_name,
                ));
            }
        }

        detections
    }
}
