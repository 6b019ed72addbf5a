// piiguard-core/src/detection.rs
//! Core data structures for detected PII spans, plus PII-safe debug logging helpers.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use lazy_static::lazy_static;
use log::debug;
use piiguard_context::scoring::is_valid_score;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Initialized once to determine if raw PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PIIGUARD_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// An opaque entity tag such as `EMAIL_ADDRESS` or `IN_PAN`.
///
/// The set of tags is open: recognizers may introduce new ones without any
/// change to the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityType {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for EntityType {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Borrow<str> for EntityType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EntityType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single detected span. Offsets are half-open byte offsets into the analyzed text.
///
/// Span and entity type are fixed at construction; only the context enhancer
/// changes the score, and only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub entity_type: EntityType,
    pub start: usize,
    pub end: usize,
    pub score: f64,
    /// Name of the recognizer that produced this detection.
    pub recognizer: String,
    #[serde(skip)]
    context_boosted: bool,
}

impl Detection {
    /// Creates a detection over `start..end`.
    ///
    /// # Panics
    ///
    /// Panics if `start >= end`. Use [`Detection::try_new`] for spans that come
    /// from untrusted sources.
    pub fn new(
        entity_type: EntityType,
        start: usize,
        end: usize,
        score: f64,
        recognizer: impl Into<String>,
    ) -> Self {
        assert!(start < end, "detection span {}..{} must be non-empty", start, end);
        Self::unchecked(entity_type, start, end, score, recognizer.into())
    }

    /// Creates a detection, or `None` if the span is empty or inverted or the
    /// score lies outside `[0.0, 1.0]`.
    pub fn try_new(
        entity_type: EntityType,
        start: usize,
        end: usize,
        score: f64,
        recognizer: impl Into<String>,
    ) -> Option<Self> {
        if start >= end || !is_valid_score(score) {
            return None;
        }
        Some(Self::unchecked(entity_type, start, end, score, recognizer.into()))
    }

    fn unchecked(entity_type: EntityType, start: usize, end: usize, score: f64, recognizer: String) -> Self {
        Self {
            entity_type,
            start,
            end,
            score,
            recognizer,
            context_boosted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open interval overlap.
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_context_boosted(&self) -> bool {
        self.context_boosted
    }

    pub(crate) fn with_boosted_score(mut self, score: f64) -> Self {
        self.score = score;
        self.context_boosted = true;
        self
    }

    /// The matched slice of `text`, if the span is valid for it.
    pub fn matched<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

/// Output order: ascending `start`, ties by descending `score`, then by span
/// length and entity type so the order is total.
pub fn output_order(a: &Detection, b: &Detection) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
        .then_with(|| a.recognizer.cmp(&b.recognizer))
}

pub fn sort_detections(detections: &mut [Detection]) {
    detections.sort_by(output_order);
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_detection_debug(module_path: &str, detection: &Detection, text: &str) {
    debug!(
        "{} Detection: Type='{}', Span={}..{}, Score={:.2}, Recognizer='{}', Text='{}'",
        module_path,
        detection.entity_type,
        detection.start,
        detection.end,
        detection.score,
        detection.recognizer,
        get_loggable_content(detection.matched(text).unwrap_or_default())
    );
}

pub fn log_captured_match_debug(module_path: &str, pattern_name: &str, original_sensitive_content: &str) {
    debug!(
        "{} Captured match for pattern '{}' (original): '{}'",
        module_path,
        pattern_name,
        get_loggable_content(original_sensitive_content)
    );
}
