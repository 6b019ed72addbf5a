//! pattern.rs - Compilation of recognizer patterns.
//!
//! Converts `PatternConfig` entries into immutable `Pattern` values holding a
//! compiled regular expression. Compilation happens once, when the registry is
//! built; a pattern that fails to compile is a startup error.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};

use piiguard_context::scoring::is_valid_score;

use crate::config::{PatternConfig, MAX_PATTERN_LENGTH};
use crate::errors::PiiGuardError;
use crate::validators::Validator;

/// Upper bound on the compiled size of a single regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled, immutable detection rule.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The unique name of the pattern within its recognizer.
    pub name: String,
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Base confidence assigned to every match.
    pub score: f64,
    /// Optional checksum matches must satisfy.
    pub validator: Option<Validator>,
}

impl Pattern {
    /// Compiles a case-sensitive pattern with no validator.
    pub fn new(name: &str, regex: &str, score: f64) -> Result<Self, PiiGuardError> {
        Self::build("<inline>", name, regex, score, false, None)
    }

    /// Compiles a pattern from its configuration. `recognizer` names the owner in errors.
    pub fn compile(recognizer: &str, config: &PatternConfig) -> Result<Self, PiiGuardError> {
        Self::build(
            recognizer,
            &config.name,
            &config.regex,
            config.score,
            config.case_insensitive,
            config.validator,
        )
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// True if `matched` passes this pattern's validator (or there is none).
    pub fn accepts(&self, matched: &str) -> bool {
        self.validator.map_or(true, |v| v.validate(matched))
    }

    fn build(
        recognizer: &str,
        name: &str,
        regex: &str,
        score: f64,
        case_insensitive: bool,
        validator: Option<Validator>,
    ) -> Result<Self, PiiGuardError> {
        debug!("Attempting to compile pattern '{}' of recognizer '{}'", name, recognizer);

        if regex.len() > MAX_PATTERN_LENGTH {
            return Err(PiiGuardError::PatternLengthExceeded(
                recognizer.to_string(),
                regex.len(),
                MAX_PATTERN_LENGTH,
            ));
        }
        if !is_valid_score(score) {
            return Err(PiiGuardError::InvalidScore(name.to_string(), score));
        }

        let compiled = RegexBuilder::new(regex)
            .case_insensitive(case_insensitive)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| PiiGuardError::InvalidPattern {
                recognizer: recognizer.to_string(),
                pattern: name.to_string(),
                reason: e.to_string(),
            })?;

        log::debug!(
            target: "piiguard_core::pattern",
            "Pattern '{}' compiled successfully.",
            name
        );

        Ok(Self {
            name: name.to_string(),
            regex: compiled,
            score,
            validator,
        })
    }
}

/// Compiles every pattern of one recognizer, reporting all failures together.
pub fn compile_patterns(recognizer: &str, configs: &[PatternConfig]) -> Result<Vec<Pattern>, PiiGuardError> {
    debug!("Starting compilation of {} patterns for '{}'.", configs.len(), recognizer);

    let mut compiled = Vec::with_capacity(configs.len());
    let mut errors = Vec::new();

    for config in configs {
        match Pattern::compile(recognizer, config) {
            Ok(pattern) => compiled.push(pattern),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => {
            debug!("Finished compiling patterns for '{}'. Total compiled: {}.", recognizer, compiled.len());
            Ok(compiled)
        }
        1 => Err(errors.remove(0)),
        n => {
            let message = errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join("\n");
            Err(PiiGuardError::InvalidRecognizer(format!(
                "Failed to compile {} patterns of '{}':\n{}",
                n, recognizer, message
            )))
        }
    }
}
