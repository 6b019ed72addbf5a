//! errors.rs - Custom error types for the piiguard-core library.
//!
//! Configuration errors (`InvalidPattern`, `PatternLengthExceeded`,
//! `InvalidScore`, `InvalidRecognizer`) are fatal at startup. Per-recognizer
//! runtime errors (`ModelUnavailable`, `RecognizerTimeout`) are isolated by the
//! analyzer; only `UnsupportedLanguage` and `AllRecognizersFailed` reach the caller
//! of an analysis.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `piiguard-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PiiGuardError {
    #[error("Recognizer '{recognizer}': pattern '{pattern}' is invalid: {reason}")]
    InvalidPattern {
        recognizer: String,
        pattern: String,
        reason: String,
    },

    #[error("Recognizer '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Pattern '{0}': score {1} is outside [0.0, 1.0]")]
    InvalidScore(String, f64),

    #[error("Invalid recognizer configuration: {0}")]
    InvalidRecognizer(String),

    #[error("Language '{0}' is not supported by any registered recognizer")]
    UnsupportedLanguage(String),

    #[error("Recognizer '{recognizer}': model unavailable: {reason}")]
    ModelUnavailable { recognizer: String, reason: String },

    #[error("Recognizer '{recognizer}' timed out after {timeout_ms} ms")]
    RecognizerTimeout { recognizer: String, timeout_ms: u64 },

    #[error("All {} selected recognizers failed: {}", .failures.len(), .failures.join("; "))]
    AllRecognizersFailed { failures: Vec<String> },

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

impl PiiGuardError {
    /// True for errors that stem from bad configuration and must stop startup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PiiGuardError::InvalidPattern { .. }
                | PiiGuardError::PatternLengthExceeded(..)
                | PiiGuardError::InvalidScore(..)
                | PiiGuardError::InvalidRecognizer(..)
        )
    }

    /// True for failures a single recognizer may raise without failing the request.
    pub fn is_isolated(&self) -> bool {
        matches!(
            self,
            PiiGuardError::ModelUnavailable { .. } | PiiGuardError::RecognizerTimeout { .. }
        )
    }
}
