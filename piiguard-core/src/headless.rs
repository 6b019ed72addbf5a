// piiguard-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot analysis from synchronous code.
//!
//! Builds a registry and engine from a configuration and runs a single request
//! on a private current-thread runtime, so callers need no async setup.

use anyhow::{Context, Result};

use crate::analyzer::{AnalysisRequest, AnalyzerEngine};
use crate::config::PiiGuardConfig;
use crate::detection::Detection;

/// Analyzes `text` once and returns the surviving detections.
///
/// # Arguments
///
/// * `config` - The merged configuration (defaults + optional user overrides).
/// * `text` - The text to analyze.
/// * `language` - Language code of `text`, e.g. `"en"`.
/// * `entities` - Entity types to report; empty means the configured defaults.
///
/// Must not be called from inside an async runtime.
pub fn headless_analyze_string(
    config: &PiiGuardConfig,
    text: &str,
    language: &str,
    entities: &[String],
) -> Result<Vec<Detection>> {
    let engine = AnalyzerEngine::from_config(config).context("Failed to build analyzer engine")?;
    let request = AnalysisRequest::new(text)
        .with_language(language)
        .with_entities(entities.iter().map(String::as_str));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(engine.analyze(&request))?;
    Ok(result.detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PiiGuardError;

    #[test]
    fn test_headless_analyze_string_defaults() -> Result<()> {
        let config = PiiGuardConfig::load_default()?;
        let detections = headless_analyze_string(&config, "My PAN is ABCDE1234F", "en", &[])?;
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].entity_type, "IN_PAN");
        assert_eq!((detections[0].start, detections[0].end), (10, 20));
        Ok(())
    }

    #[test]
    fn test_headless_analyze_string_unsupported_language() -> Result<()> {
        let config = PiiGuardConfig::load_default()?;
        let err = headless_analyze_string(&config, "texte", "fr", &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PiiGuardError>(),
            Some(PiiGuardError::UnsupportedLanguage(_))
        ));
        Ok(())
    }
}
