// piiguard-core/src/lib.rs
//! # piiguard Core Library
//!
//! `piiguard-core` detects personally identifiable information (PII) spans in
//! free-form text. Independent recognizers (regex patterns and pluggable
//! statistical models) each report scored spans; the engine boosts them with
//! nearby context words and reconciles overlaps into one coherent result.
//!
//! ## Modules
//!
//! * `config`: YAML recognizer definitions and engine settings; loading, merging, validation.
//! * `pattern`: Compiled regex rules with a base score and optional checksum.
//! * `validators`: Luhn and Verhoeff checksums for pattern matches.
//! * `recognizer`: The `Recognizer` capability value and its `kind` dispatch.
//! * `recognizers`: Pattern and external (model-backed) recognizer implementations.
//! * `context`: `ContextEnhancer`, the word-window score booster.
//! * `registry`: The immutable, startup-built `RecognizerRegistry`.
//! * `resolver`: `ConflictResolver`, cross-recognizer overlap resolution.
//! * `analyzer`: `AnalyzerEngine`, the per-request orchestrator.
//! * `headless`: One-shot analysis for synchronous callers.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use piiguard_core::{AnalysisRequest, AnalyzerEngine, PiiGuardConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = PiiGuardConfig::load_default()?;
//! let engine = AnalyzerEngine::from_config(&config)?;
//!
//! let request = AnalysisRequest::new("My PAN is ABCDE1234F").with_entities(["IN_PAN"]);
//! for detection in engine.analyze(&request).await?.detections {
//!     println!("{} {}..{} {:.2}", detection.entity_type, detection.start, detection.end, detection.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`PiiGuardError`]; configuration loading uses
//! `anyhow::Result` with context. Invalid recognizer configuration fails at
//! construction. Per-recognizer runtime failures are isolated by the engine.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod analyzer;
pub mod config;
pub mod context;
pub mod detection;
pub mod errors;
pub mod headless;
pub mod pattern;
pub mod recognizer;
pub mod recognizers;
pub mod registry;
pub mod resolver;
pub mod validators;

/// Re-exports the configuration types and functions for managing recognizers.
pub use config::{
    find_user_config,
    merge_config,
    validate_config,
    EngineConfig,
    PatternConfig,
    PiiGuardConfig,
    RecognizerConfig,
    DEFAULT_LANGUAGE,
    MAX_PATTERN_LENGTH,
};

pub use errors::PiiGuardError;

/// Re-exports detection records and PII-safe logging helpers.
pub use detection::{redact_sensitive, Detection, EntityType};

pub use pattern::Pattern;
pub use recognizer::{Recognizer, RecognizerKind};
pub use recognizers::{EntityModel, ModelEntity, ModelError};
pub use recognizers::http_model::HttpEntityModel;
pub use context::ContextEnhancer;
pub use registry::{RecognizerRegistry, RegistryBuilder};
pub use resolver::{ConflictPolicy, ConflictResolver};

/// Re-exports the orchestrator and its request/result types.
pub use analyzer::{AnalysisRequest, AnalysisResult, AnalyzerEngine, RecognizerFailure};

/// Re-exports the one-shot helper for non-async callers.
pub use headless::headless_analyze_string;
