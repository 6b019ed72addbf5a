//! Configuration management for `piiguard-core`.
//!
//! This module defines the data structures for recognizer definitions and engine
//! settings. It handles deserialization of YAML configurations and provides
//! utilities for loading, merging, filtering, and validating them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use piiguard_context::scoring::{is_valid_score, BoostWeights};

use crate::resolver::ConflictPolicy;
use crate::validators::Validator;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Language assumed when a recognizer or request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Timeout applied to external recognizers when the config does not set one.
pub const DEFAULT_EXTERNAL_TIMEOUT_MS: u64 = 2000;

// Entity tags double as environment variable suffixes (`PIIGUARD_ENTITY_<TAG>`).
static ENTITY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("entity tag regex is valid"));

/// True if `tag` is an upper-snake-case entity type such as `IN_PAN`.
pub fn is_valid_entity_tag(tag: &str) -> bool {
    ENTITY_TAG.is_match(tag)
}

/// How a recognizer produces detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerKindConfig {
    #[default]
    Pattern,
    External,
}

/// A single regex pattern belonging to a pattern recognizer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatternConfig {
    pub name: String,
    pub regex: String,
    /// Base confidence for every match of this pattern.
    pub score: f64,
    #[serde(default)]
    pub case_insensitive: bool,
    /// Optional checksum every match must pass.
    #[serde(default)]
    pub validator: Option<Validator>,
}

/// Connection settings for an out-of-process entity model.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// URL the model accepts `POST {"text", "language"}` on.
    pub endpoint: String,
    /// Model label -> entity type. Labels not listed are dropped.
    pub labels: BTreeMap<String, String>,
    /// Optional bearer token sent to the model server.
    pub api_key: Option<String>,
}

/// Represents a single recognizer definition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Unique identifier for the recognizer (e.g., "in_pan_recognizer").
    pub name: String,
    /// Human-readable description of what the recognizer targets.
    pub description: Option<String>,
    pub kind: RecognizerKindConfig,
    /// Entity type emitted by a pattern recognizer.
    pub entity_type: Option<String>,
    pub language: String,
    pub patterns: Vec<PatternConfig>,
    /// Words whose presence near a match raises its confidence.
    pub context: Vec<String>,
    /// Required for `kind: external`.
    pub model: Option<ModelConfig>,
    /// Explicit override for enabling/disabling the recognizer.
    pub enabled: Option<bool>,
    /// If true, the recognizer is disabled unless explicitly enabled.
    pub opt_in: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            kind: RecognizerKindConfig::Pattern,
            entity_type: None,
            language: DEFAULT_LANGUAGE.to_string(),
            patterns: Vec::new(),
            context: Vec::new(),
            model: None,
            enabled: None,
            opt_in: false,
        }
    }
}

impl RecognizerConfig {
    /// Entity types this recognizer may emit.
    pub fn supported_entities(&self) -> Vec<String> {
        match self.kind {
            RecognizerKindConfig::Pattern => self.entity_type.iter().cloned().collect(),
            RecognizerKindConfig::External => {
                let mut entities: Vec<String> = self
                    .model
                    .iter()
                    .flat_map(|m| m.labels.values().cloned())
                    .collect();
                entities.sort();
                entities.dedup();
                entities
            }
        }
    }
}

/// Settings for context-based score boosting.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ContextConfig {
    /// Words inspected on each side of a match (default: 5).
    pub window_words: Option<usize>,
    /// Score added when a context word is present (default: 0.35).
    pub boost: Option<f64>,
}

/// Settings for overlap resolution.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConflictConfig {
    pub policy: Option<ConflictPolicy>,
}

/// Settings for external (model-backed) recognizers.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExternalConfig {
    /// Per-request bound on each external recognizer (default: 2000 ms).
    pub timeout_ms: Option<u64>,
}

/// Container for all engine-specific configurations.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub context: ContextConfig,
    pub conflict: ConflictConfig,
    pub external: ExternalConfig,
}

impl EngineConfig {
    pub fn boost_weights(&self) -> BoostWeights {
        let defaults = BoostWeights::default();
        BoostWeights {
            window_words: self.context.window_words.unwrap_or(defaults.window_words),
            boost: self.context.boost.unwrap_or(defaults.boost),
        }
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict.policy.unwrap_or_default()
    }

    pub fn external_timeout(&self) -> Duration {
        Duration::from_millis(self.external.timeout_ms.unwrap_or(DEFAULT_EXTERNAL_TIMEOUT_MS))
    }
}

/// Represents the top-level configuration structure for piiguard.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct PiiGuardConfig {
    pub recognizers: Vec<RecognizerConfig>,
    /// Entity types analyzed when a request names none.
    #[serde(default)]
    pub default_entities: Option<Vec<String>>,
    #[serde(default)]
    pub engines: EngineConfig,
}

impl PiiGuardConfig {
    /// Loads recognizers from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading recognizers from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PiiGuardConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        info!("Loaded {} recognizers from file {}.", config.recognizers.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in recognizers from the embedded configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default recognizers from embedded string...");
        let default_yaml = include_str!("../config/default_recognizers.yaml");
        let config: PiiGuardConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default recognizers")?;

        debug!("Loaded {} default recognizers.", config.recognizers.len());
        Ok(config)
    }

    /// Filters active recognizers based on enable/disable lists.
    pub fn set_active_recognizers(&mut self, enable: &[String], disable: &[String]) {
        let enable_set: HashSet<&str> = enable.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable.iter().map(String::as_str).collect();

        debug!("Initial recognizer count before filtering: {}", self.recognizers.len());

        let all_names: HashSet<&str> = self.recognizers.iter().map(|r| r.name.as_str()).collect();

        for name in enable_set.difference(&all_names) {
            warn!("Recognizer '{}' in `enable` list does not exist.", name);
        }

        for name in disable_set.difference(&all_names) {
            warn!("Recognizer '{}' in `disable` list does not exist.", name);
        }

        self.recognizers.retain(|r| {
            let name = r.name.as_str();
            if disable_set.contains(name) || r.enabled == Some(false) {
                return false;
            }
            !r.opt_in || enable_set.contains(name) || r.enabled == Some(true)
        });

        debug!("Final active recognizer count after filtering: {}", self.recognizers.len());
    }

    /// Languages named by at least one recognizer.
    pub fn languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self.recognizers.iter().map(|r| r.language.clone()).collect();
        langs.sort();
        langs.dedup();
        langs
    }
}

/// Merges user-defined recognizers and engine settings with defaults.
///
/// User recognizers replace defaults of the same name; engine settings are
/// overridden field by field; user `default_entities` replace the defaults.
pub fn merge_config(default_config: PiiGuardConfig, user_config: Option<PiiGuardConfig>) -> PiiGuardConfig {
    debug!("merge_config called. Initial default recognizers: {}", default_config.recognizers.len());

    // Keep the declaration order of the defaults; appended user recognizers follow.
    let mut order: Vec<String> = default_config.recognizers.iter().map(|r| r.name.clone()).collect();
    let mut by_name: HashMap<String, RecognizerConfig> = default_config
        .recognizers
        .into_iter()
        .map(|r| (r.name.clone(), r))
        .collect();

    let mut engines = default_config.engines;
    let mut default_entities = default_config.default_entities;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user recognizers.", user_cfg.recognizers.len());
        for user_rec in user_cfg.recognizers {
            if !by_name.contains_key(&user_rec.name) {
                order.push(user_rec.name.clone());
            }
            by_name.insert(user_rec.name.clone(), user_rec);
        }

        if let Some(window) = user_cfg.engines.context.window_words {
            debug!("Overriding context window with user value: {}", window);
            engines.context.window_words = Some(window);
        }
        if let Some(boost) = user_cfg.engines.context.boost {
            debug!("Overriding context boost with user value: {}", boost);
            engines.context.boost = Some(boost);
        }
        if let Some(policy) = user_cfg.engines.conflict.policy {
            debug!("Overriding conflict policy with user value: {:?}", policy);
            engines.conflict.policy = Some(policy);
        }
        if let Some(timeout) = user_cfg.engines.external.timeout_ms {
            debug!("Overriding external timeout with user value: {} ms", timeout);
            engines.external.timeout_ms = Some(timeout);
        }
        if user_cfg.default_entities.is_some() {
            default_entities = user_cfg.default_entities;
        }
    }

    let recognizers: Vec<RecognizerConfig> = order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect();
    debug!("Final total recognizers after merge: {}", recognizers.len());

    PiiGuardConfig {
        recognizers,
        default_entities,
        engines,
    }
}

/// Places a user config file is looked up in, most specific first.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let candidates = vec![
        dirs::home_dir().map(|p| p.join(".piiguard").join("config.yaml")),
        dirs::config_dir().map(|p| p.join("piiguard").join("config.yaml")),
        Some(PathBuf::from("/etc/piiguard/config.yaml")),
        Some(PathBuf::from("./config/piiguard.yaml")),
    ];
    candidates.into_iter().flatten().collect()
}

/// Returns the first existing candidate config file, if any.
pub fn find_user_config() -> Option<PathBuf> {
    config_candidate_paths().into_iter().find(|p| p.is_file())
}

/// Validates recognizer integrity (names, regex compilation, score ranges, models).
pub fn validate_config(config: &PiiGuardConfig) -> Result<()> {
    let mut names = HashSet::new();
    let mut errors = Vec::new();

    for rec in &config.recognizers {
        if rec.name.is_empty() {
            errors.push("A recognizer has an empty `name` field.".to_string());
        } else if !names.insert(rec.name.clone()) {
            errors.push(format!("Duplicate recognizer name found: '{}'.", rec.name));
        }

        if rec.language.trim().is_empty() {
            errors.push(format!("Recognizer '{}' has an empty `language` field.", rec.name));
        }

        match rec.kind {
            RecognizerKindConfig::Pattern => {
                match rec.entity_type.as_deref() {
                    None | Some("") => {
                        errors.push(format!("Recognizer '{}' is missing the `entity_type` field.", rec.name))
                    }
                    Some(tag) if !is_valid_entity_tag(tag) => errors.push(format!(
                        "Recognizer '{}': entity type '{}' must be upper snake case.",
                        rec.name, tag
                    )),
                    Some(_) => {}
                }
                if rec.patterns.is_empty() {
                    errors.push(format!("Recognizer '{}' has no patterns.", rec.name));
                }
                for pattern in &rec.patterns {
                    validate_pattern(&rec.name, pattern, &mut errors);
                }
            }
            RecognizerKindConfig::External => match &rec.model {
                None => errors.push(format!("Recognizer '{}' is missing the `model` section.", rec.name)),
                Some(model) => {
                    if model.endpoint.trim().is_empty() {
                        errors.push(format!("Recognizer '{}' has an empty model `endpoint`.", rec.name));
                    }
                    if model.labels.is_empty() {
                        errors.push(format!("Recognizer '{}' maps no model labels to entity types.", rec.name));
                    }
                    for tag in model.labels.values().filter(|t| !is_valid_entity_tag(t)) {
                        errors.push(format!(
                            "Recognizer '{}': entity type '{}' must be upper snake case.",
                            rec.name, tag
                        ));
                    }
                }
            },
        }
    }

    for tag in config.default_entities.iter().flatten() {
        if !is_valid_entity_tag(tag) {
            errors.push(format!("Default entity '{}' must be upper snake case.", tag));
        }
    }

    if let Some(boost) = config.engines.context.boost {
        if !is_valid_score(boost) {
            errors.push(format!("Context boost {} is outside [0.0, 1.0].", boost));
        }
    }

    if !errors.is_empty() {
        let full_error_message = format!("Recognizer validation failed:\n{}", errors.join("\n"));
        Err(anyhow!(full_error_message))
    } else {
        Ok(())
    }
}

fn validate_pattern(recognizer: &str, pattern: &PatternConfig, errors: &mut Vec<String>) {
    if pattern.name.is_empty() {
        errors.push(format!("Recognizer '{}' has a pattern with an empty `name`.", recognizer));
    }
    if pattern.regex.is_empty() {
        errors.push(format!("Recognizer '{}': pattern '{}' has an empty `regex`.", recognizer, pattern.name));
        return;
    }
    if pattern.regex.len() > MAX_PATTERN_LENGTH {
        errors.push(format!(
            "Recognizer '{}': pattern '{}' is {} bytes long (max {}).",
            recognizer, pattern.name, pattern.regex.len(), MAX_PATTERN_LENGTH
        ));
        return;
    }
    if let Err(e) = Regex::new(&pattern.regex) {
        errors.push(format!(
            "Recognizer '{}': pattern '{}' has an invalid regex: {}",
            recognizer, pattern.name, e
        ));
    }
    if !is_valid_score(pattern.score) {
        errors.push(format!(
            "Recognizer '{}': pattern '{}' score {} is outside [0.0, 1.0].",
            recognizer, pattern.name, pattern.score
        ));
    }
}
