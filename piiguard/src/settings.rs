// piiguard/src/settings.rs
//! Startup configuration for the piiguard binary.
//!
//! Loads the built-in recognizers, merges the user's YAML file over them,
//! applies the enable/disable lists and resolves the default entity allow-list,
//! which each entity type can toggle through `PIIGUARD_ENTITY_<TYPE>`.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use piiguard_core::config::{self, is_valid_entity_tag, PiiGuardConfig};

use crate::cli::ConfigArgs;

/// Prefix of the environment variables that toggle default entity types.
pub const ENTITY_TOGGLE_PREFIX: &str = "PIIGUARD_ENTITY_";

/// Allow-list used when the configuration names no `default_entities`.
pub const BUILTIN_DEFAULT_ENTITIES: [&str; 6] = [
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "URL",
    "CREDIT_CARD",
    "IN_PAN",
    "IN_AADHAAR",
];

/// Loads the effective configuration: defaults, then the user file (explicit
/// path or the first candidate location found), then enable/disable lists.
pub fn load_config(args: &ConfigArgs) -> Result<PiiGuardConfig> {
    let defaults = PiiGuardConfig::load_default()?;

    let user_path = args.config.clone().or_else(config::find_user_config);
    let user = match user_path.as_deref() {
        Some(path) => Some(load_user_config(path)?),
        None => {
            debug!("No user configuration found; using built-in recognizers only.");
            None
        }
    };

    let mut merged = config::merge_config(defaults, user);
    merged.set_active_recognizers(&args.enable, &args.disable);
    config::validate_config(&merged).context("Merged configuration is invalid")?;
    info!("{} recognizers active.", merged.recognizers.len());
    Ok(merged)
}

fn load_user_config(path: &Path) -> Result<PiiGuardConfig> {
    PiiGuardConfig::load_from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Parses a toggle value. Unknown values yield `None`.
pub fn parse_toggle(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Applies `PIIGUARD_ENTITY_<TYPE>` toggles found in `vars` to `defaults`.
///
/// A disabled type is removed; an enabled type missing from the list is
/// appended. Order of the remaining defaults is preserved.
pub fn apply_entity_toggles<I, K, V>(defaults: Vec<String>, vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut toggles: BTreeMap<String, bool> = BTreeMap::new();
    for (key, value) in vars {
        let Some(tag) = key.as_ref().strip_prefix(ENTITY_TOGGLE_PREFIX) else {
            continue;
        };
        if !is_valid_entity_tag(tag) {
            warn!("Ignoring {}{}: not an entity type.", ENTITY_TOGGLE_PREFIX, tag);
            continue;
        }
        match parse_toggle(value.as_ref()) {
            Some(on) => {
                toggles.insert(tag.to_string(), on);
            }
            None => warn!(
                "Ignoring {}{}={:?}: expected true/false.",
                ENTITY_TOGGLE_PREFIX,
                tag,
                value.as_ref()
            ),
        }
    }

    let mut entities: Vec<String> = defaults
        .into_iter()
        .filter(|tag| toggles.get(tag) != Some(&false))
        .collect();
    for (tag, on) in toggles {
        if on && !entities.contains(&tag) {
            entities.push(tag);
        }
    }
    debug!("Default entities after toggles: {:?}", entities);
    entities
}

/// The default entity allow-list for `config`, with toggles from `vars` applied.
pub fn default_entities<I, K, V>(config: &PiiGuardConfig, vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let base = config
        .default_entities
        .clone()
        .unwrap_or_else(|| BUILTIN_DEFAULT_ENTITIES.iter().map(|s| s.to_string()).collect());
    apply_entity_toggles(base, vars)
}
