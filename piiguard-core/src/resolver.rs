// piiguard-core/src/resolver.rs
//! Cross-recognizer span conflict resolution.
//!
//! Recognizers are independent and may fire on the same characters (a generic
//! card pattern and a national-ID pattern, say). The resolver reduces their
//! union to one label per character range: the highest-ranked detection wins
//! and losers are removed outright, never trimmed.
//!
//! Ranking, strongest first: higher score, longer span, earlier start, then
//! entity type and recognizer name so the order is total and the output does
//! not depend on the order recognizers finished in.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::detection::{sort_detections, Detection, EntityType};

/// Which overlaps the resolver removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Any two overlapping detections conflict, whatever their entity types.
    #[default]
    HighestScore,
    /// Only detections of the same entity type conflict; different types may overlap.
    SameTypeOnly,
}

/// Compares two detections by conflict rank. `Greater` means `a` wins.
pub fn rank(a: &Detection, b: &Detection) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.len().cmp(&b.len()))
        .then_with(|| b.start.cmp(&a.start))
        .then_with(|| b.entity_type.cmp(&a.entity_type))
        .then_with(|| b.recognizer.cmp(&a.recognizer))
}

/// True if `a` beats `b` in a conflict.
pub fn outranks(a: &Detection, b: &Detection) -> bool {
    rank(a, b) == Ordering::Greater
}

/// Greedy selection in rank order: a detection is kept only if it overlaps
/// nothing already kept. Every dropped detection overlaps a kept one that
/// outranks it.
fn select(mut candidates: Vec<Detection>) -> Vec<Detection> {
    candidates.sort_by(|a, b| rank(b, a));
    // Keyed by start; kept spans never overlap, so their ends ascend with their starts.
    let mut kept: BTreeMap<usize, Detection> = BTreeMap::new();

    for candidate in candidates {
        let blocker = kept
            .range(..candidate.end)
            .next_back()
            .map(|(_, k)| k)
            .filter(|k| k.end > candidate.start);

        match blocker {
            Some(winner) => debug!(
                "Conflict: dropping '{}' {}..{} ({:.2}) in favour of '{}' {}..{} ({:.2})",
                candidate.entity_type, candidate.start, candidate.end, candidate.score,
                winner.entity_type, winner.start, winner.end, winner.score
            ),
            None => {
                kept.insert(candidate.start, candidate);
            }
        }
    }

    kept.into_values().collect()
}

/// Merges the detections of all recognizers for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConflictResolver {
    policy: ConflictPolicy,
}

impl ConflictResolver {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(engines: &EngineConfig) -> Self {
        Self::new(engines.conflict_policy())
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Returns the surviving detections ordered by start, ties by descending score.
    pub fn resolve(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let mut resolved = match self.policy {
            ConflictPolicy::HighestScore => select(detections),
            ConflictPolicy::SameTypeOnly => {
                let mut by_type: BTreeMap<EntityType, Vec<Detection>> = BTreeMap::new();
                for d in detections {
                    by_type.entry(d.entity_type.clone()).or_default().push(d);
                }
                by_type.into_values().flat_map(select).collect()
            }
        };
        sort_detections(&mut resolved);
        resolved
    }
}
