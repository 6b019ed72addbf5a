// piiguard-context/src/scoring/mod.rs

use crate::ConfidenceScore;

/// Upper bound for every confidence score.
pub const MAX_SCORE: ConfidenceScore = 1.0;

/// Parameters for context-based confidence boosting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostWeights {
    /// Words inspected on each side of a match.
    pub window_words: usize,
    /// Amount added to the score when a context word is present.
    pub boost: ConfidenceScore,
}

impl Default for BoostWeights {
    fn default() -> Self {
        Self {
            window_words: 5,
            boost: 0.35,
        }
    }
}

/// Clamps a score into `[0.0, MAX_SCORE]`. NaN collapses to 0.0.
pub fn clamp_score(score: ConfidenceScore) -> ConfidenceScore {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_SCORE)
}

/// Applies a single boost to `score`, never exceeding `MAX_SCORE`.
pub fn boosted_score(score: ConfidenceScore, weights: &BoostWeights) -> ConfidenceScore {
    clamp_score(score + weights.boost)
}

/// Returns true if `score` is a usable confidence value.
pub fn is_valid_score(score: ConfidenceScore) -> bool {
    (0.0..=MAX_SCORE).contains(&score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_is_clamped() {
        let weights = BoostWeights::default();
        assert_eq!(boosted_score(0.80, &weights), 1.0);
        let delta = boosted_score(0.4, &weights) - 0.75;
        assert!(delta < 1e-9 && delta > -1e-9);
    }

    #[test]
    fn test_clamp_handles_nan_and_negatives() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(-0.2), 0.0);
        assert_eq!(clamp_score(3.0), 1.0);
    }

    #[test]
    fn test_valid_score_range() {
        assert!(is_valid_score(0.0));
        assert!(is_valid_score(1.0));
        assert!(!is_valid_score(1.01));
        assert!(!is_valid_score(f64::NAN));
    }
}
