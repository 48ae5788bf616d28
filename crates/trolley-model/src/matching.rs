//! Match results produced by the multi-signal matcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::item::{CandidateItem, RawItemMention};

/// Coarse bucket translating a numeric match score into an action policy.
///
/// Only `High` results are safe to auto-apply; `Medium` and `Low` are a
/// deliberate "ask the user" signal and must reach a human confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// No candidate scored above zero (or no candidates at all).
    None,
    /// Weak evidence; needs manual verification.
    Low,
    /// Plausible match; should be reviewed.
    Medium,
    /// Near-certain match; safe to auto-apply.
    High,
}

impl ConfidenceTier {
    pub fn description(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high confidence - safe to auto-apply",
            ConfidenceTier::Medium => "medium confidence - ask user to confirm",
            ConfidenceTier::Low => "low confidence - needs verification",
            ConfidenceTier::None => "no match",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
            ConfidenceTier::None => "none",
        };
        write!(f, "{label}")
    }
}

/// One candidate's score and the signals that fired for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: CandidateItem,
    /// Weighted score, 0 to 100.
    pub score: f64,
    /// Signals that cleared their reporting threshold, for explainability.
    pub reasons: BTreeSet<String>,
}

/// Result of matching one mention against a candidate pool.
///
/// Created per match call and never persisted by the engine; the caller
/// decides what to do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The mention that was matched.
    pub mention: RawItemMention,
    /// Top-ranked candidate, if any scored above zero.
    pub best_match: Option<CandidateItem>,
    /// Score of the top candidate, 0 to 100.
    pub score: f64,
    /// Reasons reported for the top candidate.
    pub reasons: BTreeSet<String>,
    /// All candidates ordered by descending score.
    pub all_candidates: Vec<ScoredCandidate>,
    /// Action-policy bucket derived from the top score.
    pub confidence_tier: ConfidenceTier,
}

impl MatchResult {
    /// True when the caller may apply this match without confirmation.
    pub fn is_auto_match(&self) -> bool {
        self.confidence_tier == ConfidenceTier::High && self.best_match.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_supports_policy_checks() {
        assert!(ConfidenceTier::High > ConfidenceTier::Medium);
        assert!(ConfidenceTier::Medium > ConfidenceTier::Low);
        assert!(ConfidenceTier::Low > ConfidenceTier::None);
    }

    #[test]
    fn no_best_match_is_never_auto() {
        let result = MatchResult {
            mention: RawItemMention::new("bread", 1.0),
            best_match: None,
            score: 0.0,
            reasons: BTreeSet::new(),
            all_candidates: vec![],
            confidence_tier: ConfidenceTier::None,
        };
        assert!(!result.is_auto_match());
    }
}
