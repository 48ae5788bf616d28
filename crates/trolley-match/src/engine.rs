//! Multi-signal matcher.
//!
//! Scores a noisy mention against a candidate pool using a weighted blend of
//! token overlap, category equivalence, price proximity, learned mappings,
//! and fuzzy name similarity. Scores are additive only: a corroborating
//! signal never lowers a candidate's score, so adding evidence is monotone
//! non-decreasing, with the explicit duplicate-name bonus capped at 100.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::{debug, trace};

use trolley_model::{CandidateItem, ConfidenceTier, MatchResult, RawItemMention, ScoredCandidate};
use trolley_normalize::normalize_name;

use crate::config::MatchConfig;
use crate::duplicate::is_duplicate_item_name;
use crate::learned::{LearnedMappingStore, LearnedMatch};
use crate::similarity::{category_match, levenshtein_similarity, price_proximity, token_overlap};

/// Engine for matching mentions against candidate pools.
///
/// Holds only configuration; every call reads its inputs and returns a fresh
/// result, so one engine is safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Matches one mention against a candidate pool.
    ///
    /// Candidates in the result are ordered by descending score; the top
    /// candidate's score sets the confidence tier. An empty pool yields
    /// `best_match: None` with tier [`ConfidenceTier::None`]. Only `High`
    /// results should be auto-applied; `Medium` and `Low` must go to a human
    /// confirmation step (a policy the caller enforces, not this engine).
    pub fn match_mention(
        &self,
        mention: &RawItemMention,
        candidates: &[CandidateItem],
        store_id: Option<&str>,
        learned: Option<&LearnedMappingStore>,
    ) -> MatchResult {
        // One learned lookup per mention, shared across candidates.
        let learned_hit = match (store_id, learned) {
            (Some(store), Some(mappings)) => mappings.lookup(store, &mention.name),
            _ => None,
        };

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| self.score_candidate(mention, candidate, learned_hit.as_ref()))
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let (best_match, score, reasons) = match scored.first() {
            Some(top) if top.score > 0.0 => (
                Some(top.candidate.clone()),
                top.score,
                top.reasons.clone(),
            ),
            _ => (None, 0.0, BTreeSet::new()),
        };

        let confidence_tier = self.config.tier_for(score);
        debug!(
            mention = %mention.name,
            candidates = candidates.len(),
            score,
            tier = %confidence_tier,
            "matched mention"
        );

        MatchResult {
            mention: mention.clone(),
            best_match,
            score,
            reasons,
            all_candidates: scored,
            confidence_tier,
        }
    }

    fn score_candidate(
        &self,
        mention: &RawItemMention,
        candidate: &CandidateItem,
        learned_hit: Option<&LearnedMatch>,
    ) -> ScoredCandidate {
        let weights = &self.config.weights;
        let mut score = 0.0;
        let mut reasons = BTreeSet::new();

        // Reason thresholds gate explanation only; sub-threshold signals
        // still contribute their partial weighted score.
        let overlap = token_overlap(&mention.name, &candidate.name);
        score += overlap / 100.0 * weights.token_overlap;
        if overlap >= self.config.token_reason_threshold {
            reasons.insert("token-overlap".to_string());
        }

        let category = category_match(mention.category.as_deref(), candidate.category.as_deref());
        score += category / 100.0 * weights.category;
        if category >= 100.0 {
            reasons.insert("category-match".to_string());
        }

        let proximity = price_proximity(
            mention.unit_price,
            candidate.estimated_price,
            self.config.price_diff_threshold_pct,
        );
        score += proximity / 100.0 * weights.price;
        if proximity >= self.config.price_reason_threshold {
            reasons.insert("price-proximity".to_string());
        }

        if let Some(hit) = learned_hit
            && is_duplicate_item_name(&hit.canonical_name, &candidate.name)
        {
            score += hit.confidence / 100.0 * weights.learned;
            reasons.insert("learned-mapping".to_string());
        }

        let fuzzy = levenshtein_similarity(
            &normalize_name(&mention.name),
            &normalize_name(&candidate.name),
        );
        score += fuzzy / 100.0 * weights.fuzzy;
        if fuzzy >= self.config.fuzzy_reason_threshold {
            reasons.insert("fuzzy-name".to_string());
        }

        // Reward the case where the deterministic rule agrees with whatever
        // the weighted signals found.
        if is_duplicate_item_name(&mention.name, &candidate.name) {
            score += self.config.duplicate_name_bonus;
            reasons.insert("duplicate-name".to_string());
        }

        let score = score.clamp(0.0, 100.0);
        trace!(
            mention = %mention.name,
            candidate = %candidate.name,
            score,
            ?reasons,
            "scored candidate"
        );

        ScoredCandidate {
            candidate: candidate.clone(),
            score,
            reasons,
        }
    }
}
