//! Shared data types for the trolley engine: item mentions and candidates,
//! match results, learned mappings, price records, and dedup outcomes.

#![deny(unsafe_code)]

pub mod dedup;
pub mod item;
pub mod learned;
pub mod matching;
pub mod price;

pub use dedup::{DeduplicationResult, DuplicateGroup, MergedItem, SourceList};
pub use item::{CandidateItem, RawItemMention, SourceKind};
pub use learned::LearnedMapping;
pub use matching::{ConfidenceTier, MatchResult, ScoredCandidate};
pub use price::{ItemVariant, PersonalPriceEntry, PriceRecord, PriceSource, ResolvedPrice};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_result_serializes() {
        let result = MatchResult {
            mention: RawItemMention::new("Milk", 1.0),
            best_match: None,
            score: 0.0,
            reasons: Default::default(),
            all_candidates: vec![],
            confidence_tier: ConfidenceTier::None,
        };
        let json = serde_json::to_string(&result).expect("serialize match result");
        let round: MatchResult = serde_json::from_str(&json).expect("deserialize match result");
        assert_eq!(round.confidence_tier, ConfidenceTier::None);
        assert!(round.best_match.is_none());
    }

    #[test]
    fn resolved_price_none_round_trips() {
        let resolved = ResolvedPrice::none();
        let json = serde_json::to_string(&resolved).expect("serialize resolved price");
        let round: ResolvedPrice = serde_json::from_str(&json).expect("deserialize resolved price");
        assert_eq!(round.price, None);
        assert_eq!(round.source, PriceSource::None);
        assert_eq!(round.confidence, 0.0);
    }
}
