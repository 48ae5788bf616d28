use trolley_match::{LearnedMappingStore, MatchConfig, MatchEngine};
use trolley_model::{CandidateItem, ConfidenceTier, RawItemMention, SourceKind};

fn pantry_candidates() -> Vec<CandidateItem> {
    vec![
        CandidateItem::new("p1", SourceKind::PantryItem, "Semi Skimmed Milk")
            .with_category("dairy")
            .with_price(1.30),
        CandidateItem::new("p2", SourceKind::PantryItem, "Wholemeal Bread")
            .with_category("bakery")
            .with_price(1.10),
        CandidateItem::new("p3", SourceKind::PantryItem, "Cheddar Cheese")
            .with_category("dairy")
            .with_price(2.50),
    ]
}

#[test]
fn receipt_line_matches_pantry_item() {
    let engine = MatchEngine::default();
    let mention = RawItemMention::new("TESCO SEMI SKIMMED MILK 2PT", 1.0)
        .with_price(1.25)
        .with_category("dairy");

    let result = engine.match_mention(&mention, &pantry_candidates(), None, None);

    let best = result.best_match.expect("should match the milk");
    assert_eq!(best.id, "p1");
    assert_eq!(result.confidence_tier, ConfidenceTier::High);
    assert!(result.reasons.contains("token-overlap"));
    assert!(result.reasons.contains("category-match"));
}

#[test]
fn unrelated_mention_is_low_or_none() {
    let engine = MatchEngine::default();
    let mention = RawItemMention::new("Dishwasher Tablets", 1.0);

    let result = engine.match_mention(&mention, &pantry_candidates(), None, None);
    assert!(
        matches!(
            result.confidence_tier,
            ConfidenceTier::Low | ConfidenceTier::None
        ),
        "got {:?} at score {}",
        result.confidence_tier,
        result.score
    );
}

#[test]
fn learned_mapping_lifts_a_cryptic_receipt_code() {
    let engine = MatchEngine::default();
    let mut store = LearnedMappingStore::new();
    for user in ["u1", "u2", "u3"] {
        store.learn(
            "tesco",
            "CHDR CHSE 400G",
            "Cheddar Cheese",
            Some("dairy"),
            Some(2.50),
            user,
        );
    }

    let mention = RawItemMention::new("CHDR CHSE 400G", 1.0).with_price(2.45);

    let without = engine.match_mention(&mention, &pantry_candidates(), None, None);
    let with = engine.match_mention(&mention, &pantry_candidates(), Some("tesco"), Some(&store));

    assert!(with.score > without.score);
    assert!(with.reasons.contains("learned-mapping"));
    assert_eq!(with.best_match.expect("match").id, "p3");
}

#[test]
fn custom_thresholds_change_tiering_without_code_changes() {
    let strict = MatchConfig {
        high_confidence_threshold: 95.0,
        ..MatchConfig::default()
    };
    strict.validate().expect("valid config");

    let engine = MatchEngine::new(strict);
    let mention = RawItemMention::new("Semi Skimmed Milk", 1.0).with_category("dairy");

    let default_result =
        MatchEngine::default().match_mention(&mention, &pantry_candidates(), None, None);
    assert_eq!(default_result.confidence_tier, ConfidenceTier::High);

    // The same evidence that defaults rate High now needs confirmation.
    let result = engine.match_mention(&mention, &pantry_candidates(), None, None);
    assert_eq!(result.confidence_tier, ConfidenceTier::Medium);
}

#[test]
fn all_candidates_are_reported_in_rank_order() {
    let engine = MatchEngine::default();
    let mention = RawItemMention::new("milk", 1.0);
    let result = engine.match_mention(&mention, &pantry_candidates(), None, None);

    assert_eq!(result.all_candidates.len(), 3);
    for pair in result.all_candidates.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}
