//! Crowd-confirmed raw-pattern to canonical-name associations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A store-specific, crowd-confirmed association between a raw receipt text
/// pattern and its canonical product identity.
///
/// Durable and append/patch-only: `confirmation_count` only ever increases
/// and mappings are never deleted by the engine (lifecycle belongs to the
/// owning store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedMapping {
    /// Retailer this pattern was observed at.
    pub store_id: String,
    /// Normalized raw pattern as it appears on receipts from this store.
    pub raw_pattern: String,
    /// Token set of the pattern, for fuzzy lookup.
    pub pattern_tokens: BTreeSet<String>,
    /// Canonical product name the pattern maps to.
    pub canonical_name: String,
    /// Canonical category, when confirmed.
    pub canonical_category: Option<String>,
    /// How many users have confirmed this mapping. Monotone.
    pub confirmation_count: u32,
    /// Observed price range `[min, max]` across confirmations.
    pub price_range_seen: Option<(f64, f64)>,
}

impl LearnedMapping {
    /// Widens the observed price range to include `price`.
    pub fn observe_price(&mut self, price: f64) {
        self.price_range_seen = Some(match self.price_range_seen {
            Some((min, max)) => (min.min(price), max.max(price)),
            None => (price, price),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_price_widens_range() {
        let mut mapping = LearnedMapping {
            store_id: "tesco".into(),
            raw_pattern: "smtg milk 2pt".into(),
            pattern_tokens: BTreeSet::new(),
            canonical_name: "milk".into(),
            canonical_category: Some("dairy".into()),
            confirmation_count: 1,
            price_range_seen: None,
        };
        mapping.observe_price(1.30);
        mapping.observe_price(1.10);
        mapping.observe_price(1.45);
        assert_eq!(mapping.price_range_seen, Some((1.10, 1.45)));
    }
}
