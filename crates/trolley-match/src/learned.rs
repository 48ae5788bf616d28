//! Learned mapping store: crowd-confirmed (store, raw-pattern) to
//! canonical-name associations with a growing confidence score.
//!
//! The store is a plain in-memory value; durable persistence belongs to the
//! caller (see [`crate::repository`]). Confirmation counts only ever grow,
//! and mappings are never deleted here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use trolley_model::LearnedMapping;
use trolley_normalize::normalize_name;

use crate::similarity::token_set;

/// At most this many mappings per store are scanned during fuzzy lookup,
/// keeping lookups boundable on synchronous request paths.
pub const FUZZY_SCAN_CAP: usize = 100;

/// Minimum token-overlap ratio for a fuzzy lookup hit.
const FUZZY_MIN_OVERLAP_RATIO: f64 = 0.6;

/// A lookup hit: the canonical identity a raw pattern maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnedMatch {
    pub canonical_name: String,
    pub canonical_category: Option<String>,
    /// 0 to 100. Exact pattern hits cap at 100; fuzzy hits cap at 70.
    pub confidence: f64,
}

/// In-memory collection of learned mappings, grouped by store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnedMappingStore {
    mappings: BTreeMap<String, Vec<LearnedMapping>>,
}

fn store_key(store_id: &str) -> String {
    store_id.trim().to_lowercase()
}

impl LearnedMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total mapping count across all stores.
    pub fn len(&self) -> usize {
        self.mappings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.values().all(Vec::is_empty)
    }

    /// Store ids that have at least one mapping.
    pub fn store_ids(&self) -> impl Iterator<Item = &str> {
        self.mappings
            .iter()
            .filter(|(_, mappings)| !mappings.is_empty())
            .map(|(id, _)| id.as_str())
    }

    /// Mappings recorded for one store.
    pub fn mappings_for(&self, store_id: &str) -> &[LearnedMapping] {
        self.mappings
            .get(&store_key(store_id))
            .map_or(&[], Vec::as_slice)
    }

    /// Replaces the mappings for one store, e.g. when loading from disk.
    pub fn replace_store(&mut self, store_id: &str, mappings: Vec<LearnedMapping>) {
        self.mappings.insert(store_key(store_id), mappings);
    }

    /// Resolves a raw receipt name to its learned canonical identity.
    ///
    /// Tries an exact match on the normalized pattern first (confidence
    /// `min(50 + 10·confirmations, 100)`), then a token-overlap scan over at
    /// most [`FUZZY_SCAN_CAP`] mappings for the store, accepting the best
    /// candidate with overlap ratio ≥ 0.6 at a reduced confidence ceiling
    /// (`min(30 + 8·confirmations, 70) · ratio`). Returns `None` when the
    /// store has nothing useful, never an error.
    pub fn lookup(&self, store_id: &str, raw_name: &str) -> Option<LearnedMatch> {
        let mappings = self.mappings.get(&store_key(store_id))?;
        let pattern = normalize_name(raw_name);

        if let Some(mapping) = mappings
            .iter()
            .find(|m| m.raw_pattern == pattern && m.confirmation_count >= 1)
        {
            let confidence = f64::from((50 + mapping.confirmation_count * 10).min(100));
            trace!(store = store_id, pattern, confidence, "exact learned-mapping hit");
            return Some(LearnedMatch {
                canonical_name: mapping.canonical_name.clone(),
                canonical_category: mapping.canonical_category.clone(),
                confidence,
            });
        }

        let tokens = token_set(raw_name);
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &LearnedMapping)> = None;
        for mapping in mappings.iter().take(FUZZY_SCAN_CAP) {
            if mapping.pattern_tokens.is_empty() || mapping.confirmation_count == 0 {
                continue;
            }
            let overlap = tokens.intersection(&mapping.pattern_tokens).count() as f64;
            let min_count = tokens.len().min(mapping.pattern_tokens.len()) as f64;
            let ratio = overlap / min_count;
            if ratio >= FUZZY_MIN_OVERLAP_RATIO
                && best.is_none_or(|(best_ratio, _)| ratio > best_ratio)
            {
                best = Some((ratio, mapping));
            }
        }

        best.map(|(ratio, mapping)| {
            let ceiling = f64::from((30 + mapping.confirmation_count * 8).min(70));
            let confidence = ceiling * ratio;
            trace!(store = store_id, ratio, confidence, "fuzzy learned-mapping hit");
            LearnedMatch {
                canonical_name: mapping.canonical_name.clone(),
                canonical_category: mapping.canonical_category.clone(),
                confidence,
            }
        })
    }

    /// Records a user confirmation of what a raw receipt pattern means.
    ///
    /// Upsert keyed by (store, normalized pattern): increments the
    /// confirmation count, widens the observed price range, and overwrites
    /// the canonical name (and category when supplied) with this most recent
    /// confirmation. Last-confirmer-wins is an accepted simplification.
    pub fn learn(
        &mut self,
        store_id: &str,
        raw_name: &str,
        canonical_name: &str,
        category: Option<&str>,
        price: Option<f64>,
        confirmed_by: &str,
    ) {
        let key = store_key(store_id);
        let pattern = normalize_name(raw_name);
        let entry = self.mappings.entry(key).or_default();

        if let Some(mapping) = entry.iter_mut().find(|m| m.raw_pattern == pattern) {
            mapping.confirmation_count += 1;
            mapping.canonical_name = canonical_name.to_string();
            if category.is_some() {
                mapping.canonical_category = category.map(str::to_string);
            }
            if let Some(price) = price {
                mapping.observe_price(price);
            }
            debug!(
                store = store_id,
                pattern,
                confirmations = mapping.confirmation_count,
                confirmed_by,
                "reconfirmed learned mapping"
            );
        } else {
            entry.push(LearnedMapping {
                store_id: store_key(store_id),
                raw_pattern: pattern.clone(),
                pattern_tokens: token_set(raw_name),
                canonical_name: canonical_name.to_string(),
                canonical_category: category.map(str::to_string),
                confirmation_count: 1,
                price_range_seen: price.map(|p| (p, p)),
            });
            debug!(store = store_id, pattern, confirmed_by, "learned new mapping");
        }
    }
}
