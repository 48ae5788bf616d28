//! Item identity matching: similarity primitives, the variant-aware
//! duplicate predicate, the multi-signal matcher, and the learned mapping
//! store.
//!
//! The matcher scores a noisy [`trolley_model::RawItemMention`] against a
//! pool of candidates using a weighted blend of token overlap, category
//! equivalence, price proximity, learned receipt-pattern mappings, and fuzzy
//! name similarity, then buckets the top score into a confidence tier that
//! callers translate into auto-apply vs. ask-the-user policy.

#![deny(unsafe_code)]

pub mod config;
pub mod duplicate;
pub mod engine;
pub mod learned;
pub mod repository;
pub mod similarity;

pub use config::{ConfigError, MatchConfig, SignalWeights};
pub use duplicate::{is_duplicate_item, is_duplicate_item_name};
pub use engine::MatchEngine;
pub use learned::{LearnedMappingStore, LearnedMatch};
pub use repository::{MappingRepository, StoredMappings};
pub use similarity::{category_match, levenshtein_similarity, price_proximity, token_overlap};
