//! Deduplication inputs and results.

use serde::{Deserialize, Serialize};

use crate::item::RawItemMention;

/// One source list feeding a deduplication pass, e.g. a household member's
/// shopping list or a pantry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceList {
    /// Human-readable label shown in merge attribution ("Anna's list").
    pub label: String,
    pub items: Vec<RawItemMention>,
}

impl SourceList {
    pub fn new(label: impl Into<String>, items: Vec<RawItemMention>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

/// An item surviving deduplication, possibly merged from several sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedItem {
    /// Name taken from the kept base record.
    pub name: String,
    /// Sum of quantities across the whole merge group.
    pub quantity: f64,
    /// Price carried over from the kept base record.
    pub unit_price: Option<f64>,
    pub category: Option<String>,
    pub size: Option<String>,
    /// Label of the source whose record was kept as the base.
    pub kept_from: String,
}

/// Attribution for one collapsed duplicate group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Canonical name of the merged group.
    pub name: String,
    /// Labels of every source that contributed a member.
    pub sources: Vec<String>,
    /// Label of the source whose values were kept as the base.
    pub kept_from: String,
    /// Human-readable explanation of which rule picked the base.
    pub reason: String,
}

/// Outcome of one deduplication pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationResult {
    /// Unique items after merging, in first-seen order.
    pub items: Vec<MergedItem>,
    /// One entry per collapsed group (pass-through items are not listed).
    pub duplicates: Vec<DuplicateGroup>,
}

impl DeduplicationResult {
    /// Number of records removed by merging.
    pub fn removed_count(&self) -> usize {
        self.duplicates
            .iter()
            .map(|group| group.sources.len().saturating_sub(1))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_count_sums_group_sizes() {
        let result = DeduplicationResult {
            items: vec![],
            duplicates: vec![
                DuplicateGroup {
                    name: "milk".into(),
                    sources: vec!["a".into(), "b".into(), "c".into()],
                    kept_from: "b".into(),
                    reason: "higher quantity".into(),
                },
                DuplicateGroup {
                    name: "bread".into(),
                    sources: vec!["a".into(), "b".into()],
                    kept_from: "a".into(),
                    reason: "better price".into(),
                },
            ],
        };
        assert_eq!(result.removed_count(), 3);
    }
}
