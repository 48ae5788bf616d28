//! Cross-source deduplication.
//!
//! Collapses duplicate item mentions across a batch of source lists (merged
//! shopping lists, a pantry snapshot) into one representative record per
//! group. Matching is name-level only: cross-list merging intentionally
//! ignores size variance, because two lists saying "milk" should merge even
//! when only one of them bothered to write "2pt".
//!
//! Quantities across a merge group are always summed into the kept record,
//! whichever selection rule picked it. The feature exists to avoid
//! under-buying when the same item appears on multiple lists.

#![deny(unsafe_code)]

use std::collections::BTreeMap;

use tracing::debug;

use trolley_match::is_duplicate_item_name;
use trolley_model::{
    DeduplicationResult, DuplicateGroup, MergedItem, RawItemMention, SourceList,
};
use trolley_normalize::normalize_name;

/// Which rule picked the kept base record of a merge group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeptRule {
    FirstSeen,
    HigherQuantity,
    BetterPrice,
}

impl KeptRule {
    fn as_str(self) -> &'static str {
        match self {
            KeptRule::FirstSeen => "first seen",
            KeptRule::HigherQuantity => "higher quantity",
            KeptRule::BetterPrice => "better price",
        }
    }
}

/// Collapses duplicates across the given source lists.
///
/// Items that match no other item pass through unchanged. For each group of
/// name-level duplicates, the kept base record is the member with the
/// highest quantity; a quantity tie is broken by the lowest positive
/// estimated price. The kept record's final quantity is the sum over the
/// whole group regardless of which rule selected it.
pub fn deduplicate(sources: &BTreeMap<String, SourceList>) -> DeduplicationResult {
    let flattened: Vec<(&str, &RawItemMention)> = sources
        .values()
        .flat_map(|list| list.items.iter().map(move |item| (list.label.as_str(), item)))
        .collect();

    let mut processed = vec![false; flattened.len()];
    let mut items = Vec::new();
    let mut duplicates = Vec::new();

    for start in 0..flattened.len() {
        if processed[start] {
            continue;
        }
        processed[start] = true;

        let mut group = vec![start];
        for other in (start + 1)..flattened.len() {
            if processed[other] {
                continue;
            }
            if is_duplicate_item_name(flattened[start].1.name.as_str(), flattened[other].1.name.as_str()) {
                processed[other] = true;
                group.push(other);
            }
        }

        if group.len() == 1 {
            let (label, item) = flattened[start];
            items.push(pass_through(label, item));
            continue;
        }

        let (merged, attribution) = merge_group(&group, &flattened);
        debug!(
            name = %attribution.name,
            members = group.len(),
            kept_from = %attribution.kept_from,
            reason = %attribution.reason,
            "merged duplicate group"
        );
        items.push(merged);
        duplicates.push(attribution);
    }

    DeduplicationResult { items, duplicates }
}

fn pass_through(label: &str, item: &RawItemMention) -> MergedItem {
    MergedItem {
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        category: item.category.clone(),
        size: item.size.clone(),
        kept_from: label.to_string(),
    }
}

fn merge_group(
    group: &[usize],
    flattened: &[(&str, &RawItemMention)],
) -> (MergedItem, DuplicateGroup) {
    let mut kept = group[0];
    let mut rule = KeptRule::FirstSeen;

    for &index in &group[1..] {
        let (_, candidate) = flattened[index];
        let (_, current) = flattened[kept];
        if candidate.quantity > current.quantity {
            kept = index;
            rule = KeptRule::HigherQuantity;
        } else if candidate.quantity == current.quantity
            && positive_price(candidate).is_some()
            && positive_price(candidate) < positive_price(current).or(Some(f64::INFINITY))
        {
            kept = index;
            rule = KeptRule::BetterPrice;
        }
    }

    let total_quantity: f64 = group.iter().map(|&index| flattened[index].1.quantity).sum();
    let (kept_label, kept_item) = flattened[kept];

    let merged = MergedItem {
        name: kept_item.name.clone(),
        quantity: total_quantity,
        unit_price: kept_item.unit_price,
        category: kept_item.category.clone(),
        size: kept_item.size.clone(),
        kept_from: kept_label.to_string(),
    };
    let attribution = DuplicateGroup {
        name: normalize_name(&kept_item.name),
        sources: group
            .iter()
            .map(|&index| flattened[index].0.to_string())
            .collect(),
        kept_from: kept_label.to_string(),
        reason: rule.as_str().to_string(),
    };
    (merged, attribution)
}

fn positive_price(item: &RawItemMention) -> Option<f64> {
    item.unit_price.filter(|price| *price > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(lists: Vec<(&str, Vec<RawItemMention>)>) -> BTreeMap<String, SourceList> {
        lists
            .into_iter()
            .enumerate()
            .map(|(index, (label, items))| {
                (format!("s{index}"), SourceList::new(label, items))
            })
            .collect()
    }

    #[test]
    fn merges_case_variants_and_sums_quantities() {
        let input = sources(vec![
            (
                "Anna's list",
                vec![
                    RawItemMention::new("Milk", 1.0).with_price(1.50),
                    RawItemMention::new("Bread", 1.0),
                ],
            ),
            (
                "Ben's list",
                vec![RawItemMention::new("milk", 2.0).with_price(1.40)],
            ),
        ]);

        let result = deduplicate(&input);

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.duplicates.len(), 1);

        let milk = result
            .items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case("milk"))
            .expect("merged milk");
        assert_eq!(milk.quantity, 3.0);
        assert_eq!(milk.unit_price, Some(1.40));
        assert_eq!(milk.kept_from, "Ben's list");

        let group = &result.duplicates[0];
        assert_eq!(group.name, "milk");
        assert_eq!(group.sources.len(), 2);
    }

    #[test]
    fn quantity_tie_is_broken_by_lowest_positive_price() {
        let input = sources(vec![
            ("a", vec![RawItemMention::new("Eggs", 1.0).with_price(2.20)]),
            ("b", vec![RawItemMention::new("eggs", 1.0).with_price(1.90)]),
        ]);

        let result = deduplicate(&input);
        let eggs = &result.items[0];
        assert_eq!(eggs.quantity, 2.0);
        assert_eq!(eggs.unit_price, Some(1.90));
        assert_eq!(result.duplicates[0].reason, "better price");
    }

    #[test]
    fn zero_price_never_wins_a_tie() {
        let input = sources(vec![
            ("a", vec![RawItemMention::new("Rice", 1.0).with_price(0.90)]),
            ("b", vec![RawItemMention::new("rice", 1.0).with_price(0.0)]),
        ]);

        let result = deduplicate(&input);
        assert_eq!(result.items[0].unit_price, Some(0.90));
    }

    #[test]
    fn unique_items_pass_through_unchanged() {
        let input = sources(vec![(
            "solo",
            vec![
                RawItemMention::new("Butter", 1.0).with_size("250g"),
                RawItemMention::new("Coffee", 1.0),
            ],
        )]);

        let result = deduplicate(&input);
        assert_eq!(result.items.len(), 2);
        assert!(result.duplicates.is_empty());
        assert_eq!(result.items[0].size.as_deref(), Some("250g"));
    }

    #[test]
    fn size_variance_does_not_block_merging() {
        let input = sources(vec![
            ("a", vec![RawItemMention::new("Milk", 1.0).with_size("2pt")]),
            ("b", vec![RawItemMention::new("Milk", 1.0).with_size("4pt")]),
        ]);

        let result = deduplicate(&input);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].quantity, 2.0);
    }

    #[test]
    fn typo_variants_collapse() {
        let input = sources(vec![
            ("a", vec![RawItemMention::new("Chicken", 1.0)]),
            ("b", vec![RawItemMention::new("Chicen", 2.0)]),
        ]);

        let result = deduplicate(&input);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].quantity, 3.0);
        assert_eq!(result.duplicates[0].reason, "higher quantity");
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = deduplicate(&BTreeMap::new());
        assert!(result.items.is_empty());
        assert!(result.duplicates.is_empty());
    }
}
