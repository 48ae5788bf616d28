//! Variant-aware duplicate predicate.
//!
//! Answers "do these two mentions refer to the same product variant?" by
//! combining name-level identity with size equivalence. The name rules are
//! deliberately asymmetric for short strings: below 5 characters only the
//! exact and substring rules apply, because edit-distance percentages are
//! unreliable on short tokens.

use trolley_normalize::{normalize_name, sizes_equivalent};

use crate::similarity::levenshtein_similarity;

/// Substring rule: the shorter name must cover more than this share of the
/// longer one. Guards against "rice" matching "rice pudding".
const SUBSTRING_MIN_RATIO: f64 = 0.8;

/// Fuzzy rule: minimum edit-distance similarity for names of 5+ characters.
const FUZZY_MIN_SIMILARITY: f64 = 85.0;

/// Name-level duplicate check on normalized names.
///
/// True when the normalized names are identical; or the shorter (>3 chars)
/// is a substring of the longer covering more than 80% of its length; or
/// both are at least 5 characters and edit-distance similarity is at
/// least 85%.
///
/// # Examples
///
/// ```
/// use trolley_match::is_duplicate_item_name;
///
/// assert!(is_duplicate_item_name("Milk", "milk"));
/// assert!(is_duplicate_item_name("Chicken", "Chicen"));
/// assert!(!is_duplicate_item_name("Milk", "Bread"));
/// assert!(!is_duplicate_item_name("apple", "apples"));
/// ```
pub fn is_duplicate_item_name(name1: &str, name2: &str) -> bool {
    let a = normalize_name(name1);
    let b = normalize_name(name2);

    if a == b {
        return true;
    }

    // Char counts, not byte lengths: non-ASCII names would otherwise pick
    // the wrong side as "shorter".
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (shorter, longer, shorter_len, longer_len) = if a_len <= b_len {
        (&a, &b, a_len, b_len)
    } else {
        (&b, &a, b_len, a_len)
    };
    if shorter_len > 3
        && longer.contains(shorter.as_str())
        && shorter_len as f64 / longer_len as f64 > SUBSTRING_MIN_RATIO
    {
        return true;
    }

    shorter_len >= 5 && levenshtein_similarity(&a, &b) >= FUZZY_MIN_SIMILARITY
}

/// Same-product-variant check: name-level duplicate AND equivalent sizes.
///
/// Both sizes absent counts as equivalent; one specified and one absent does
/// not (missing size information is not a wildcard).
///
/// # Examples
///
/// ```
/// use trolley_match::is_duplicate_item;
///
/// assert!(is_duplicate_item("Rice", None, "Rice", None));
/// assert!(!is_duplicate_item("Milk", Some("2pt"), "Milk", Some("4pt")));
/// assert!(!is_duplicate_item("Milk", Some("2pt"), "Milk", None));
/// ```
pub fn is_duplicate_item(
    name1: &str,
    size1: Option<&str>,
    name2: &str,
    size2: Option<&str>,
) -> bool {
    is_duplicate_item_name(name1, name2) && sizes_equivalent(size1, size2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_after_normalization() {
        assert!(is_duplicate_item_name("Milk", "milk"));
        assert!(is_duplicate_item_name("The Milk", "milk"));
        assert!(is_duplicate_item_name("Eggs", "egg"));
    }

    #[test]
    fn distinct_items_do_not_match() {
        assert!(!is_duplicate_item_name("Milk", "Bread"));
    }

    #[test]
    fn typo_on_long_word_clears_fuzzy_rule() {
        assert!(is_duplicate_item_name("Chicken", "Chicen"));
    }

    #[test]
    fn non_ascii_names_compare_by_char_count() {
        // One accented char: byte lengths differ, char lengths do not.
        assert!(is_duplicate_item_name("Jalapeños", "Jalapenos"));
        assert!(!is_duplicate_item_name("Jalapeño", "Juice"));
    }

    #[test]
    fn substring_ratio_boundary_is_strict() {
        // "apples" normalizes to "appl": 4/5 of "apple" is exactly 0.8,
        // which fails the > 0.8 requirement.
        assert!(!is_duplicate_item_name("apple", "apples"));
    }

    #[test]
    fn short_substring_does_not_swallow_compounds() {
        assert!(!is_duplicate_item_name("rice", "rice pudding"));
    }

    #[test]
    fn size_equivalence_gates_variant_duplicates() {
        assert!(!is_duplicate_item("Milk", Some("2pt"), "Milk", Some("4pt")));
        assert!(is_duplicate_item("Milk", Some("2pt"), "Milk", Some("1136ml")));
        assert!(is_duplicate_item("Rice", None, "Rice", None));
    }

    #[test]
    fn missing_size_is_not_a_wildcard() {
        assert!(!is_duplicate_item("Milk", Some("2pt"), "Milk", None));
        assert!(!is_duplicate_item("Milk", None, "Milk", Some("2pt")));
    }
}
