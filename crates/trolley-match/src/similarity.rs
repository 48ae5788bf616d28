//! Similarity primitives: edit-distance similarity, token overlap with
//! brand/stop-word stripping, category-alias equivalence, and price
//! proximity.
//!
//! All scores are expressed 0 to 100 so the matcher can combine them with
//! percentage weights directly.

use std::collections::BTreeSet;

use rapidfuzz::distance::levenshtein;

/// Retailer names stripped from item names before token comparison, so that
/// "Tesco Semi Skimmed Milk" and "Semi Skimmed Milk" compare as equals.
const BRAND_PREFIXES: [&str; 14] = [
    "tesco",
    "sainsburys",
    "asda",
    "aldi",
    "lidl",
    "morrisons",
    "waitrose",
    "coop",
    "iceland",
    "ocado",
    "costco",
    "walmart",
    "kroger",
    "spar",
];

const STOP_WORDS: [&str; 10] = ["a", "an", "the", "of", "and", "with", "in", "per", "pack", "x"];

/// Percentage similarity from classic dynamic-programming Levenshtein
/// distance: `(max_len - distance) / max_len * 100`.
///
/// Identical strings score 100; one or both empty also score 100 (defined
/// edge case, so absent fields never penalize a comparison).
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    if a == b || a.is_empty() || b.is_empty() {
        return 100.0;
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    let max_len = a.chars().count().max(b.chars().count());
    (max_len.saturating_sub(distance)) as f64 / max_len as f64 * 100.0
}

/// Size/count noise: tokens starting with a digit ("2pt", "400g") and
/// multiplier tokens ("x4", "x12").
fn is_size_noise(token: &str) -> bool {
    token.chars().next().is_some_and(|ch| ch.is_ascii_digit())
        || token
            .strip_prefix('x')
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit()))
}

/// Tokenizes a name for overlap comparison: lowercased alphanumeric runs,
/// minus brand prefixes, stop words, and size/number tokens.
pub fn token_set(name: &str) -> BTreeSet<String> {
    name.to_lowercase()
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| !is_size_noise(token))
        .filter(|token| !BRAND_PREFIXES.contains(token))
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Token overlap between two names, 0 to 100.
///
/// Blends `overlap / min(|A|,|B|)` (rewards subset containment, 70%) with
/// `overlap / max(|A|,|B|)` (penalizes length mismatch, 30%). If stripping
/// empties either token set there is no evidence to compare, so the score
/// is 0.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let overlap = tokens_a.intersection(&tokens_b).count() as f64;
    let min = tokens_a.len().min(tokens_b.len()) as f64;
    let max = tokens_a.len().max(tokens_b.len()) as f64;
    (0.7 * (overlap / min) + 0.3 * (overlap / max)) * 100.0
}

/// Maps category spellings onto their canonical label before comparison.
fn canonical_category(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.as_str() {
        "clothes" | "apparel" => "clothing".to_string(),
        "poultry" | "butchery" => "meat".to_string(),
        "veg" | "veggies" | "produce" => "vegetables".to_string(),
        "dairy products" => "dairy".to_string(),
        "baked goods" => "bakery".to_string(),
        _ => lowered,
    }
}

/// Category equivalence after alias normalization: 100 or 0, no partial
/// credit. Missing categories score 0.
pub fn category_match(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if canonical_category(a) == canonical_category(b) => 100.0,
        _ => 0.0,
    }
}

/// Price proximity, 0 to 100: full marks at identical prices, linear decay
/// to 0 as the percentage difference (relative to the mean of the two)
/// approaches `threshold_pct`. Missing or non-positive prices score 0.
pub fn price_proximity(a: Option<f64>, b: Option<f64>, threshold_pct: f64) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a <= 0.0 || b <= 0.0 || threshold_pct <= 0.0 {
        return 0.0;
    }
    let mean = (a + b) / 2.0;
    let diff_pct = (a - b).abs() / mean * 100.0;
    if diff_pct >= threshold_pct {
        return 0.0;
    }
    (1.0 - diff_pct / threshold_pct) * 100.0
}
