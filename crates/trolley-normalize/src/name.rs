//! Item name canonicalization.
//!
//! Lowercases, strips leading filler words, and reverses English plurals with
//! a fixed ordered rule table. The rule table is a heuristic, not a
//! dictionary: it knowingly produces some false singularizations
//! ("apples" becomes "appl") and downstream duplicate thresholds were tuned
//! against exactly this behavior, so the rules must not be "improved"
//! without retuning those thresholds.

/// Words stripped from the front of a name before comparison.
const FILLER_WORDS: [&str; 6] = ["a", "an", "the", "some", "fresh", "organic"];

/// Canonicalizes a free-text item name.
///
/// Lowercases and trims, drops leading filler words, collapses internal
/// whitespace, then applies plural-reversal rules in priority order:
/// `-ies` to `y` (len > 4), `-ves` to `f` (len > 4), `-es` dropped (len > 3),
/// trailing `-s` dropped (len > 2, not `-ss`).
///
/// # Examples
///
/// ```
/// use trolley_normalize::normalize_name;
///
/// assert_eq!(normalize_name("  Fresh Organic Strawberries "), "strawberry");
/// assert_eq!(normalize_name("The Loaves"), "loaf");
/// assert_eq!(normalize_name("Tomatoes"), "tomato");
/// assert_eq!(normalize_name("glass"), "glass");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();

    // Never strip the last remaining token; "Fresh" alone is still a name.
    while tokens.len() > 1 && FILLER_WORDS.contains(&tokens[0]) {
        tokens.remove(0);
    }

    singularize(&tokens.join(" "))
}

/// Applies the plural-reversal rule table to the tail of a normalized name.
fn singularize(name: &str) -> String {
    let len = name.chars().count();

    if len > 4 && name.ends_with("ies") {
        let mut base = name[..name.len() - 3].to_string();
        base.push('y');
        return base;
    }
    if len > 4 && name.ends_with("ves") {
        let mut base = name[..name.len() - 3].to_string();
        base.push('f');
        return base;
    }
    if len > 3 && name.ends_with("es") {
        return name[..name.len() - 2].to_string();
    }
    if len > 2 && name.ends_with('s') && !name.ends_with("ss") {
        return name[..name.len() - 1].to_string();
    }

    name.to_string()
}
