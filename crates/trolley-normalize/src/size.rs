//! Size and quantity canonicalization.
//!
//! Sizes normalize into one of three equivalence classes:
//!
//! - `""` for absent/blank input ("no size specified"),
//! - `"<amount>:<category>"` for a recognized quantity plus unit, with volume
//!   expressed in millilitres and weight in grams,
//! - a lowercased whitespace-stripped literal for anything unparseable.
//!
//! Two sizes are equivalent iff their normalized strings are identical, so
//! categories never cross-match (500 ml is not 500 g) and unparsed sizes only
//! match identical literals.

/// Unit category a recognized size falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitCategory {
    Volume,
    Weight,
}

impl UnitCategory {
    fn as_str(self) -> &'static str {
        match self {
            UnitCategory::Volume => "volume",
            UnitCategory::Weight => "weight",
        }
    }
}

/// Conversion factor to the category base unit (ml for volume, g for weight).
fn unit_factor(unit: &str) -> Option<(f64, UnitCategory)> {
    match unit {
        "ml" | "millilitre" | "milliliter" => Some((1.0, UnitCategory::Volume)),
        "l" | "ltr" | "litre" | "liter" => Some((1000.0, UnitCategory::Volume)),
        "pt" | "pint" => Some((568.0, UnitCategory::Volume)),
        "g" | "gram" => Some((1.0, UnitCategory::Weight)),
        "kg" | "kilo" | "kilogram" => Some((1000.0, UnitCategory::Weight)),
        _ => None,
    }
}

/// Canonicalizes a free-text size string.
///
/// # Examples
///
/// ```
/// use trolley_normalize::normalize_size;
///
/// assert_eq!(normalize_size("2 pints"), "1136:volume");
/// assert_eq!(normalize_size("2pt"), "1136:volume");
/// assert_eq!(normalize_size("1 litre"), "1000:volume");
/// assert_eq!(normalize_size("1000ml"), "1000:volume");
/// assert_eq!(normalize_size("500g"), "500:weight");
/// assert_eq!(normalize_size("  "), "");
/// assert_eq!(normalize_size("Family Pack"), "familypack");
/// ```
pub fn normalize_size(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }

    if let Some((amount, unit)) = split_amount_and_unit(&lowered)
        && let Some((factor, category)) = unit_factor(&unit)
    {
        let base = (amount * factor).round() as i64;
        return format!("{}:{}", base, category.as_str());
    }

    // Unrecognized: compare as a whitespace-stripped literal.
    lowered.split_whitespace().collect()
}

/// Absent sizes normalize to the empty class.
pub fn normalize_size_opt(raw: Option<&str>) -> String {
    raw.map(normalize_size).unwrap_or_default()
}

/// Size equivalence: identical normalized strings.
///
/// Both-absent is a match; one specified and one absent is not. Missing
/// information is deliberately not a wildcard.
pub fn sizes_equivalent(a: Option<&str>, b: Option<&str>) -> bool {
    normalize_size_opt(a) == normalize_size_opt(b)
}

/// Splits a size string into a numeric amount and a unit token.
///
/// Accepts the number leading ("2pt", "2 pints") or trailing ("pint 2").
/// Plural unit tokens are reduced to their singular form before lookup.
fn split_amount_and_unit(size: &str) -> Option<(f64, String)> {
    let leading_digits = size
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
        .count();

    let (number, unit) = if leading_digits > 0 {
        let split_at = size
            .char_indices()
            .nth(leading_digits)
            .map_or(size.len(), |(idx, _)| idx);
        (&size[..split_at], &size[split_at..])
    } else {
        let trailing_digits = size
            .chars()
            .rev()
            .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
            .count();
        if trailing_digits == 0 {
            return None;
        }
        let split_at = size.len() - trailing_digits;
        (&size[split_at..], &size[..split_at])
    };

    let amount: f64 = number.parse().ok()?;
    let mut unit: String = unit.split_whitespace().collect();
    if unit.len() > 2 && unit.ends_with('s') {
        unit.pop();
    }
    if unit.is_empty() {
        return None;
    }
    Some((amount, unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blank_input_is_the_empty_class() {
        assert_eq!(normalize_size(""), "");
        assert_eq!(normalize_size("   "), "");
        assert_eq!(normalize_size_opt(None), "");
    }

    #[test]
    fn pints_convert_to_millilitres() {
        assert_eq!(normalize_size("2 pints"), "1136:volume");
        assert_eq!(normalize_size("2pt"), "1136:volume");
        assert_eq!(normalize_size("1 pint"), "568:volume");
    }

    #[test]
    fn litres_and_millilitres_agree() {
        assert_eq!(normalize_size("1 litre"), normalize_size("1000ml"));
        assert_eq!(normalize_size("1.5l"), "1500:volume");
    }

    #[test]
    fn weight_units_convert_to_grams() {
        assert_eq!(normalize_size("500g"), "500:weight");
        assert_eq!(normalize_size("2 kg"), "2000:weight");
        assert_eq!(normalize_size("0.5kg"), "500:weight");
    }

    #[test]
    fn categories_never_cross_match() {
        assert_ne!(normalize_size("500ml"), normalize_size("500g"));
    }

    #[test]
    fn unparsed_sizes_fall_back_to_literals() {
        assert_eq!(normalize_size("Family Pack"), "familypack");
        assert_eq!(normalize_size("6 pack"), "6pack");
        assert_eq!(normalize_size("dozen"), "dozen");
    }

    #[test]
    fn trailing_number_form_parses() {
        assert_eq!(normalize_size("pint 2"), "1136:volume");
    }

    #[test]
    fn equivalence_treats_missing_as_its_own_class() {
        assert!(sizes_equivalent(None, None));
        assert!(sizes_equivalent(Some(""), None));
        assert!(!sizes_equivalent(Some("2pt"), None));
        assert!(sizes_equivalent(Some("2pt"), Some("1136ml")));
    }

    proptest! {
        #[test]
        fn normalization_never_panics(raw in "\\PC{0,32}") {
            let _ = normalize_size(&raw);
        }

        #[test]
        fn ml_amounts_round_trip(amount in 1u32..100_000) {
            let normalized = normalize_size(&format!("{amount}ml"));
            prop_assert_eq!(normalized, format!("{amount}:volume"));
        }
    }
}
