//! Variant price resolution.
//!
//! Resolves every known size-variant of a base item through the cascade and
//! returns the single best variant+price pair for display.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::debug;

use trolley_model::{ItemVariant, PersonalPriceEntry, PriceRecord, ResolvedPrice};

use crate::cascade::{PriceQuery, resolve_price};

/// One variant together with its resolved price.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPrice {
    pub variant: ItemVariant,
    pub resolved: ResolvedPrice,
}

/// Resolves each variant's price and picks the best one to show.
///
/// Ranking: variants with a resolved price before those without, then higher
/// commonality, then cheapest. Returns `None` only for an empty variant
/// list.
#[allow(clippy::too_many_arguments)]
pub fn resolve_best_variant(
    normalized_name: &str,
    variants: &[ItemVariant],
    store_name: Option<&str>,
    region: Option<&str>,
    user_id: Option<&str>,
    personal: &[PersonalPriceEntry],
    crowd: &[PriceRecord],
    as_of: DateTime<Utc>,
) -> Option<VariantPrice> {
    let mut resolved: Vec<VariantPrice> = variants
        .iter()
        .map(|variant| {
            let query = PriceQuery {
                normalized_name,
                size: variant.size.as_deref(),
                unit: variant.unit.as_deref(),
                variant_name: Some(&variant.name),
                store_name,
                region,
                user_id,
                ai_estimate: variant.ai_estimated_price,
            };
            VariantPrice {
                variant: variant.clone(),
                resolved: resolve_price(&query, personal, crowd, as_of),
            }
        })
        .collect();

    resolved.sort_by(rank);
    let best = resolved.into_iter().next()?;
    debug!(
        item = normalized_name,
        variant = %best.variant.name,
        price = ?best.resolved.price,
        "selected display variant"
    );
    Some(best)
}

/// Priced-before-unpriced, then higher commonality, then cheapest.
fn rank(a: &VariantPrice, b: &VariantPrice) -> Ordering {
    b.resolved
        .is_resolved()
        .cmp(&a.resolved.is_resolved())
        .then_with(|| b.variant.commonality.cmp(&a.variant.commonality))
        .then_with(|| {
            let price_a = a.resolved.price.unwrap_or(f64::INFINITY);
            let price_b = b.resolved.price.unwrap_or(f64::INFINITY);
            price_a.partial_cmp(&price_b).unwrap_or(Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn variant(name: &str, size: &str, commonality: u32, estimate: Option<f64>) -> ItemVariant {
        ItemVariant {
            name: name.to_string(),
            size: Some(size.to_string()),
            unit: None,
            commonality,
            ai_estimated_price: estimate,
        }
    }

    #[test]
    fn priced_variant_beats_unpriced_regardless_of_commonality() {
        let variants = vec![
            variant("Milk 4pt", "4pt", 9, None),
            variant("Milk 2pt", "2pt", 3, Some(1.20)),
        ];
        let best = resolve_best_variant("milk", &variants, None, None, None, &[], &[], as_of())
            .expect("non-empty variants");
        assert_eq!(best.variant.name, "Milk 2pt");
        assert_eq!(best.resolved.price, Some(1.20));
    }

    #[test]
    fn commonality_breaks_ties_among_priced_variants() {
        let variants = vec![
            variant("Milk 2pt", "2pt", 3, Some(1.20)),
            variant("Milk 4pt", "4pt", 9, Some(2.10)),
        ];
        let best = resolve_best_variant("milk", &variants, None, None, None, &[], &[], as_of())
            .expect("non-empty variants");
        assert_eq!(best.variant.name, "Milk 4pt");
    }

    #[test]
    fn cheaper_wins_when_equally_common() {
        let variants = vec![
            variant("Milk 4pt", "4pt", 5, Some(2.10)),
            variant("Milk 2pt", "2pt", 5, Some(1.20)),
        ];
        let best = resolve_best_variant("milk", &variants, None, None, None, &[], &[], as_of())
            .expect("non-empty variants");
        assert_eq!(best.variant.name, "Milk 2pt");
    }

    #[test]
    fn empty_variant_list_yields_none() {
        assert!(resolve_best_variant("milk", &[], None, None, None, &[], &[], as_of()).is_none());
    }
}
