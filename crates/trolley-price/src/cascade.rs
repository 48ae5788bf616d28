//! The personal → crowdsourced → AI price cascade.

use chrono::{DateTime, Utc};
use tracing::debug;

use trolley_match::is_duplicate_item_name;
use trolley_model::{PersonalPriceEntry, PriceRecord, PriceSource, ResolvedPrice};
use trolley_normalize::sizes_equivalent;

/// Days over which a crowdsourced record's recency multiplier decays from
/// 1.0 to its tier floor.
const RECENCY_WINDOW_DAYS: f64 = 90.0;

/// Report-count bonus per report; ten reports reach full corroboration.
const REPORT_BONUS_PER_REPORT: f64 = 0.05;

/// Crowdsourced priority tiers, most trusted first. Ceiling is the maximum
/// confidence the tier can reach; floor is where its recency decay bottoms
/// out. An old, thinly-reported price from the exact store can legitimately
/// end up with lower confidence than a fresh, well-corroborated one from
/// elsewhere would have - the tier filter still prefers it, the confidence
/// just says so.
const TIERS: [CrowdTier; 4] = [
    CrowdTier {
        kind: TierKind::StoreAndRegion,
        ceiling: 0.95,
        recency_floor: 0.7,
    },
    CrowdTier {
        kind: TierKind::StoreOnly,
        ceiling: 0.90,
        recency_floor: 0.6,
    },
    CrowdTier {
        kind: TierKind::RegionOnly,
        ceiling: 0.85,
        recency_floor: 0.5,
    },
    CrowdTier {
        kind: TierKind::CheapestAnywhere,
        ceiling: 0.80,
        recency_floor: 0.4,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierKind {
    StoreAndRegion,
    StoreOnly,
    RegionOnly,
    CheapestAnywhere,
}

#[derive(Debug, Clone, Copy)]
struct CrowdTier {
    kind: TierKind,
    ceiling: f64,
    recency_floor: f64,
}

/// What to resolve a price for.
#[derive(Debug, Clone, Default)]
pub struct PriceQuery<'a> {
    /// Normalized base item name.
    pub normalized_name: &'a str,
    /// Size of the packaging being priced.
    pub size: Option<&'a str>,
    /// Unit token when tracked separately from the size.
    pub unit: Option<&'a str>,
    /// Specific variant display name, when pricing a variant.
    pub variant_name: Option<&'a str>,
    /// Store the user is shopping at, when known.
    pub store_name: Option<&'a str>,
    /// The user's region, for crowdsourced locality.
    pub region: Option<&'a str>,
    /// Whose personal history to consult.
    pub user_id: Option<&'a str>,
    /// AI-seeded estimate, the cascade's last resort.
    pub ai_estimate: Option<f64>,
}

/// Resolves the single best price for an item.
///
/// Three ordered layers, first hit wins:
///
/// 1. the user's own purchase history (confidence 1.0),
/// 2. the crowdsourced ledger, priority-filtered by store/region locality
///    with report-count and recency scaling,
/// 3. the AI estimate (confidence 0.5, no store attribution).
///
/// When nothing produces a price the result is
/// [`ResolvedPrice::none`]: `price: None`, source [`PriceSource::None`],
/// confidence 0.
pub fn resolve_price(
    query: &PriceQuery<'_>,
    personal: &[PersonalPriceEntry],
    crowd: &[PriceRecord],
    as_of: DateTime<Utc>,
) -> ResolvedPrice {
    if let Some(resolved) = resolve_personal(query, personal) {
        debug!(item = query.normalized_name, price = ?resolved.price, "personal price hit");
        return resolved;
    }
    if let Some(resolved) = resolve_crowdsourced(query, crowd, as_of) {
        debug!(item = query.normalized_name, price = ?resolved.price, "crowdsourced price hit");
        return resolved;
    }
    if let Some(estimate) = query.ai_estimate {
        return ResolvedPrice {
            price: Some(estimate),
            source: PriceSource::Ai,
            confidence: 0.5,
            store_name: None,
            report_count: 0,
        };
    }
    ResolvedPrice::none()
}

fn name_matches(query: &PriceQuery<'_>, recorded_name: &str) -> bool {
    is_duplicate_item_name(query.normalized_name, recorded_name)
        || query
            .variant_name
            .is_some_and(|variant| is_duplicate_item_name(variant, recorded_name))
}

fn resolve_personal(
    query: &PriceQuery<'_>,
    personal: &[PersonalPriceEntry],
) -> Option<ResolvedPrice> {
    let mut matches: Vec<&PersonalPriceEntry> = personal
        .iter()
        .filter(|entry| {
            query
                .user_id
                .is_none_or(|user| entry.user_id.eq_ignore_ascii_case(user))
        })
        .filter(|entry| name_matches(query, &entry.normalized_item_name))
        .filter(|entry| {
            sizes_equivalent(query.size, entry.size.as_deref())
                || unit_matches(query.unit, entry.unit.as_deref())
        })
        .collect();

    if matches.is_empty() {
        return None;
    }

    // Narrow to the named store only when it actually has history.
    if let Some(store) = query.store_name {
        let at_store: Vec<&PersonalPriceEntry> = matches
            .iter()
            .copied()
            .filter(|entry| entry.store_name.eq_ignore_ascii_case(store))
            .collect();
        if !at_store.is_empty() {
            matches = at_store;
        }
    }

    let report_count = matches.len() as u32;
    // max_by_key keeps the last maximum, so later entries win date ties.
    let latest = matches.into_iter().max_by_key(|entry| entry.purchase_date)?;

    Some(ResolvedPrice {
        price: Some(latest.unit_price),
        source: PriceSource::Personal,
        confidence: 1.0,
        store_name: Some(latest.store_name.clone()),
        report_count,
    })
}

fn unit_matches(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

fn resolve_crowdsourced(
    query: &PriceQuery<'_>,
    crowd: &[PriceRecord],
    as_of: DateTime<Utc>,
) -> Option<ResolvedPrice> {
    let matches: Vec<&PriceRecord> = crowd
        .iter()
        .filter(|record| name_matches(query, &record.normalized_item_name))
        .collect();
    if matches.is_empty() {
        return None;
    }

    for tier in TIERS {
        let candidates: Vec<&PriceRecord> = matches
            .iter()
            .copied()
            .filter(|record| tier_accepts(&tier, query, record))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let chosen = match tier.kind {
            // The fallback tier ranks purely by price.
            TierKind::CheapestAnywhere => candidates.into_iter().min_by(|a, b| {
                a.average_price
                    .partial_cmp(&b.average_price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?,
            _ => candidates.into_iter().max_by(|a, b| {
                record_confidence(a, &tier, as_of)
                    .partial_cmp(&record_confidence(b, &tier, as_of))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.last_seen_at.cmp(&b.last_seen_at))
            })?,
        };

        return Some(ResolvedPrice {
            price: Some(chosen.average_price),
            source: PriceSource::Crowdsourced,
            confidence: record_confidence(chosen, &tier, as_of),
            store_name: Some(chosen.store_name.clone()),
            report_count: chosen.report_count,
        });
    }
    None
}

fn tier_accepts(tier: &CrowdTier, query: &PriceQuery<'_>, record: &PriceRecord) -> bool {
    let store_matches = query
        .store_name
        .is_some_and(|store| record.store_name.eq_ignore_ascii_case(store));
    let region_matches = match (query.region, record.region.as_deref()) {
        (Some(query_region), Some(record_region)) => {
            query_region.eq_ignore_ascii_case(record_region)
        }
        _ => false,
    };
    match tier.kind {
        TierKind::StoreAndRegion => store_matches && region_matches,
        TierKind::StoreOnly => store_matches,
        TierKind::RegionOnly => region_matches,
        TierKind::CheapestAnywhere => true,
    }
}

/// `ceiling · report_factor · recency`: confidence starts at the tier
/// ceiling, is discounted for thin reporting, and decays linearly toward the
/// tier floor over the 90-day window since the record was last seen.
fn record_confidence(record: &PriceRecord, tier: &CrowdTier, as_of: DateTime<Utc>) -> f64 {
    let days = (as_of - record.last_seen_at)
        .num_days()
        .clamp(0, RECENCY_WINDOW_DAYS as i64) as f64;
    let recency = 1.0 - (1.0 - tier.recency_floor) * days / RECENCY_WINDOW_DAYS;
    let report_factor =
        (0.5 + REPORT_BONUS_PER_REPORT * f64::from(record.report_count)).min(1.0);
    (tier.ceiling * report_factor * recency).clamp(0.0, 1.0)
}
