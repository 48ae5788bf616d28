//! Price ledger records and resolved price values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which cascade layer produced a resolved price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// The user's own purchase history.
    Personal,
    /// The shared crowdsourced price ledger.
    Crowdsourced,
    /// AI-seeded catalog estimate.
    Ai,
    /// No layer produced a price.
    None,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Personal => "personal",
            PriceSource::Crowdsourced => "crowdsourced",
            PriceSource::Ai => "ai",
            PriceSource::None => "none",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A crowdsourced per-item, per-store price aggregate.
///
/// Mutated by the external enrichment pipeline on every new receipt;
/// read-only to the cascade resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Normalized item name this aggregate tracks.
    pub normalized_item_name: String,
    /// Retailer the prices were observed at.
    pub store_name: String,
    /// Geographic region of the reports, when known.
    pub region: Option<String>,
    /// Most recently reported unit price.
    pub unit_price: f64,
    /// Mean of all reported prices.
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Number of receipts contributing to this aggregate.
    pub report_count: u32,
    /// When a receipt last contributed to this aggregate.
    pub last_seen_at: DateTime<Utc>,
}

/// One historical purchase from the user's own receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalPriceEntry {
    pub user_id: String,
    pub normalized_item_name: String,
    pub store_name: String,
    pub size: Option<String>,
    pub unit: Option<String>,
    pub unit_price: f64,
    pub purchase_date: NaiveDate,
}

/// The single best available price for an item, with provenance.
///
/// Computed per resolve call, never persisted. When `price` is `None` the
/// `source` is [`PriceSource::None`] and `confidence` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub price: Option<f64>,
    pub source: PriceSource,
    /// Trust in this price, 0.0 to 1.0.
    pub confidence: f64,
    /// Store the price was observed at, when attributable.
    pub store_name: Option<String>,
    /// How many underlying records corroborate the price.
    pub report_count: u32,
}

impl ResolvedPrice {
    /// The empty-cascade result: no price, no provenance, zero confidence.
    pub fn none() -> Self {
        Self {
            price: None,
            source: PriceSource::None,
            confidence: 0.0,
            store_name: None,
            report_count: 0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.price.is_some()
    }
}

/// A known size/unit packaging of a base item, e.g. "Milk, 2pt".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemVariant {
    /// Display name of the variant.
    pub name: String,
    /// Size string, e.g. "2pt".
    pub size: Option<String>,
    /// Unit token when tracked separately.
    pub unit: Option<String>,
    /// How commonly this packaging is bought, relative to its siblings.
    pub commonality: u32,
    /// AI-seeded price estimate for the variant.
    pub ai_estimated_price: Option<f64>,
}
