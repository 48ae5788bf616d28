//! Item mention and candidate types.
//!
//! A [`RawItemMention`] is a single noisy textual reference to a grocery item
//! produced by an external pipeline (receipt OCR, voice transcription, label
//! scan). A [`CandidateItem`] is a record from one of the backing stores that
//! the engine may match a mention against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backing store a candidate record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// An entry on a shopping list.
    ListItem,
    /// An item currently tracked in the user's pantry.
    PantryItem,
    /// A product in the shared crowdsourced catalog.
    CatalogProduct,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::ListItem => "list_item",
            SourceKind::PantryItem => "pantry_item",
            SourceKind::CatalogProduct => "catalog_product",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw item mention as extracted from a receipt, transcript, or scan.
///
/// Immutable input to the engine; the extraction pipelines own its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItemMention {
    /// Free-text item name as captured (may contain brand, size, typos).
    pub name: String,
    /// Captured quantity (count of units).
    pub quantity: f64,
    /// Unit price if the source reported one.
    pub unit_price: Option<f64>,
    /// Category label if the source reported one.
    pub category: Option<String>,
    /// Free-text size string, e.g. "2pt" or "500 ml".
    pub size: Option<String>,
    /// Unit token when captured separately from the size.
    pub unit: Option<String>,
}

impl RawItemMention {
    /// Builds a mention with just a name and quantity; the optional fields
    /// default to absent.
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price: None,
            category: None,
            size: None,
            unit: None,
        }
    }

    pub fn with_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// A record the engine may match a mention against.
///
/// Owned by the external list/pantry/catalog stores and read-only here; the
/// `source_kind` discriminant tags which store the record came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Store-assigned identifier, opaque to the engine.
    pub id: String,
    /// Which backing store owns this record.
    pub source_kind: SourceKind,
    /// Display name of the record.
    pub name: String,
    /// Category label if the store tracks one.
    pub category: Option<String>,
    /// Current price estimate if the store tracks one.
    pub estimated_price: Option<f64>,
}

impl CandidateItem {
    pub fn new(id: impl Into<String>, source_kind: SourceKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_kind,
            name: name.into(),
            category: None,
            estimated_price: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, estimated_price: f64) -> Self {
        self.estimated_price = Some(estimated_price);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SourceKind::PantryItem).unwrap();
        assert_eq!(json, "\"pantry_item\"");
    }

    #[test]
    fn mention_builder_defaults_optionals() {
        let mention = RawItemMention::new("Milk", 2.0).with_size("2pt");
        assert_eq!(mention.size.as_deref(), Some("2pt"));
        assert!(mention.unit_price.is_none());
        assert!(mention.category.is_none());
    }
}
