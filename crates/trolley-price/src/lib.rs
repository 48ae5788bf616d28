//! Price cascade resolution.
//!
//! Walks three price sources in trust order (the user's own purchase
//! history, the crowdsourced ledger, the AI-seeded estimate) and returns the
//! best available price with a confidence score and provenance. The cascade
//! is a pure function over caller-supplied records: it performs no I/O and
//! takes an explicit `as_of` instant, so every resolution is deterministic.

#![deny(unsafe_code)]

pub mod cascade;
pub mod variants;

pub use cascade::{PriceQuery, resolve_price};
pub use variants::{VariantPrice, resolve_best_variant};
