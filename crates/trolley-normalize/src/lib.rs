//! Canonicalization of free-text item names and size strings.
//!
//! Everything in this crate is a pure, deterministic function of its input.
//! Two mentions are comparable exactly when their normalized forms are; the
//! matching and dedup crates build on that equivalence.

#![deny(unsafe_code)]

pub mod name;
pub mod size;

pub use name::normalize_name;
pub use size::{normalize_size, normalize_size_opt, sizes_equivalent};
