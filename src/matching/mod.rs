//! Fuzzy name matching and slot-to-rank reconciliation.

pub mod reconcile;
pub mod similarity;

pub use reconcile::{ReconciledSlot, reconcile};
pub use similarity::{NameMatcher, normalize_name};
