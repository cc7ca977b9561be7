//! Debt consolidation: from logged expenses to the transfers that settle them.
//!
//! Everything here is a pure function of the ledger's current expenses. Nothing
//! is cached; callers recompute on every read.

pub mod breakdown;
pub mod collation;
pub mod directory;
pub mod engine;

pub use breakdown::{ExpenseBreakdown, ShareLine, breakdown, total_amount};
pub use collation::{CollationKey, compare_names};
pub use directory::ParticipantDirectory;
pub use engine::{
    ConsolidatedDebt, ConsolidatedDebts, Debt, NetDebt, SETTLED_TOLERANCE, compute_settlements,
    consolidate, expand, net, sort_settlements,
};
