//! Expense ledger (append/remove-only expense records) and the pending-expense
//! draft.
//!
//! Pure domain logic only: no IO, no rendering.

pub mod draft;
pub mod expense;
pub mod ledger;

pub use draft::ExpenseDraft;
pub use expense::Expense;
pub use ledger::{
    AddExpense, DeleteExpense, ExpenseAdded, ExpenseDeleted, ExpenseLedger, LedgerCommand,
    LedgerEvent, ParticipantStruck, StrikeParticipant,
};
