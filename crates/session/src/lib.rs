//! A single shared-expense session: participants, expenses, the pending draft,
//! and the settlements derived from them.
//!
//! Every mutation goes through [`Session::dispatch`], which runs the removal
//! cascade synchronously before returning. The convenience methods on
//! [`Session`] turn rejected commands into silent no-ops.

pub mod config;
pub mod event;
pub mod session;
pub mod view;

pub use config::SessionConfig;
pub use event::{SessionCommand, SessionEvent};
pub use session::Session;
pub use view::{ExpenseView, NamedParticipant, NamedShare, SessionSnapshot, SettlementView};
