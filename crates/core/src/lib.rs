//! `tabshare-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no logging setup):
//! identifiers, the `Money` value object, the domain error model and the
//! aggregate traits the participant registry and expense ledger implement.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ExpenseId, ParticipantId, SessionId};
pub use money::Money;
pub use value_object::ValueObject;
