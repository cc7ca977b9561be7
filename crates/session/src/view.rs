//! Owned read models handed to renderers.
//!
//! Views carry display names resolved at the time they were built; they do
//! not track later renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabshare_core::{ExpenseId, Money, ParticipantId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedParticipant {
    pub id: ParticipantId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedShare {
    pub participant: NamedParticipant,
    pub share: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseView {
    pub id: ExpenseId,
    pub description: String,
    /// Amount as entered (unrounded).
    pub amount: Money,
    pub paid_by: NamedParticipant,
    pub per_person: Money,
    pub shares: Vec<NamedShare>,
    pub recorded_at: DateTime<Utc>,
}

/// `from` pays `to` the rounded `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementView {
    pub from: NamedParticipant,
    pub to: NamedParticipant,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub taken_at: DateTime<Utc>,
    pub participants: Vec<NamedParticipant>,
    pub expenses: Vec<ExpenseView>,
    pub settlements: Vec<SettlementView>,
    pub total_amount: Money,
}

impl SessionSnapshot {
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}
