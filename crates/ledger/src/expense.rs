use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabshare_core::{Entity, ExpenseId, Money, ParticipantId};

/// One logged expense: paid by one participant, shared equally by `split_between`.
///
/// Fields are only changed by the ledger (creation and the removal cascade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub(crate) id: ExpenseId,
    pub(crate) description: String,
    /// Unrounded amount as entered.
    pub(crate) amount: Money,
    pub(crate) paid_by: ParticipantId,
    /// Non-empty, no duplicates, in selection order.
    pub(crate) split_between: Vec<ParticipantId>,
    pub(crate) recorded_at: DateTime<Utc>,
}

impl Expense {
    /// Build an expense from already-validated parts.
    ///
    /// The ledger's `AddExpense` is the validating entry point; this exists for
    /// callers that feed the settlement engine directly.
    pub fn new(
        id: ExpenseId,
        description: impl Into<String>,
        amount: Money,
        paid_by: ParticipantId,
        split_between: Vec<ParticipantId>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
            paid_by,
            split_between,
            recorded_at,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_by(&self) -> ParticipantId {
        self.paid_by
    }

    pub fn split_between(&self) -> &[ParticipantId] {
        &self.split_between
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Rounded per-person share (`round2(amount / |split|)`).
    pub fn per_person(&self) -> Money {
        self.amount.split(self.split_between.len())
    }

    /// Whether `participant` pays for or shares this expense.
    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.paid_by == participant || self.split_between.contains(&participant)
    }

    /// Expense as it stands after `removed` leaves the session, or `None` if
    /// nobody is left to share it.
    pub(crate) fn without(&self, removed: ParticipantId, reassign_to: ParticipantId) -> Option<Expense> {
        let split_between: Vec<ParticipantId> = self
            .split_between
            .iter()
            .copied()
            .filter(|p| *p != removed)
            .collect();
        if split_between.is_empty() {
            return None;
        }

        let paid_by = if self.paid_by == removed {
            reassign_to
        } else {
            self.paid_by
        };

        Some(Expense {
            paid_by,
            split_between,
            ..self.clone()
        })
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
