use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabshare_core::{ExpenseId, ParticipantId};
use tabshare_events::Event;
use tabshare_ledger::LedgerEvent;
use tabshare_participants::RegistryEvent;

/// A request to change the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    AddParticipant,
    RemoveParticipant {
        index: usize,
    },
    RenameParticipant {
        index: usize,
        name: String,
    },
    AddExpense {
        description: String,
        amount: String,
        paid_by: Option<ParticipantId>,
        split_between: Vec<ParticipantId>,
    },
    DeleteExpense {
        expense_id: ExpenseId,
    },
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::AddParticipant => "add_participant",
            SessionCommand::RemoveParticipant { .. } => "remove_participant",
            SessionCommand::RenameParticipant { .. } => "rename_participant",
            SessionCommand::AddExpense { .. } => "add_expense",
            SessionCommand::DeleteExpense { .. } => "delete_expense",
        }
    }
}

/// Everything that happened to a session, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "lowercase")]
pub enum SessionEvent {
    Registry(RegistryEvent),
    Ledger(LedgerEvent),
}

impl Event for SessionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::Registry(e) => e.event_type(),
            SessionEvent::Ledger(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        match self {
            SessionEvent::Registry(e) => e.version(),
            SessionEvent::Ledger(e) => e.version(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::Registry(e) => e.occurred_at(),
            SessionEvent::Ledger(e) => e.occurred_at(),
        }
    }
}
