use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabshare_core::{
    Aggregate, AggregateRoot, DomainError, ExpenseId, Money, ParticipantId, SessionId,
};
use tabshare_events::Event;

use crate::expense::Expense;

/// Aggregate root: the session's expense records, in creation order.
///
/// The ledger does not hold balances; settlements are always derived from
/// `expenses()` by the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLedger {
    session_id: SessionId,
    expenses: Vec<Expense>,
    version: u64,
}

impl ExpenseLedger {
    pub fn empty(session_id: SessionId) -> Self {
        Self {
            session_id,
            expenses: Vec::new(),
            version: 0,
        }
    }

    /// Expenses in creation order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

impl AggregateRoot for ExpenseLedger {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.session_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddExpense (raw user input; validated by the ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExpense {
    pub session_id: SessionId,
    pub expense_id: ExpenseId,
    pub description: String,
    /// Amount text as entered; must parse to a positive decimal.
    pub amount: String,
    pub paid_by: Option<ParticipantId>,
    pub split_between: Vec<ParticipantId>,
    /// Current participants; payer and split members must be among them.
    pub roster: Vec<ParticipantId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteExpense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteExpense {
    pub session_id: SessionId,
    pub expense_id: ExpenseId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: StrikeParticipant (removal cascade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeParticipant {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    /// New payer for expenses the removed participant paid.
    pub reassign_to: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddExpense(AddExpense),
    DeleteExpense(DeleteExpense),
    StrikeParticipant(StrikeParticipant),
}

/// Event: ExpenseAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAdded {
    pub session_id: SessionId,
    pub expense: Expense,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDeleted {
    pub session_id: SessionId,
    pub expense_id: ExpenseId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantStruck.
///
/// `reassigned` lists expenses whose payer moved to `reassign_to`; `pruned`
/// lists expenses deleted because nobody was left to share them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStruck {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub reassign_to: ParticipantId,
    pub reassigned: Vec<ExpenseId>,
    pub pruned: Vec<ExpenseId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    ExpenseAdded(ExpenseAdded),
    ExpenseDeleted(ExpenseDeleted),
    ParticipantStruck(ParticipantStruck),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ExpenseAdded(_) => "ledger.expense.added",
            LedgerEvent::ExpenseDeleted(_) => "ledger.expense.deleted",
            LedgerEvent::ParticipantStruck(_) => "ledger.participant.struck",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ExpenseAdded(e) => e.occurred_at,
            LedgerEvent::ExpenseDeleted(e) => e.occurred_at,
            LedgerEvent::ParticipantStruck(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ExpenseLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::ExpenseAdded(e) => {
                self.expenses.push(e.expense.clone());
            }
            LedgerEvent::ExpenseDeleted(e) => {
                self.expenses.retain(|x| x.id != e.expense_id);
            }
            LedgerEvent::ParticipantStruck(e) => {
                self.expenses = self
                    .expenses
                    .iter()
                    .filter_map(|x| x.without(e.participant_id, e.reassign_to))
                    .collect();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddExpense(cmd) => self.handle_add(cmd),
            LedgerCommand::DeleteExpense(cmd) => self.handle_delete(cmd),
            LedgerCommand::StrikeParticipant(cmd) => self.handle_strike(cmd),
        }
    }
}

impl ExpenseLedger {
    fn ensure_session(&self, session_id: SessionId) -> Result<(), DomainError> {
        if self.session_id != session_id {
            return Err(DomainError::invariant("session mismatch"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddExpense) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        if cmd.description.is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }
        let amount = Money::parse_positive(&cmd.amount)?;

        let paid_by = cmd
            .paid_by
            .ok_or_else(|| DomainError::validation("payer must be set"))?;
        if !cmd.roster.contains(&paid_by) {
            return Err(DomainError::not_found(format!("payer {paid_by}")));
        }

        let mut split_between: Vec<ParticipantId> = Vec::with_capacity(cmd.split_between.len());
        for member in &cmd.split_between {
            if !cmd.roster.contains(member) {
                return Err(DomainError::not_found(format!("split member {member}")));
            }
            if !split_between.contains(member) {
                split_between.push(*member);
            }
        }
        if split_between.is_empty() {
            return Err(DomainError::validation("expense must be split between someone"));
        }

        if self.get(cmd.expense_id).is_some() {
            return Err(DomainError::invariant("expense id already recorded"));
        }

        Ok(vec![LedgerEvent::ExpenseAdded(ExpenseAdded {
            session_id: cmd.session_id,
            expense: Expense::new(
                cmd.expense_id,
                cmd.description.clone(),
                amount,
                paid_by,
                split_between,
                cmd.occurred_at,
            ),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteExpense) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        if self.get(cmd.expense_id).is_none() {
            return Err(DomainError::not_found(format!("expense {}", cmd.expense_id)));
        }

        Ok(vec![LedgerEvent::ExpenseDeleted(ExpenseDeleted {
            session_id: cmd.session_id,
            expense_id: cmd.expense_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    /// Emits nothing when no expense involves the participant.
    fn handle_strike(&self, cmd: &StrikeParticipant) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        if cmd.participant_id == cmd.reassign_to {
            return Err(DomainError::invariant("cannot reassign to the removed participant"));
        }

        let involved: Vec<&Expense> = self
            .expenses
            .iter()
            .filter(|e| e.involves(cmd.participant_id))
            .collect();
        if involved.is_empty() {
            return Ok(Vec::new());
        }

        let mut reassigned = Vec::new();
        let mut pruned = Vec::new();
        for expense in involved {
            match expense.without(cmd.participant_id, cmd.reassign_to) {
                None => pruned.push(expense.id),
                Some(_) if expense.paid_by == cmd.participant_id => reassigned.push(expense.id),
                Some(_) => {}
            }
        }

        Ok(vec![LedgerEvent::ParticipantStruck(ParticipantStruck {
            session_id: cmd.session_id,
            participant_id: cmd.participant_id,
            reassign_to: cmd.reassign_to,
            reassigned,
            pruned,
            occurred_at: cmd.occurred_at,
        })])
    }
}
