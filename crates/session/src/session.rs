use std::sync::Arc;

use chrono::Utc;

use tabshare_core::{
    Aggregate, DomainError, DomainResult, Entity, ExpenseId, Money, ParticipantId, SessionId,
};
use tabshare_events::{Event, EventBus, InMemoryEventBus, Subscription, execute};
use tabshare_ledger::{
    AddExpense, DeleteExpense, Expense, ExpenseDraft, ExpenseLedger, LedgerCommand, LedgerEvent,
    StrikeParticipant,
};
use tabshare_participants::{
    AddParticipant, Participant, ParticipantRegistry, RegistryCommand, RegistryEvent,
    RemoveParticipant, RenameParticipant,
};
use tabshare_settlement::{NetDebt, breakdown, compute_settlements, total_amount};

use crate::config::SessionConfig;
use crate::event::{SessionCommand, SessionEvent};
use crate::view::{ExpenseView, NamedParticipant, NamedShare, SessionSnapshot, SettlementView};

/// One shared-expense session.
///
/// Owns the roster, the ledger and the pending draft. All state changes go
/// through [`Session::dispatch`]; derived values (settlements, totals) are
/// recomputed from current state on every read.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    registry: ParticipantRegistry,
    ledger: ExpenseLedger,
    draft: ExpenseDraft,
    bus: Option<Arc<InMemoryEventBus<SessionEvent>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Start a session seeded with `config.initial_participants` default-named
    /// participants and a draft paid by the first of them, shared by all.
    pub fn new(config: SessionConfig) -> Self {
        let id = SessionId::new();
        let mut session = Self {
            id,
            registry: ParticipantRegistry::empty(id, config.roster_policy()),
            ledger: ExpenseLedger::empty(id),
            draft: ExpenseDraft::default(),
            bus: None,
            config,
        };

        for _ in 0..session.config.seed_count() {
            if let Err(err) = session.dispatch(SessionCommand::AddParticipant) {
                tracing::warn!(error = %err, "failed to seed participant");
                break;
            }
        }
        session.draft = ExpenseDraft::seeded(&session.registry.ids());

        tracing::debug!(
            session_id = %session.id,
            participants = session.registry.len(),
            "session started"
        );
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &ExpenseLedger {
        &self.ledger
    }

    pub fn participants(&self) -> &[Participant] {
        self.registry.participants()
    }

    pub fn expenses(&self) -> &[Expense] {
        self.ledger.expenses()
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    /// Look a participant up by exact name; the first match wins.
    pub fn participant_named(&self, name: &str) -> Option<&Participant> {
        self.participants().iter().find(|p| p.name() == name)
    }

    /// Subscribe to every event this session applies from now on.
    pub fn subscribe(&mut self) -> Subscription<SessionEvent> {
        self.bus
            .get_or_insert_with(|| Arc::new(InMemoryEventBus::new()))
            .subscribe()
    }

    /// Apply a command, including any cascade it triggers.
    ///
    /// On rejection nothing changes and the error explains why. On success
    /// the returned events are already applied and published.
    pub fn dispatch(&mut self, command: SessionCommand) -> DomainResult<Vec<SessionEvent>> {
        let occurred_at = Utc::now();
        let session_id = self.id;

        let events = match command {
            SessionCommand::AddParticipant => {
                let cmd = RegistryCommand::AddParticipant(AddParticipant {
                    session_id,
                    participant_id: ParticipantId::new(),
                    occurred_at,
                });
                wrap_registry(execute(&mut self.registry, &cmd)?)
            }
            SessionCommand::RemoveParticipant { index } => {
                let cmd = RegistryCommand::RemoveParticipant(RemoveParticipant {
                    session_id,
                    index,
                    occurred_at,
                });
                self.remove_with_cascade(&cmd)?
            }
            SessionCommand::RenameParticipant { index, name } => {
                let cmd = RegistryCommand::RenameParticipant(RenameParticipant {
                    session_id,
                    index,
                    name,
                    occurred_at,
                });
                wrap_registry(execute(&mut self.registry, &cmd)?)
            }
            SessionCommand::AddExpense {
                description,
                amount,
                paid_by,
                split_between,
            } => {
                let cmd = LedgerCommand::AddExpense(AddExpense {
                    session_id,
                    expense_id: ExpenseId::new(),
                    description,
                    amount,
                    paid_by,
                    split_between,
                    roster: self.registry.ids(),
                    occurred_at,
                });
                let events = execute(&mut self.ledger, &cmd)?;
                for ev in &events {
                    if let LedgerEvent::ExpenseAdded(added) = ev {
                        self.draft.paid_by = Some(added.expense.paid_by());
                        self.draft.split_between = added.expense.split_between().to_vec();
                        self.draft.reset_after_submit();
                    }
                }
                wrap_ledger(events)
            }
            SessionCommand::DeleteExpense { expense_id } => {
                let cmd = LedgerCommand::DeleteExpense(DeleteExpense {
                    session_id,
                    expense_id,
                    occurred_at,
                });
                wrap_ledger(execute(&mut self.ledger, &cmd)?)
            }
        };

        self.publish(&events);
        Ok(events)
    }

    /// Remove a participant and route the removal into the ledger and the
    /// draft before anything else can observe the roster.
    ///
    /// Both the registry and the ledger decide first; nothing is applied
    /// unless every decision succeeds.
    fn remove_with_cascade(&mut self, cmd: &RegistryCommand) -> DomainResult<Vec<SessionEvent>> {
        let removed = self.registry.handle(cmd)?;

        // A removal command yields at most one `ParticipantRemoved`, so every
        // strike is decided against the same ledger state.
        let mut decided = Vec::with_capacity(removed.len());
        for ev in removed {
            let struck = match &ev {
                RegistryEvent::ParticipantRemoved(r) => {
                    let strike = LedgerCommand::StrikeParticipant(StrikeParticipant {
                        session_id: self.id,
                        participant_id: r.participant_id,
                        reassign_to: r.new_first,
                        occurred_at: r.occurred_at,
                    });
                    self.ledger.handle(&strike)?
                }
                _ => Vec::new(),
            };
            decided.push((ev, struck));
        }

        let mut events = Vec::with_capacity(decided.len() * 2);
        for (ev, struck) in decided {
            self.registry.apply(&ev);
            for s in &struck {
                self.ledger.apply(s);
            }
            if let RegistryEvent::ParticipantRemoved(r) = &ev {
                self.draft.participant_removed(r.participant_id, r.new_first);
            }

            events.push(SessionEvent::Registry(ev));
            events.extend(struck.into_iter().map(SessionEvent::Ledger));
        }

        Ok(events)
    }

    fn publish(&self, events: &[SessionEvent]) {
        for ev in events {
            tracing::trace!(session_id = %self.id, event_type = ev.event_type(), "event applied");
            if let Some(bus) = &self.bus {
                let Ok(()) = bus.publish(ev.clone());
            }
        }
    }

    /// Dispatch, turning a rejection into a logged no-op.
    fn try_dispatch(&mut self, command: SessionCommand) -> bool {
        let name = command.name();
        match self.dispatch(command) {
            Ok(_) => true,
            Err(err) => {
                log_rejection(name, &err);
                false
            }
        }
    }

    // Interactive operations: rejected requests leave the session unchanged.

    /// Append a participant named after the next default number. No-op at the cap.
    pub fn add_participant(&mut self) -> bool {
        self.try_dispatch(SessionCommand::AddParticipant)
    }

    /// Remove the participant at `index`. No-op for the last participant or
    /// an out-of-range index.
    pub fn remove_participant(&mut self, index: usize) -> bool {
        self.try_dispatch(SessionCommand::RemoveParticipant { index })
    }

    pub fn rename_participant(&mut self, index: usize, name: impl Into<String>) -> bool {
        self.try_dispatch(SessionCommand::RenameParticipant {
            index,
            name: name.into(),
        })
    }

    pub fn add_expense(
        &mut self,
        description: impl Into<String>,
        amount: impl Into<String>,
        paid_by: Option<ParticipantId>,
        split_between: Vec<ParticipantId>,
    ) -> bool {
        self.try_dispatch(SessionCommand::AddExpense {
            description: description.into(),
            amount: amount.into(),
            paid_by,
            split_between,
        })
    }

    /// Record the draft as an expense. On success description and amount are
    /// cleared while payer and split carry over.
    pub fn submit_draft(&mut self) -> bool {
        let draft = self.draft.clone();
        self.try_dispatch(SessionCommand::AddExpense {
            description: draft.description,
            amount: draft.amount,
            paid_by: draft.paid_by,
            split_between: draft.split_between,
        })
    }

    pub fn delete_expense(&mut self, expense_id: ExpenseId) -> bool {
        self.try_dispatch(SessionCommand::DeleteExpense { expense_id })
    }

    pub fn set_draft_description(&mut self, description: impl Into<String>) {
        self.draft.set_description(description);
    }

    pub fn set_draft_amount(&mut self, amount: impl Into<String>) {
        self.draft.set_amount(amount);
    }

    /// Ignored unless `participant` is on the roster.
    pub fn set_draft_payer(&mut self, participant: ParticipantId) {
        if self.registry.contains(participant) {
            self.draft.set_paid_by(participant);
        } else {
            log_rejection("set_draft_payer", &DomainError::not_found("participant"));
        }
    }

    /// Ignored unless `participant` is on the roster.
    pub fn toggle_split(&mut self, participant: ParticipantId) {
        if self.registry.contains(participant) {
            self.draft.toggle(participant);
        } else {
            log_rejection("toggle_split", &DomainError::not_found("participant"));
        }
    }

    pub fn select_all(&mut self) {
        self.draft.select_all(&self.registry.ids());
    }

    pub fn deselect_all(&mut self) {
        self.draft.deselect_all();
    }

    // Derived views.

    /// Net transfers that settle the session, by participant id.
    pub fn net_debts(&self) -> Vec<NetDebt> {
        compute_settlements(self.ledger.expenses(), &self.registry)
    }

    /// Net transfers with current display names, sorted by debtor then creditor.
    pub fn settlements(&self) -> Vec<SettlementView> {
        self.net_debts()
            .into_iter()
            .map(|d| SettlementView {
                from: self.named(d.from),
                to: self.named(d.to),
                amount: d.amount,
            })
            .collect()
    }

    /// Unrounded sum of every expense amount.
    pub fn total_amount(&self) -> Money {
        total_amount(self.ledger.expenses())
    }

    /// Expenses in entry order, with names and per-person shares.
    pub fn expense_views(&self) -> Vec<ExpenseView> {
        self.ledger
            .expenses()
            .iter()
            .map(|expense| {
                let b = breakdown(expense);
                ExpenseView {
                    id: *expense.id(),
                    description: expense.description().to_string(),
                    amount: expense.amount(),
                    paid_by: self.named(expense.paid_by()),
                    per_person: b.per_person,
                    shares: b
                        .lines
                        .iter()
                        .map(|line| NamedShare {
                            participant: self.named(line.participant),
                            share: line.share,
                        })
                        .collect(),
                    recorded_at: expense.recorded_at(),
                }
            })
            .collect()
    }

    /// Owned, serialisable copy of everything a renderer needs.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            taken_at: Utc::now(),
            participants: self
                .participants()
                .iter()
                .map(|p| NamedParticipant {
                    id: *p.id(),
                    name: p.name().to_string(),
                })
                .collect(),
            expenses: self.expense_views(),
            settlements: self.settlements(),
            total_amount: self.total_amount(),
        }
    }

    fn named(&self, id: ParticipantId) -> NamedParticipant {
        NamedParticipant {
            id,
            name: self.registry.name_of(id).unwrap_or_default().to_string(),
        }
    }
}

fn wrap_registry(events: Vec<RegistryEvent>) -> Vec<SessionEvent> {
    events.into_iter().map(SessionEvent::Registry).collect()
}

fn wrap_ledger(events: Vec<LedgerEvent>) -> Vec<SessionEvent> {
    events.into_iter().map(SessionEvent::Ledger).collect()
}

fn log_rejection(operation: &str, err: &DomainError) {
    tracing::debug!(operation, error = %err, "request ignored");
}
