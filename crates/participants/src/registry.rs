use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabshare_core::{Aggregate, AggregateRoot, DomainError, Entity, ParticipantId, SessionId};
use tabshare_events::Event;

/// A person taking part in the session.
///
/// Identity is the `id`; the name is a free-form label that may be empty or
/// shared with another participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Roster limits and default naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPolicy {
    pub max_participants: usize,
    /// Auto-generated names are `"{name_prefix} {n}"`.
    pub name_prefix: String,
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            max_participants: 20,
            name_prefix: "Person".to_string(),
        }
    }
}

/// Aggregate root: the ordered participant list of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRegistry {
    session_id: SessionId,
    policy: RosterPolicy,
    participants: Vec<Participant>,
    /// Number used for the next auto-generated name; never reused.
    next_number: u32,
    version: u64,
}

impl ParticipantRegistry {
    /// Empty registry; the session seeds it through `AddParticipant` commands.
    pub fn empty(session_id: SessionId, policy: RosterPolicy) -> Self {
        Self {
            session_id,
            policy,
            participants: Vec::new(),
            next_number: 1,
            version: 0,
        }
    }

    pub fn policy(&self) -> &RosterPolicy {
        &self.policy
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.policy.max_participants
    }

    pub fn first(&self) -> Option<&Participant> {
        self.participants.first()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn position(&self, id: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.get(id).is_some()
    }

    /// Participant ids in roster order.
    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// Display name for `id`, if the participant exists.
    pub fn name_of(&self, id: ParticipantId) -> Option<&str> {
        self.get(id).map(Participant::name)
    }

    /// Name the next `AddParticipant` will assign.
    pub fn next_default_name(&self) -> String {
        format!("{} {}", self.policy.name_prefix, self.next_number)
    }
}

impl AggregateRoot for ParticipantRegistry {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.session_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddParticipant (auto-named).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddParticipant {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveParticipant (by roster position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveParticipant {
    pub session_id: SessionId,
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RenameParticipant (by roster position). Any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameParticipant {
    pub session_id: SessionId,
    pub index: usize,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCommand {
    AddParticipant(AddParticipant),
    RemoveParticipant(RemoveParticipant),
    RenameParticipant(RenameParticipant),
}

/// Event: ParticipantAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAdded {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub name: String,
    /// Counter value consumed by this participant's default name.
    pub number: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantRemoved.
///
/// `new_first` is the participant at position 0 once the removal is applied;
/// expenses paid by the removed participant are reassigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRemoved {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub index: usize,
    pub name: String,
    pub new_first: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantRenamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRenamed {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
    pub old_name: String,
    pub new_name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    ParticipantAdded(ParticipantAdded),
    ParticipantRemoved(ParticipantRemoved),
    ParticipantRenamed(ParticipantRenamed),
}

impl Event for RegistryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RegistryEvent::ParticipantAdded(_) => "participants.registry.added",
            RegistryEvent::ParticipantRemoved(_) => "participants.registry.removed",
            RegistryEvent::ParticipantRenamed(_) => "participants.registry.renamed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RegistryEvent::ParticipantAdded(e) => e.occurred_at,
            RegistryEvent::ParticipantRemoved(e) => e.occurred_at,
            RegistryEvent::ParticipantRenamed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ParticipantRegistry {
    type Command = RegistryCommand;
    type Event = RegistryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RegistryEvent::ParticipantAdded(e) => {
                self.participants
                    .push(Participant::new(e.participant_id, e.name.clone()));
                self.next_number = self.next_number.max(e.number + 1);
            }
            RegistryEvent::ParticipantRemoved(e) => {
                self.participants.retain(|p| p.id != e.participant_id);
            }
            RegistryEvent::ParticipantRenamed(e) => {
                if let Some(p) = self
                    .participants
                    .iter_mut()
                    .find(|p| p.id == e.participant_id)
                {
                    p.name = e.new_name.clone();
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RegistryCommand::AddParticipant(cmd) => self.handle_add(cmd),
            RegistryCommand::RemoveParticipant(cmd) => self.handle_remove(cmd),
            RegistryCommand::RenameParticipant(cmd) => self.handle_rename(cmd),
        }
    }
}

impl ParticipantRegistry {
    fn ensure_session(&self, session_id: SessionId) -> Result<(), DomainError> {
        if self.session_id != session_id {
            return Err(DomainError::invariant("session mismatch"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddParticipant) -> Result<Vec<RegistryEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        if self.is_full() {
            return Err(DomainError::limit_reached(format!(
                "at most {} participants",
                self.policy.max_participants
            )));
        }
        if self.contains(cmd.participant_id) {
            return Err(DomainError::invariant("participant id already registered"));
        }

        Ok(vec![RegistryEvent::ParticipantAdded(ParticipantAdded {
            session_id: cmd.session_id,
            participant_id: cmd.participant_id,
            name: self.next_default_name(),
            number: self.next_number,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveParticipant) -> Result<Vec<RegistryEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        if self.participants.len() <= 1 {
            return Err(DomainError::invariant("cannot remove the last participant"));
        }
        let removed = self
            .at(cmd.index)
            .ok_or_else(|| DomainError::not_found(format!("participant at index {}", cmd.index)))?;

        // len > 1, so some other participant becomes first.
        let new_first = self
            .participants
            .iter()
            .find(|p| p.id != removed.id)
            .map(|p| p.id)
            .ok_or_else(|| DomainError::invariant("no participant left after removal"))?;

        Ok(vec![RegistryEvent::ParticipantRemoved(ParticipantRemoved {
            session_id: cmd.session_id,
            participant_id: removed.id,
            index: cmd.index,
            name: removed.name.clone(),
            new_first,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_rename(&self, cmd: &RenameParticipant) -> Result<Vec<RegistryEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        let target = self
            .at(cmd.index)
            .ok_or_else(|| DomainError::not_found(format!("participant at index {}", cmd.index)))?;

        Ok(vec![RegistryEvent::ParticipantRenamed(ParticipantRenamed {
            session_id: cmd.session_id,
            participant_id: target.id,
            old_name: target.name.clone(),
            new_name: cmd.name.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tabshare_events::execute;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn registry_with(count: usize) -> ParticipantRegistry {
        let mut registry = ParticipantRegistry::empty(SessionId::new(), RosterPolicy::default());
        for _ in 0..count {
            add(&mut registry).unwrap();
        }
        registry
    }

    fn add(registry: &mut ParticipantRegistry) -> Result<Vec<RegistryEvent>, DomainError> {
        let cmd = AddParticipant {
            session_id: *registry.id(),
            participant_id: ParticipantId::new(),
            occurred_at: test_time(),
        };
        execute(registry, &RegistryCommand::AddParticipant(cmd))
    }

    fn remove(registry: &mut ParticipantRegistry, index: usize) -> Result<Vec<RegistryEvent>, DomainError> {
        let cmd = RemoveParticipant {
            session_id: *registry.id(),
            index,
            occurred_at: test_time(),
        };
        execute(registry, &RegistryCommand::RemoveParticipant(cmd))
    }

    fn rename(
        registry: &mut ParticipantRegistry,
        index: usize,
        name: &str,
    ) -> Result<Vec<RegistryEvent>, DomainError> {
        let cmd = RenameParticipant {
            session_id: *registry.id(),
            index,
            name: name.to_string(),
            occurred_at: test_time(),
        };
        execute(registry, &RegistryCommand::RenameParticipant(cmd))
    }

    fn names(registry: &ParticipantRegistry) -> Vec<&str> {
        registry.participants().iter().map(Participant::name).collect()
    }

    #[test]
    fn add_assigns_sequential_default_names() {
        let registry = registry_with(3);
        assert_eq!(names(&registry), vec!["Person 1", "Person 2", "Person 3"]);
    }

    #[test]
    fn default_name_counter_is_not_reused_after_removal() {
        let mut registry = registry_with(3);
        remove(&mut registry, 2).unwrap();
        add(&mut registry).unwrap();

        assert_eq!(names(&registry), vec!["Person 1", "Person 2", "Person 4"]);
    }

    #[test]
    fn add_is_rejected_at_the_cap() {
        let mut registry = registry_with(20);
        let version = registry.version();

        let err = add(&mut registry).unwrap_err();
        assert!(matches!(err, DomainError::LimitReached(_)));
        assert_eq!(registry.len(), 20);
        assert_eq!(registry.version(), version);
    }

    #[test]
    fn removing_the_last_participant_is_rejected() {
        let mut registry = registry_with(1);
        let err = remove(&mut registry, 0).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_out_of_range_is_not_found() {
        let mut registry = registry_with(2);
        assert!(matches!(remove(&mut registry, 5), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn removing_the_head_reports_the_next_participant_as_new_first() {
        let mut registry = registry_with(3);
        let second = *registry.at(1).unwrap().id();

        let events = remove(&mut registry, 0).unwrap();
        match &events[0] {
            RegistryEvent::ParticipantRemoved(e) => {
                assert_eq!(e.name, "Person 1");
                assert_eq!(e.new_first, second);
            }
            _ => panic!("Expected ParticipantRemoved event"),
        }
        assert_eq!(*registry.first().unwrap().id(), second);
    }

    #[test]
    fn rename_accepts_empty_and_duplicate_names() {
        let mut registry = registry_with(2);
        let first = *registry.at(0).unwrap().id();

        rename(&mut registry, 0, "").unwrap();
        assert_eq!(registry.name_of(first), Some(""));

        rename(&mut registry, 0, "Person 2").unwrap();
        assert_eq!(names(&registry), vec!["Person 2", "Person 2"]);
        assert_ne!(*registry.at(0).unwrap().id(), *registry.at(1).unwrap().id());
    }

    #[test]
    fn rename_out_of_range_is_not_found() {
        let mut registry = registry_with(1);
        assert!(matches!(rename(&mut registry, 1, "X"), Err(DomainError::NotFound(_))));
        assert_eq!(names(&registry), vec!["Person 1"]);
    }

    #[test]
    fn handle_rejects_foreign_session() {
        let registry = registry_with(1);
        let cmd = RegistryCommand::AddParticipant(AddParticipant {
            session_id: SessionId::new(),
            participant_id: ParticipantId::new(),
            occurred_at: test_time(),
        });
        assert!(matches!(registry.handle(&cmd), Err(DomainError::InvariantViolation(_))));
    }

    proptest! {
        /// Property: whatever sequence of adds and removals is applied, the
        /// roster stays within 1..=cap and default names never repeat.
        #[test]
        fn roster_stays_bounded_and_names_unique(ops in prop::collection::vec(any::<(bool, u8)>(), 1..80)) {
            let mut registry = registry_with(1);
            let mut seen = std::collections::HashSet::new();
            seen.insert("Person 1".to_string());

            for (is_add, index) in ops {
                if is_add {
                    if let Ok(events) = add(&mut registry) {
                        if let RegistryEvent::ParticipantAdded(e) = &events[0] {
                            prop_assert!(seen.insert(e.name.clone()));
                        }
                    }
                } else {
                    let _ = remove(&mut registry, index as usize % 24);
                }
                prop_assert!(registry.len() >= 1);
                prop_assert!(registry.len() <= 20);
            }
        }
    }
}
