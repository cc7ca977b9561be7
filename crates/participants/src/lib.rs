//! Participant registry (ordered roster of the people sharing expenses).
//!
//! Pure domain logic only: the registry decides and applies roster changes; the
//! session routes the resulting events into the expense ledger.

pub mod registry;

pub use registry::{
    AddParticipant, Participant, ParticipantAdded, ParticipantRegistry, ParticipantRemoved,
    ParticipantRenamed, RegistryCommand, RegistryEvent, RemoveParticipant, RenameParticipant,
    RosterPolicy,
};
