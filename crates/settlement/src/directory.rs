use std::collections::{BTreeMap, HashMap};

use tabshare_core::ParticipantId;
use tabshare_participants::ParticipantRegistry;

/// Resolves participant ids to display names for ordering and rendering.
pub trait ParticipantDirectory {
    fn display_name(&self, id: ParticipantId) -> Option<&str>;
}

impl ParticipantDirectory for ParticipantRegistry {
    fn display_name(&self, id: ParticipantId) -> Option<&str> {
        self.name_of(id)
    }
}

impl ParticipantDirectory for BTreeMap<ParticipantId, String> {
    fn display_name(&self, id: ParticipantId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

impl ParticipantDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, id: ParticipantId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}
