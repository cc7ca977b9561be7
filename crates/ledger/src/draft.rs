//! Pending-expense draft: the values being entered for the next expense.

use serde::{Deserialize, Serialize};

use tabshare_core::ParticipantId;

/// Form state for the next expense.
///
/// The draft is deliberately permissive (raw amount text, optional payer,
/// possibly empty split); the ledger validates on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub description: String,
    /// Raw amount text as typed.
    pub amount: String,
    pub paid_by: Option<ParticipantId>,
    pub split_between: Vec<ParticipantId>,
}

impl ExpenseDraft {
    /// Fresh draft: paid by the first participant, shared by everyone.
    pub fn seeded(roster: &[ParticipantId]) -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            paid_by: roster.first().copied(),
            split_between: roster.to_vec(),
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn set_paid_by(&mut self, participant: ParticipantId) {
        self.paid_by = Some(participant);
    }

    /// Add `participant` to the split if absent, remove it if present.
    pub fn toggle(&mut self, participant: ParticipantId) {
        if let Some(pos) = self.split_between.iter().position(|p| *p == participant) {
            self.split_between.remove(pos);
        } else {
            self.split_between.push(participant);
        }
    }

    /// Split between everyone in `roster`, in roster order.
    pub fn select_all(&mut self, roster: &[ParticipantId]) {
        self.split_between = roster.to_vec();
    }

    pub fn deselect_all(&mut self) {
        self.split_between.clear();
    }

    pub fn includes(&self, participant: ParticipantId) -> bool {
        self.split_between.contains(&participant)
    }

    /// Same presence check the ledger applies before parsing the amount.
    pub fn is_submittable(&self) -> bool {
        !self.description.is_empty()
            && !self.amount.is_empty()
            && self.paid_by.is_some()
            && !self.split_between.is_empty()
    }

    /// Clear description and amount; payer and split seed the next entry.
    pub fn reset_after_submit(&mut self) {
        self.description.clear();
        self.amount.clear();
    }

    /// Apply the removal cascade: reassign the payer, strike from the split.
    pub fn participant_removed(&mut self, removed: ParticipantId, new_first: ParticipantId) {
        if self.paid_by == Some(removed) {
            self.paid_by = Some(new_first);
        }
        self.split_between.retain(|p| *p != removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|_| ParticipantId::new()).collect()
    }

    #[test]
    fn seeded_draft_is_paid_by_first_and_split_by_all() {
        let ids = roster(3);
        let draft = ExpenseDraft::seeded(&ids);
        assert_eq!(draft.paid_by, Some(ids[0]));
        assert_eq!(draft.split_between, ids);
        assert!(!draft.is_submittable());
    }

    #[test]
    fn toggle_removes_then_appends() {
        let ids = roster(3);
        let mut draft = ExpenseDraft::seeded(&ids);

        draft.toggle(ids[0]);
        assert_eq!(draft.split_between, vec![ids[1], ids[2]]);

        draft.toggle(ids[0]);
        assert_eq!(draft.split_between, vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn select_and_deselect_all() {
        let ids = roster(4);
        let mut draft = ExpenseDraft::default();

        draft.select_all(&ids);
        assert_eq!(draft.split_between, ids);

        draft.deselect_all();
        assert!(draft.split_between.is_empty());
    }

    #[test]
    fn submittable_requires_every_field() {
        let ids = roster(2);
        let mut draft = ExpenseDraft::seeded(&ids);
        draft.set_description("Dinner");
        assert!(!draft.is_submittable());

        draft.set_amount("40");
        assert!(draft.is_submittable());

        draft.deselect_all();
        assert!(!draft.is_submittable());
    }

    #[test]
    fn reset_after_submit_keeps_payer_and_split() {
        let ids = roster(3);
        let mut draft = ExpenseDraft::seeded(&ids);
        draft.set_description("Taxi");
        draft.set_amount("12");
        draft.set_paid_by(ids[2]);
        draft.toggle(ids[1]);

        draft.reset_after_submit();

        assert_eq!(draft.description, "");
        assert_eq!(draft.amount, "");
        assert_eq!(draft.paid_by, Some(ids[2]));
        assert_eq!(draft.split_between, vec![ids[0], ids[2]]);
    }

    #[test]
    fn removal_cascade_reassigns_payer_and_strikes_split() {
        let ids = roster(3);
        let mut draft = ExpenseDraft::seeded(&ids);

        draft.participant_removed(ids[0], ids[1]);

        assert_eq!(draft.paid_by, Some(ids[1]));
        assert_eq!(draft.split_between, vec![ids[1], ids[2]]);
    }
}
