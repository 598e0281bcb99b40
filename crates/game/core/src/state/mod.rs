//! Participant state owned by an encounter.
//!
//! The [`Roster`] holds every participant admitted to an encounter, in
//! admission order. Status transitions happen through the resolver and the
//! lifecycle; hosts read the roster through snapshots.
pub mod types;

pub use types::{
    CombatStats, DamageRange, EncounterId, EquipSlot, Equipment, EquipmentSlotError, HitPoints,
    Inventory, ItemId, Participant, ParticipantError, ParticipantId, ParticipantSpec, SideId,
    Status, TurnId,
};

/// Participants of one encounter, in admission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Returns the participant only if it is still active.
    pub fn active(&self, id: ParticipantId) -> Option<&Participant> {
        self.get(id).filter(|p| p.is_active())
    }

    pub fn is_active(&self, id: ParticipantId) -> bool {
        self.active(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn active_ids(&self) -> Vec<ParticipantId> {
        self.iter_active().map(|p| p.id).collect()
    }

    /// Position of the participant in admission order. Used as the initiative
    /// tie-break.
    pub fn admission_index(&self, id: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    pub(crate) fn insert(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    pub(crate) fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        let index = self.admission_index(id)?;
        Some(self.participants.remove(index))
    }
}

impl FromIterator<Participant> for Roster {
    fn from_iter<I: IntoIterator<Item = Participant>>(iter: I) -> Self {
        Self {
            participants: iter.into_iter().collect(),
        }
    }
}
