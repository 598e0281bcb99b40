//! Initiative rolling and turn order.
//!
//! Scores are `1..=initiative_die` plus the participant's initiative
//! modifier. The order sorts by score, highest first; equal scores keep
//! admission order, so a seeded encounter always produces the same order.

use crate::config::EncounterConfig;
use crate::env::{RngOracle, RollContext, compute_seed};
use crate::state::ParticipantId;

/// One participant's place in the initiative order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeEntry {
    pub participant: ParticipantId,
    pub score: i32,
}

/// Roll a single participant's initiative score.
///
/// `nonce` is zero for the opening roll and the current action sequence
/// number for mid-fight joins.
pub fn roll_initiative(
    participant: ParticipantId,
    modifier: i32,
    nonce: u64,
    config: &EncounterConfig,
    rng: &(impl RngOracle + ?Sized),
) -> InitiativeEntry {
    let seed = compute_seed(config.seed, nonce, participant.0, RollContext::Initiative);
    let draw = rng.roll_die(seed, config.initiative_die) as i32;
    InitiativeEntry {
        participant,
        score: draw.saturating_add(modifier),
    }
}

/// Roll the opening order for participants given in admission order as
/// `(id, initiative modifier)` pairs.
pub fn roll_order(
    participants: &[(ParticipantId, i32)],
    config: &EncounterConfig,
    rng: &(impl RngOracle + ?Sized),
) -> InitiativeOrder {
    let mut entries: Vec<InitiativeEntry> = participants
        .iter()
        .map(|&(id, modifier)| roll_initiative(id, modifier, 0, config, rng))
        .collect();
    // stable: ties stay in admission order
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    InitiativeOrder { entries }
}

/// Turn order of an encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitiativeOrder {
    entries: Vec<InitiativeEntry>,
}

impl InitiativeOrder {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InitiativeEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[InitiativeEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.entries.iter().map(|e| e.participant).collect()
    }

    pub fn position(&self, participant: ParticipantId) -> Option<usize> {
        self.entries.iter().position(|e| e.participant == participant)
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.position(participant).is_some()
    }

    /// Inserts a newcomer after every entry with an equal or higher score.
    /// Returns the index it landed at.
    pub fn insert(&mut self, entry: InitiativeEntry) -> usize {
        let index = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, entry);
        index
    }

    /// Drops every entry for which `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(ParticipantId) -> bool) {
        self.entries.retain(|e| keep(e.participant));
    }
}

impl FromIterator<InitiativeEntry> for InitiativeOrder {
    fn from_iter<I: IntoIterator<Item = InitiativeEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
