//! In-memory stat provider implementing [`skirmish_core::StatProvider`].

use std::collections::HashMap;

use skirmish_content::RosterEntry;
use skirmish_core::{ParticipantId, StatBlock, StatError, StatProvider};

/// Stat blocks keyed by participant, fixed for the provider's lifetime.
#[derive(Debug, Clone, Default)]
pub struct StaticStatProvider {
    blocks: HashMap<ParticipantId, StatBlock>,
}

impl StaticStatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the stat blocks of a loaded roster.
    pub fn from_roster(roster: &[RosterEntry]) -> Self {
        roster
            .iter()
            .map(|entry| (entry.participant.id, entry.stats))
            .collect()
    }

    pub fn insert(&mut self, participant: ParticipantId, block: StatBlock) {
        self.blocks.insert(participant, block);
    }

    pub fn with(mut self, participant: ParticipantId, block: StatBlock) -> Self {
        self.insert(participant, block);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<(ParticipantId, StatBlock)> for StaticStatProvider {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, StatBlock)>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl StatProvider for StaticStatProvider {
    fn combat_stats(&self, participant: ParticipantId) -> Result<StatBlock, StatError> {
        self.blocks
            .get(&participant)
            .copied()
            .ok_or(StatError::Unknown(participant))
    }
}
