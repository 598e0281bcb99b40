//! Roster loader.
//!
//! A roster lists the participants of an encounter together with the stat
//! block the host would report for them and who controls them.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::{ParticipantSpec, StatBlock};

use crate::loaders::{LoadResult, read_file};

/// Who decides a participant's actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerSpec {
    /// Attacks the weakest opponent.
    #[default]
    Aggressive,
    /// Always defends.
    Passive,
    /// No provider; the default action applies on every timeout.
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub participant: ParticipantSpec,
    pub stats: StatBlock,
    #[serde(default)]
    pub controller: ControllerSpec,
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `Vec<RosterEntry>`
    pub fn load(path: &Path) -> LoadResult<Vec<RosterEntry>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<RosterEntry>> {
        let entries: Vec<RosterEntry> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut seen = HashSet::new();
        for entry in &entries {
            let id = entry.participant.id;
            if !seen.insert(id) {
                anyhow::bail!("Duplicate participant {} in roster", id);
            }
            entry
                .stats
                .validate(id)
                .map_err(|e| anyhow::anyhow!("Invalid stats for '{}': {}", entry.participant.name, e))?;
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{EquipSlot, HitPoints, ItemId, ParticipantId, SideId};

    use super::*;

    const ROSTER: &str = r#"
[
    (
        participant: (
            id: ParticipantId(1),
            name: "Aldric",
            side: SideId(1),
            inventory: [ItemId(1), ItemId(3)],
            equipped: [(MainHand, ItemId(1))],
        ),
        stats: (
            hit_points: (current: 20, max: 20),
            accuracy: 80,
            defense: 10,
            damage_min: 5,
            damage_max: 10,
            initiative_mod: 2,
        ),
    ),
    (
        participant: (id: ParticipantId(2), name: "Brute"),
        stats: (
            hit_points: (current: 15, max: 15),
            accuracy: 60,
            defense: 10,
            damage_min: 2,
            damage_max: 6,
            initiative_mod: 0,
        ),
        controller: Passive,
    ),
]
"#;

    #[test]
    fn parses_entries_with_defaults() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        assert_eq!(roster.len(), 2);

        let aldric = &roster[0];
        assert_eq!(aldric.participant.side, SideId(1));
        assert_eq!(aldric.participant.equipped, vec![(EquipSlot::MainHand, ItemId(1))]);
        assert_eq!(aldric.stats.hit_points, HitPoints::full(20));
        assert_eq!(aldric.controller, ControllerSpec::Aggressive);

        let brute = &roster[1];
        assert_eq!(brute.participant.id, ParticipantId(2));
        assert_eq!(brute.participant.side, SideId::default());
        assert!(brute.participant.inventory.is_empty());
        assert_eq!(brute.controller, ControllerSpec::Passive);
    }

    #[test]
    fn inverted_damage_range_is_rejected() {
        let content = r#"[(
            participant: (id: ParticipantId(1), name: "Odd"),
            stats: (
                hit_points: (current: 5, max: 5),
                accuracy: 1, defense: 1, damage_min: 9, damage_max: 2, initiative_mod: 0,
            ),
        )]"#;
        let err = RosterLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("Odd"));
    }

    #[test]
    fn duplicate_participants_are_rejected() {
        let entry = r#"(
            participant: (id: ParticipantId(4), name: "Twin"),
            stats: (
                hit_points: (current: 5, max: 5),
                accuracy: 1, defense: 1, damage_min: 1, damage_max: 2, initiative_mod: 0,
            ),
        )"#;
        let content = format!("[{entry}, {entry}]");
        assert!(RosterLoader::parse(&content).is_err());
    }
}
