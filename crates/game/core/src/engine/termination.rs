//! Termination policies and end-of-encounter summaries.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::TerminationKind;
use crate::state::{ParticipantId, Roster};

/// Decides whether the roster still holds a fight.
pub trait TerminationPolicy: Send + Sync {
    /// Returns true once the encounter should end.
    fn is_over(&self, roster: &Roster) -> bool;

    fn name(&self) -> &'static str;
}

/// Ends when fewer than two participants remain active.
#[derive(Clone, Copy, Debug, Default)]
pub struct LastStanding;

impl TerminationPolicy for LastStanding {
    fn is_over(&self, roster: &Roster) -> bool {
        roster.active_count() < 2
    }

    fn name(&self) -> &'static str {
        "last_standing"
    }
}

/// Ends when every active participant fights for the same side.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpposingSides;

impl TerminationPolicy for OpposingSides {
    fn is_over(&self, roster: &Roster) -> bool {
        let sides: BTreeSet<_> = roster.iter_active().map(|p| p.side).collect();
        sides.len() < 2
    }

    fn name(&self) -> &'static str {
        "opposing_sides"
    }
}

impl From<TerminationKind> for Box<dyn TerminationPolicy> {
    fn from(kind: TerminationKind) -> Self {
        match kind {
            TerminationKind::LastStanding => Box::new(LastStanding),
            TerminationKind::OpposingSides => Box::new(OpposingSides),
        }
    }
}

/// Why an encounter ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EndReason {
    /// The last status change before the end was this participant's defeat.
    Defeated {
        participant: ParticipantId,
        name: String,
    },
    Fled {
        participant: ParticipantId,
        name: String,
    },
    Left {
        participant: ParticipantId,
        name: String,
    },
    /// Every active participant disengaged.
    AllDisengaged,
    /// The policy holds without a single triggering participant.
    NoOpponents,
    /// Ended explicitly by the host.
    Stopped,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defeated { name, .. } => write!(f, "{name} defeated"),
            Self::Fled { name, .. } => write!(f, "{name} fled"),
            Self::Left { name, .. } => write!(f, "{name} left"),
            Self::AllDisengaged => f.write_str("all participants disengaged"),
            Self::NoOpponents => f.write_str("no opponents remain"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

/// Final state handed to hosts when an encounter ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSummary {
    pub reason: EndReason,
    /// Participants still active at the end.
    pub survivors: Vec<ParticipantId>,
    /// Round in progress when the encounter ended. Zero if it never started.
    pub rounds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StatBlock;
    use crate::state::{HitPoints, Participant, ParticipantSpec, SideId, Status};

    fn roster(sides: &[(u64, u32, Status)]) -> Roster {
        let block = StatBlock {
            hit_points: HitPoints::full(10),
            accuracy: 0,
            defense: 0,
            damage_min: 1,
            damage_max: 1,
            initiative_mod: 0,
        };
        sides
            .iter()
            .map(|&(id, side, status)| {
                let spec = ParticipantSpec::new(ParticipantId(id), "x").with_side(SideId(side));
                let mut participant = Participant::new(&spec, &block).unwrap();
                participant.status = status;
                participant
            })
            .collect()
    }

    #[test]
    fn last_standing_counts_active_only() {
        let two = roster(&[(1, 0, Status::Active), (2, 0, Status::Active)]);
        assert!(!LastStanding.is_over(&two));
        let one = roster(&[(1, 0, Status::Active), (2, 0, Status::Fled)]);
        assert!(LastStanding.is_over(&one));
    }

    #[test]
    fn opposing_sides_ignores_allies() {
        let allies = roster(&[
            (1, 1, Status::Active),
            (2, 1, Status::Active),
            (3, 2, Status::Defeated),
        ]);
        assert!(OpposingSides.is_over(&allies));
        assert!(!LastStanding.is_over(&allies));
    }

    #[test]
    fn defeat_reason_names_participant() {
        let reason = EndReason::Defeated {
            participant: ParticipantId(2),
            name: "B".into(),
        };
        assert_eq!(reason.to_string(), "B defeated");
    }
}
