//! Structured action outcomes.
//!
//! The engine never formats text. Hosts narrate from these values.

use crate::combat::AttackOutcome;
use crate::state::{EquipSlot, HitPoints, ItemId, ParticipantId, Status, TurnId};

/// What an action did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionOutcome {
    Attack {
        target: ParticipantId,
        outcome: AttackOutcome,
        roll: u32,
        hit_chance: u32,
        /// Hit points actually removed from the target.
        damage: u32,
        target_hit_points: HitPoints,
    },
    Defend {
        bonus: i32,
    },
    Flee {
        success: bool,
        roll: u32,
    },
    Equip {
        item: ItemId,
        slot: EquipSlot,
        /// Item that previously occupied the slot, now back in the inventory.
        displaced: Option<ItemId>,
    },
    Unequip {
        item: ItemId,
        slot: EquipSlot,
    },
    UseItem {
        item: ItemId,
        target: ParticipantId,
        healed: u32,
    },
    Disengage,
    Pass,
}

/// A status transition caused by an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusChange {
    pub participant: ParticipantId,
    pub from: Status,
    pub to: Status,
}

/// Resolver output: the outcome plus any status transitions it caused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: ActionOutcome,
    pub status_changes: Vec<StatusChange>,
}

impl Resolution {
    pub fn new(outcome: ActionOutcome) -> Self {
        Self {
            outcome,
            status_changes: Vec::new(),
        }
    }

    pub fn with_change(mut self, change: StatusChange) -> Self {
        self.status_changes.push(change);
        self
    }
}

/// Exactly one of these is produced for every completed turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    pub turn: TurnId,
    pub round: u32,
    pub actor: ParticipantId,
    /// The action was substituted because the decision window elapsed.
    pub timed_out: bool,
    pub outcome: ActionOutcome,
    pub status_changes: Vec<StatusChange>,
}

impl ActionResult {
    /// Participants that became defeated as a result of this action.
    pub fn defeated(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.status_changes
            .iter()
            .filter(|change| change.to == Status::Defeated)
            .map(|change| change.participant)
    }
}
