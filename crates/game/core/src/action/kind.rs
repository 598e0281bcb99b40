//! Action kind enumeration and action requests.

use crate::config::TimeoutAction;
use crate::state::{EquipSlot, ItemId, ParticipantId, TurnId};

/// Types of actions a participant can choose on its turn.
///
/// Dispatch happens in exactly one place: the resolver matches on this enum
/// exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    /// Single-target attack roll.
    Attack { target: ParticipantId },

    /// Raise defense against the next incoming attack.
    Defend,

    /// Attempt to leave the encounter.
    Flee,

    /// Move a carried item into an equipment slot.
    Equip { item: ItemId, slot: EquipSlot },

    /// Move the item in a slot back into the inventory.
    Unequip { slot: EquipSlot },

    /// Consume a carried item. Targets the user when `target` is `None`.
    UseItem {
        item: ItemId,
        target: Option<ParticipantId>,
    },

    /// Signal willingness to stop fighting.
    Disengage,

    /// Do nothing.
    Pass,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn is_equipment_change(&self) -> bool {
        matches!(self, Self::Equip { .. } | Self::Unequip { .. })
    }
}

impl From<TimeoutAction> for ActionKind {
    fn from(action: TimeoutAction) -> Self {
        match action {
            TimeoutAction::Defend => Self::Defend,
            TimeoutAction::Pass => Self::Pass,
            TimeoutAction::Disengage => Self::Disengage,
        }
    }
}

/// An action submitted by a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub actor: ParticipantId,
    pub kind: ActionKind,
    /// Turn the submitter believes is open. When present, a request for any
    /// other turn is rejected as stale.
    pub turn: Option<TurnId>,
}

impl ActionRequest {
    pub fn new(actor: ParticipantId, kind: ActionKind) -> Self {
        Self {
            actor,
            kind,
            turn: None,
        }
    }

    pub fn for_turn(mut self, turn: TurnId) -> Self {
        self.turn = Some(turn);
        self
    }
}
