//! Participants and their combat-relevant state.

use arrayvec::ArrayVec;

use crate::config::EncounterConfig;
use crate::env::{StatBlock, StatError};
use crate::error::{CombatError, ErrorSeverity};

use super::{EquipSlot, Equipment, HitPoints, ItemId, ParticipantId, SideId};

/// Participant status. `Defeated` and `Fled` are terminal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Defeated,
    Fled,
}

impl Status {
    pub fn is_active(self) -> bool {
        matches!(self, Status::Active)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// Inclusive damage range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max,
        }
    }

    /// Shifts both ends by `delta`, flooring at zero.
    pub fn shifted(self, delta: i32) -> Self {
        let shift = |value: u32| value.saturating_add_signed(delta);
        Self::new(shift(self.min), shift(self.max))
    }
}

/// Stats that feed attack resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub accuracy: i32,
    pub defense: i32,
    pub damage: DamageRange,
    pub initiative_mod: i32,
}

impl From<&StatBlock> for CombatStats {
    fn from(block: &StatBlock) -> Self {
        Self {
            accuracy: block.accuracy,
            defense: block.defense,
            damage: DamageRange::new(block.damage_min, block.damage_max),
            initiative_mod: block.initiative_mod,
        }
    }
}

/// Host-supplied description of someone entering an encounter.
///
/// Stats are not carried here; they are read from the
/// [`StatProvider`](crate::env::StatProvider) on admission.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantSpec {
    pub id: ParticipantId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub side: SideId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<ItemId>,
    /// Items equipped on entry. Each must also be in `inventory`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipped: Vec<(EquipSlot, ItemId)>,
}

impl ParticipantSpec {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            side: SideId::default(),
            inventory: Vec::new(),
            equipped: Vec::new(),
        }
    }

    pub fn with_side(mut self, side: SideId) -> Self {
        self.side = side;
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.inventory.extend(items);
        self
    }

    pub fn with_equipped(mut self, slot: EquipSlot, item: ItemId) -> Self {
        self.equipped.push((slot, item));
        self
    }
}

pub type Inventory = ArrayVec<ItemId, { EncounterConfig::MAX_INVENTORY_SLOTS }>;

/// A participant as owned by an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub side: SideId,
    pub hit_points: HitPoints,
    /// Stats from the provider, before equipment.
    pub base: CombatStats,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub status: Status,
    /// Pending defend bonus, consumed by the next incoming attack.
    pub defending: Option<i32>,
    /// Set by the disengage action, cleared by any other action.
    pub disengaged: bool,
}

impl Participant {
    /// Builds a participant from its description and stat block. Initial
    /// equipment is not applied here; it needs the item catalog.
    pub fn new(spec: &ParticipantSpec, block: &StatBlock) -> Result<Self, ParticipantError> {
        block.validate(spec.id)?;

        let mut inventory = Inventory::new();
        for item in &spec.inventory {
            inventory
                .try_push(*item)
                .map_err(|_| ParticipantError::InventoryFull {
                    participant: spec.id,
                    capacity: EncounterConfig::MAX_INVENTORY_SLOTS,
                })?;
        }

        Ok(Self {
            id: spec.id,
            name: spec.name.clone(),
            side: spec.side,
            hit_points: block.hit_points,
            base: CombatStats::from(block),
            equipment: Equipment::empty(),
            inventory,
            status: if block.hit_points.is_depleted() {
                Status::Defeated
            } else {
                Status::Active
            },
            defending: None,
            disengaged: false,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn carries(&self, item: ItemId) -> bool {
        self.inventory.contains(&item)
    }

    /// Removes one copy of `item` from the inventory.
    pub fn take_item(&mut self, item: ItemId) -> bool {
        match self.inventory.iter().position(|held| *held == item) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces base stats with a fresh stat block, keeping current hit points
    /// (clamped to the new maximum).
    pub fn refresh(&mut self, block: &StatBlock) -> Result<(), StatError> {
        block.validate(self.id)?;
        self.base = CombatStats::from(block);
        self.hit_points = self.hit_points.with_max(block.hit_points.max);
        Ok(())
    }

    /// Applies damage and flips status to defeated at zero. Returns the amount removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let removed = self.hit_points.damage(amount);
        if self.hit_points.is_depleted() && self.is_active() {
            self.status = Status::Defeated;
        }
        removed
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParticipantError {
    #[error("participant {participant} carries more than {capacity} items")]
    InventoryFull {
        participant: ParticipantId,
        capacity: usize,
    },

    #[error(transparent)]
    Stats(#[from] StatError),
}

impl CombatError for ParticipantError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InventoryFull { .. } => "PARTICIPANT_INVENTORY_FULL",
            Self::Stats(err) => err.error_code(),
        }
    }
}
