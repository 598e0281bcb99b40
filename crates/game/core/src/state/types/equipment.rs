//! Equipment worn or wielded by a participant.
//!
//! Each slot holds a copy of the equipped item's definition, so the stat
//! contribution of equipment can be computed from the participant alone.

use std::collections::BTreeMap;

use crate::env::{ItemDefinition, ItemModifiers};
use crate::error::{CombatError, ErrorSeverity};
use crate::state::ItemId;

/// Fixed set of equipment slots.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EquipSlot {
    /// Weapon hand.
    MainHand,
    Body,
    ShieldHand,
    Head,
}

/// Equipment state for a participant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, ItemDefinition>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&ItemDefinition> {
        self.slots.get(&slot)
    }

    pub fn weapon(&self) -> Option<&ItemDefinition> {
        self.get(EquipSlot::MainHand)
    }

    pub fn is_equipped(&self, item: ItemId) -> bool {
        self.slots.values().any(|def| def.id == item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &ItemDefinition)> {
        self.slots.iter().map(|(slot, def)| (*slot, def))
    }

    /// Puts an item into a slot, returning the item it displaced.
    ///
    /// Fails if the item does not fit the slot.
    pub fn equip(
        &mut self,
        slot: EquipSlot,
        item: ItemDefinition,
    ) -> Result<Option<ItemDefinition>, EquipmentSlotError> {
        match item.slot() {
            None => Err(EquipmentSlotError::NotEquippable { item: item.id }),
            Some(fits) if fits != slot => Err(EquipmentSlotError::SlotMismatch {
                item: item.id,
                slot,
                fits,
            }),
            Some(_) => Ok(self.slots.insert(slot, item)),
        }
    }

    /// Empties a slot, returning what it held.
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<ItemDefinition, EquipmentSlotError> {
        self.slots
            .remove(&slot)
            .ok_or(EquipmentSlotError::SlotEmpty { slot })
    }

    /// Sum of modifiers of everything equipped.
    pub fn modifiers(&self) -> ItemModifiers {
        self.slots.values().map(ItemDefinition::modifiers).sum()
    }
}

/// Rejected equip or unequip request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentSlotError {
    #[error("{item} is not in the item catalog")]
    UnknownItem { item: ItemId },

    #[error("{item} is not carried by the participant")]
    NotCarried { item: ItemId },

    #[error("{item} fits {fits}, not {slot}")]
    SlotMismatch {
        item: ItemId,
        slot: EquipSlot,
        fits: EquipSlot,
    },

    #[error("{item} cannot be equipped")]
    NotEquippable { item: ItemId },

    #[error("nothing is equipped in {slot}")]
    SlotEmpty { slot: EquipSlot },
}

impl CombatError for EquipmentSlotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem { .. } => "EQUIP_UNKNOWN_ITEM",
            Self::NotCarried { .. } => "EQUIP_NOT_CARRIED",
            Self::SlotMismatch { .. } => "EQUIP_SLOT_MISMATCH",
            Self::NotEquippable { .. } => "EQUIP_NOT_EQUIPPABLE",
            Self::SlotEmpty { .. } => "EQUIP_SLOT_EMPTY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ItemKind;

    fn sword() -> ItemDefinition {
        ItemDefinition::new(ItemId(1), "sword", ItemKind::Weapon(ItemModifiers::weapon(5, 2)))
    }

    fn buckler() -> ItemDefinition {
        ItemDefinition::new(
            ItemId(2),
            "buckler",
            ItemKind::Armor {
                slot: EquipSlot::ShieldHand,
                modifiers: ItemModifiers::armor(4),
            },
        )
    }

    #[test]
    fn equip_rejects_wrong_slot() {
        let mut equipment = Equipment::empty();
        let err = equipment.equip(EquipSlot::Body, buckler()).unwrap_err();
        assert_eq!(
            err,
            EquipmentSlotError::SlotMismatch {
                item: ItemId(2),
                slot: EquipSlot::Body,
                fits: EquipSlot::ShieldHand,
            }
        );
        assert!(equipment.get(EquipSlot::Body).is_none());
    }

    #[test]
    fn modifiers_sum_across_slots() {
        let mut equipment = Equipment::empty();
        equipment.equip(EquipSlot::MainHand, sword()).unwrap();
        equipment.equip(EquipSlot::ShieldHand, buckler()).unwrap();

        assert_eq!(
            equipment.modifiers(),
            ItemModifiers {
                accuracy: 5,
                defense: 4,
                damage: 2
            }
        );
    }

    #[test]
    fn equip_returns_displaced_item() {
        let mut equipment = Equipment::empty();
        assert!(equipment.equip(EquipSlot::MainHand, sword()).unwrap().is_none());
        let displaced = equipment.equip(EquipSlot::MainHand, sword()).unwrap();
        assert_eq!(displaced.map(|d| d.id), Some(ItemId(1)));
        assert_eq!(equipment.unequip(EquipSlot::MainHand).unwrap().id, ItemId(1));
        assert!(matches!(
            equipment.unequip(EquipSlot::MainHand),
            Err(EquipmentSlotError::SlotEmpty { .. })
        ));
    }

    #[test]
    fn slot_names_parse() {
        assert_eq!("shield_hand".parse::<EquipSlot>().unwrap(), EquipSlot::ShieldHand);
        assert_eq!(EquipSlot::MainHand.to_string(), "main_hand");
    }
}
