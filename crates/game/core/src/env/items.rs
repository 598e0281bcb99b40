use crate::state::{EquipSlot, ItemId};

/// Read-only access to the item catalog.
pub trait ItemOracle: Send + Sync {
    fn item(&self, id: ItemId) -> Option<ItemDefinition>;

    /// Returns all item definitions available in this oracle.
    fn all_items(&self) -> Vec<ItemDefinition>;
}

/// Item definition with common fields and type-specific data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
}

impl ItemDefinition {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// Slot this item occupies when equipped, if it can be equipped at all.
    pub fn slot(&self) -> Option<EquipSlot> {
        match self.kind {
            ItemKind::Weapon(_) => Some(EquipSlot::MainHand),
            ItemKind::Armor { slot, .. } => Some(slot),
            ItemKind::Consumable { .. } => None,
        }
    }

    pub fn fits(&self, slot: EquipSlot) -> bool {
        self.slot() == Some(slot)
    }

    /// Stat modifiers granted while equipped. Consumables grant none.
    pub fn modifiers(&self) -> ItemModifiers {
        match self.kind {
            ItemKind::Weapon(modifiers) | ItemKind::Armor { modifiers, .. } => modifiers,
            ItemKind::Consumable { .. } => ItemModifiers::NONE,
        }
    }
}

/// Item type with type-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Wielded in the main hand.
    Weapon(ItemModifiers),

    /// Worn in exactly one body slot.
    Armor {
        slot: EquipSlot,
        modifiers: ItemModifiers,
    },

    /// Used up on use, restoring hit points.
    Consumable { heal: u32 },
}

/// Additive deltas an equipped item applies to combat stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemModifiers {
    pub accuracy: i32,
    pub defense: i32,
    pub damage: i32,
}

impl ItemModifiers {
    pub const NONE: Self = Self {
        accuracy: 0,
        defense: 0,
        damage: 0,
    };

    pub fn weapon(accuracy: i32, damage: i32) -> Self {
        Self {
            accuracy,
            defense: 0,
            damage,
        }
    }

    pub fn armor(defense: i32) -> Self {
        Self {
            accuracy: 0,
            defense,
            damage: 0,
        }
    }
}

impl core::ops::Add for ItemModifiers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            accuracy: self.accuracy + rhs.accuracy,
            defense: self.defense + rhs.defense,
            damage: self.damage + rhs.damage,
        }
    }
}

impl core::iter::Sum for ItemModifiers {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::NONE, |acc, m| acc + m)
    }
}
