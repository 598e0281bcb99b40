pub mod common;
pub mod equipment;
pub mod participant;

pub use common::{EncounterId, HitPoints, ItemId, ParticipantId, SideId, TurnId};
pub use equipment::{EquipSlot, Equipment, EquipmentSlotError};
pub use participant::{
    CombatStats, DamageRange, Inventory, Participant, ParticipantError, ParticipantSpec, Status,
};
