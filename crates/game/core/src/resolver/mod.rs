//! Action resolution.
//!
//! [`BaseResolver`] implements the rules for every action using whatever
//! stats view the [`ResolveContext`] carries. [`EquipmentLayer`] wraps any
//! resolver, handles equip/unequip itself, and switches the stats view to
//! [`effective_stats`] before delegating. Removing the layer falls back to
//! base-stat arithmetic with no other change.

mod base;
mod equipment;

pub use base::BaseResolver;
pub use equipment::{EquipmentLayer, effective_stats};

use crate::action::{ActionRequest, Resolution};
use crate::config::EncounterConfig;
use crate::env::{ItemOracle, RngOracle, RollContext, StatError, StatProvider, compute_seed};
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{
    CombatStats, EquipmentSlotError, ItemId, Participant, ParticipantId, Roster,
};

/// Maps a participant to the stats its rolls use.
pub type StatsView = fn(&Participant) -> CombatStats;

/// Stats view that ignores equipment.
pub fn base_stats(participant: &Participant) -> CombatStats {
    participant.base
}

/// Everything a resolver may read or mutate while resolving one action.
pub struct ResolveContext<'a> {
    pub roster: &'a mut Roster,
    pub config: &'a EncounterConfig,
    pub rng: &'a dyn RngOracle,
    pub items: &'a dyn ItemOracle,
    pub stats: &'a dyn StatProvider,
    /// Sequence number of the action being resolved.
    pub nonce: u64,
    pub view: StatsView,
}

impl ResolveContext<'_> {
    /// Seed for one of the action's random draws.
    pub fn seed(&self, participant: ParticipantId, context: RollContext) -> u64 {
        compute_seed(self.config.seed, self.nonce, participant.0, context)
    }

    pub fn stats_of(&self, participant: &Participant) -> CombatStats {
        (self.view)(participant)
    }
}

/// Resolves a validated request against the roster.
///
/// Implementations must either fully apply an action or return an error
/// without mutating anything.
pub trait ActionResolver: Send + Sync {
    fn resolve(
        &self,
        request: &ActionRequest,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Resolution, ResolveError>;
}

impl<R: ActionResolver + ?Sized> ActionResolver for Box<R> {
    fn resolve(
        &self,
        request: &ActionRequest,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Resolution, ResolveError> {
        (**self).resolve(request, ctx)
    }
}

/// Builds the resolver stack for a configuration.
pub fn resolver_for(config: &EncounterConfig) -> Box<dyn ActionResolver> {
    if config.equipment_enabled {
        Box::new(EquipmentLayer::new(BaseResolver))
    } else {
        Box::new(BaseResolver)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("target {target} is not an active participant")]
    InvalidTarget { target: ParticipantId },

    #[error(transparent)]
    Equipment(#[from] EquipmentSlotError),

    #[error("equipment is disabled for this encounter")]
    EquipmentDisabled,

    #[error("{item} cannot be consumed")]
    NotConsumable { item: ItemId },

    #[error("inventory of {participant} is full")]
    InventoryFull { participant: ParticipantId },

    #[error(transparent)]
    Stats(#[from] StatError),

    #[error("actor {0} is not in the roster")]
    UnknownActor(ParticipantId),
}

impl CombatError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTarget { .. }
            | Self::Equipment(_)
            | Self::EquipmentDisabled
            | Self::NotConsumable { .. }
            | Self::InventoryFull { .. } => ErrorSeverity::Validation,
            Self::Stats(err) => err.severity(),
            Self::UnknownActor(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "RESOLVE_INVALID_TARGET",
            Self::Equipment(err) => err.error_code(),
            Self::EquipmentDisabled => "RESOLVE_EQUIPMENT_DISABLED",
            Self::NotConsumable { .. } => "RESOLVE_NOT_CONSUMABLE",
            Self::InventoryFull { .. } => "RESOLVE_INVENTORY_FULL",
            Self::Stats(err) => err.error_code(),
            Self::UnknownActor(_) => "RESOLVE_UNKNOWN_ACTOR",
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by resolver tests.

    use std::collections::HashMap;

    use super::*;
    use crate::env::{ItemDefinition, ItemKind, ItemModifiers, ScriptedRng, StatBlock};
    use crate::state::{EquipSlot, HitPoints, ParticipantSpec};

    pub struct Fixture {
        pub roster: Roster,
        pub config: EncounterConfig,
        pub rng: ScriptedRng,
        pub items: Catalog,
        pub stats: Stats,
    }

    #[derive(Default)]
    pub struct Catalog(pub HashMap<ItemId, ItemDefinition>);

    impl ItemOracle for Catalog {
        fn item(&self, id: ItemId) -> Option<ItemDefinition> {
            self.0.get(&id).cloned()
        }

        fn all_items(&self) -> Vec<ItemDefinition> {
            self.0.values().cloned().collect()
        }
    }

    #[derive(Default)]
    pub struct Stats(pub HashMap<ParticipantId, StatBlock>);

    impl StatProvider for Stats {
        fn combat_stats(&self, participant: ParticipantId) -> Result<StatBlock, StatError> {
            self.0
                .get(&participant)
                .copied()
                .ok_or(StatError::Unknown(participant))
        }
    }

    pub const A: ParticipantId = ParticipantId(1);
    pub const B: ParticipantId = ParticipantId(2);
    pub const C: ParticipantId = ParticipantId(3);
    pub const SWORD: ItemId = ItemId(10);
    pub const MAIL: ItemId = ItemId(11);
    pub const POTION: ItemId = ItemId(12);

    pub fn block(hp: u32, accuracy: i32, defense: i32, min: u32, max: u32) -> StatBlock {
        StatBlock {
            hit_points: HitPoints::full(hp),
            accuracy,
            defense,
            damage_min: min,
            damage_max: max,
            initiative_mod: 0,
        }
    }

    /// A (accuracy 80, damage 5-10, 20 HP), B (defense 10, 15 HP), and a
    /// spare C.
    pub fn stats() -> Stats {
        let mut stats = Stats::default();
        stats.0.insert(A, block(20, 80, 0, 5, 10));
        stats.0.insert(B, block(15, 40, 10, 1, 4));
        stats.0.insert(C, block(12, 50, 5, 2, 5));
        stats
    }

    pub fn catalog() -> Catalog {
        let mut items = Catalog::default();
        for def in [
            ItemDefinition::new(SWORD, "sword", ItemKind::Weapon(ItemModifiers::weapon(0, 2))),
            ItemDefinition::new(
                MAIL,
                "mail",
                ItemKind::Armor {
                    slot: EquipSlot::Body,
                    modifiers: ItemModifiers::armor(15),
                },
            ),
            ItemDefinition::new(POTION, "potion", ItemKind::Consumable { heal: 6 }),
        ] {
            items.0.insert(def.id, def);
        }
        items
    }

    pub fn spec_a() -> ParticipantSpec {
        ParticipantSpec::new(A, "A").with_items([SWORD, POTION])
    }

    pub fn spec_b() -> ParticipantSpec {
        ParticipantSpec::new(B, "B").with_items([MAIL])
    }

    impl Fixture {
        pub fn duel(draws: impl IntoIterator<Item = u32>) -> Self {
            let stats = stats();
            let roster = [spec_a(), spec_b()]
                .iter()
                .map(|spec| Participant::new(spec, &stats.0[&spec.id]).unwrap())
                .collect();

            Self {
                roster,
                config: EncounterConfig::default(),
                rng: ScriptedRng::new(draws),
                items: catalog(),
                stats,
            }
        }

        pub fn ctx(&mut self) -> ResolveContext<'_> {
            ResolveContext {
                roster: &mut self.roster,
                config: &self.config,
                rng: &self.rng,
                items: &self.items,
                stats: &self.stats,
                nonce: 1,
                view: base_stats,
            }
        }
    }
}
