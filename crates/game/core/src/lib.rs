//! Deterministic turn-based combat engine.
//!
//! `skirmish-core` defines the combat rules and the encounter state machine
//! as pure, synchronous APIs. All state mutation flows through
//! [`engine::Encounter`]; timers, channels, and I/O live in the runtime
//! crate, which depends on the types re-exported here.
//!
//! - `initiative`: turn order rolls
//! - `engine`: turn scheduling and encounter lifecycle
//! - `resolver`: action resolution and the equipment modifier layer
//! - `combat`: pure attack arithmetic
//! - `env`: accessors for host-owned data (stats, items, randomness)
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod initiative;
pub mod resolver;
pub mod state;

pub use action::{ActionKind, ActionOutcome, ActionRequest, ActionResult, StatusChange};
pub use combat::AttackOutcome;
pub use config::{ConfigError, EncounterConfig, TerminationKind, TimeoutAction};
pub use engine::{
    Advance, AdmissionError, CreateError, Departure, Encounter, EncounterBuilder,
    EncounterSnapshot, EncounterState, EncounterSummary, EndReason, JoinError, LastStanding,
    LeaveError, OpposingSides, StartError, SubmitError, TerminationPolicy, TurnPhase, TurnReport,
    TurnWindow,
};
pub use env::{
    ItemDefinition, ItemKind, ItemModifiers, ItemOracle, PcgRng, RngOracle, ScriptedRng,
    StatBlock, StatError, StatProvider,
};
pub use error::{CombatError, ErrorSeverity};
pub use initiative::{InitiativeEntry, InitiativeOrder, roll_order};
pub use resolver::{
    ActionResolver, BaseResolver, EquipmentLayer, ResolveContext, ResolveError, effective_stats,
};
pub use state::{
    CombatStats, DamageRange, EncounterId, EquipSlot, Equipment, EquipmentSlotError, HitPoints,
    ItemId, Participant, ParticipantError, ParticipantId, ParticipantSpec, Roster, SideId, Status,
    TurnId,
};
