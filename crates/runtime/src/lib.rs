//! Async runtime for turn-based encounters.
//!
//! This crate wraps the synchronous `skirmish-core` engine in tokio tasks.
//! Consumers build an [`EncounterRuntime`], drive it through a cloneable
//! [`EncounterHandle`], and subscribe to events on the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder, and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`registry`] maps encounter ids to running encounters
//! - [`oracle`] provides in-memory stat and item adapters
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod registry;
pub mod runtime;

mod workers;

pub use api::{
    ActionProvider, AggressiveProvider, EncounterHandle, PassiveProvider, Result, RuntimeError,
};
pub use events::{CombatEvent, Event, EventBus, LifecycleEvent, Topic, TurnEvent};
pub use oracle::{ItemOracleImpl, OracleManager, StaticStatProvider};
pub use registry::EncounterRegistry;
pub use runtime::{EncounterRuntime, EncounterRuntimeBuilder, RuntimeConfig};
