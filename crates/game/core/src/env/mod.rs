//! Traits describing data the engine reads but does not own.
//!
//! Oracles expose participant stat blocks, item definitions, and random
//! draws. The engine holds them behind trait objects so hosts can plug in
//! their own character storage and catalogs.
mod items;
mod rng;
mod stats;

pub use items::{ItemDefinition, ItemKind, ItemModifiers, ItemOracle};
pub use rng::{PcgRng, RngOracle, RollContext, ScriptedRng, compute_seed};
pub use stats::{StatBlock, StatError, StatProvider};
