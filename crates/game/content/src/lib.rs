//! Data-driven encounter content and loaders.
//!
//! This crate reads the static inputs of an encounter from RON/TOML files:
//! - Encounter configuration (TOML)
//! - Item catalogs (RON)
//! - Rosters: participants with their stat blocks and controllers (RON)
//!
//! Content is consumed by runtime oracles and the CLI. It never appears in
//! encounter state directly; participants enter through the stat provider.
//!
//! All loaders use skirmish-core types directly with serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, ControllerSpec, ItemCatalog, ItemLoader, RosterEntry,
    RosterLoader,
};
