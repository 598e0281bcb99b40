//! Runtime adapters for host-owned data.
//!
//! These implement the core's stat and item traits over in-memory maps, built
//! either by hand or from loaded content. The data is immutable once an
//! encounter starts; dynamic state lives in the encounter.
mod items;
mod stats;

use std::sync::Arc;

use skirmish_content::RosterEntry;
use skirmish_core::ItemDefinition;

pub use items::ItemOracleImpl;
pub use stats::StaticStatProvider;

/// Bundles the oracles an encounter reads from.
#[derive(Clone, Default)]
pub struct OracleManager {
    pub(crate) stats: Arc<StaticStatProvider>,
    pub(crate) items: Arc<ItemOracleImpl>,
}

impl OracleManager {
    pub fn new(stats: Arc<StaticStatProvider>, items: Arc<ItemOracleImpl>) -> Self {
        Self { stats, items }
    }

    /// Builds both oracles from a loaded roster and item catalog.
    pub fn from_content(roster: &[RosterEntry], items: Vec<ItemDefinition>) -> Self {
        Self::new(
            Arc::new(StaticStatProvider::from_roster(roster)),
            Arc::new(items.into_iter().collect()),
        )
    }

    pub fn stats(&self) -> &StaticStatProvider {
        &self.stats
    }

    pub fn items(&self) -> &ItemOracleImpl {
        &self.items
    }
}
