//! Item oracle implementing [`skirmish_core::ItemOracle`].

use std::collections::HashMap;

use skirmish_core::{ItemDefinition, ItemId, ItemOracle};

/// Oracle providing item definitions.
#[derive(Debug, Clone, Default)]
pub struct ItemOracleImpl {
    items: HashMap<ItemId, ItemDefinition>,
}

impl ItemOracleImpl {
    /// Create an empty oracle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item definition, replacing any with the same id.
    pub fn add(&mut self, item: ItemDefinition) {
        self.items.insert(item.id, item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ItemDefinition> for ItemOracleImpl {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.id, item)).collect(),
        }
    }
}

impl ItemOracle for ItemOracleImpl {
    fn item(&self, id: ItemId) -> Option<ItemDefinition> {
        self.items.get(&id).cloned()
    }

    fn all_items(&self) -> Vec<ItemDefinition> {
        let mut items: Vec<_> = self.items.values().cloned().collect();
        items.sort_by_key(|item| item.id);
        items
    }
}
