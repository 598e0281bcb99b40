//! Item catalog loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::ItemDefinition;

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// Fails if two definitions share an id.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for item in &catalog.items {
            if !seen.insert(item.id) {
                anyhow::bail!("Duplicate item id {} in catalog", item.id);
            }
        }

        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{EquipSlot, ItemId, ItemKind};

    use super::*;

    const CATALOG: &str = r#"
(
    items: [
        (id: ItemId(1), name: "Short Sword", kind: Weapon((accuracy: 5, damage: 2))),
        (id: ItemId(2), name: "Leather", kind: Armor(slot: Body, modifiers: (defense: 4))),
        (id: ItemId(3), name: "Tonic", kind: Consumable(heal: 6)),
    ],
)
"#;

    #[test]
    fn parses_all_item_kinds() {
        let items = ItemLoader::parse(CATALOG).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].slot(), Some(EquipSlot::MainHand));
        assert_eq!(items[0].modifiers().damage, 2);
        assert_eq!(items[1].slot(), Some(EquipSlot::Body));
        assert_eq!(items[2].kind, ItemKind::Consumable { heal: 6 });
        assert_eq!(items[2].id, ItemId(3));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"(items: [
            (id: ItemId(1), name: "a", kind: Consumable(heal: 1)),
            (id: ItemId(1), name: "b", kind: Consumable(heal: 2)),
        ])"#;
        assert!(ItemLoader::parse(content).is_err());
    }
}
