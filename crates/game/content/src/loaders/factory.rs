//! Content factory for loading encounter data from a directory.

use std::path::{Path, PathBuf};

use skirmish_core::{EncounterConfig, ItemDefinition};

use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, RosterEntry, RosterLoader};

/// Content factory that loads all encounter content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load encounter configuration from `config.toml`. A missing file yields
    /// the defaults.
    pub fn load_config(&self) -> LoadResult<EncounterConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(EncounterConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load the roster from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<Vec<RosterEntry>> {
        let path = self.data_dir.join("roster.ron");
        RosterLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), EncounterConfig::default());
        assert!(factory.load_items().is_err());
    }

    #[test]
    fn loads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "turn_duration_secs = 5\n").unwrap();
        std::fs::write(
            dir.path().join("items.ron"),
            r#"(items: [(id: ItemId(1), name: "Tonic", kind: Consumable(heal: 4))])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("roster.ron"),
            r#"[(
                participant: (id: ParticipantId(1), name: "Solo"),
                stats: (
                    hit_points: (current: 5, max: 5),
                    accuracy: 1, defense: 1, damage_min: 1, damage_max: 2, initiative_mod: 0,
                ),
                controller: Idle,
            )]"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().turn_duration_secs, 5);
        assert_eq!(factory.load_items().unwrap().len(), 1);
        assert_eq!(factory.load_roster().unwrap().len(), 1);
    }
}
