//! Encounter configuration loader.

use std::path::Path;

use skirmish_core::EncounterConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for encounter configuration from TOML files.
///
/// Missing keys take their defaults, so a file only needs the options it
/// changes.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<EncounterConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EncounterConfig> {
        let config: EncounterConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid encounter config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use skirmish_core::{TerminationKind, TimeoutAction};

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
turn_duration_secs = 12
default_action_on_timeout = "pass"
termination = "opposing_sides"
seed = 99
"#
        )
        .unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.turn_duration_secs, 12);
        assert_eq!(config.default_action_on_timeout, TimeoutAction::Pass);
        assert_eq!(config.termination, TerminationKind::OpposingSides);
        assert_eq!(config.seed, 99);
        assert_eq!(config.max_hit_chance, EncounterConfig::DEFAULT_MAX_HIT_CHANCE);
        assert!(config.equipment_enabled);
    }

    #[test]
    fn inconsistent_band_is_rejected() {
        let err = ConfigLoader::parse("min_hit_chance = 80\nmax_hit_chance = 20\n").unwrap_err();
        assert!(err.to_string().contains("Invalid encounter config"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/skirmish.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/skirmish.toml"));
    }
}
