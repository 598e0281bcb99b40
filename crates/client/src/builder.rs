//! Client builder: loads content and assembles the encounter runtime.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use skirmish_content::{ContentFactory, ControllerSpec};
use skirmish_runtime::{
    ActionProvider, AggressiveProvider, EncounterRuntime, EventBus, OracleManager,
    PassiveProvider, RuntimeConfig,
};

use crate::Client;

/// Builder for [`Client`].
///
/// Only the data directory is required. Environment overrides are applied
/// on top of `config.toml` unless disabled.
pub struct ClientBuilder {
    data_dir: Option<PathBuf>,
    env_overrides: bool,
    event_capacity: usize,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            env_overrides: true,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientBuilder {
    pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding `config.toml`, `items.ron` and `roster.ron` (required).
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Whether `SKIRMISH_*` environment variables override the loaded config.
    pub fn env_overrides(mut self, enabled: bool) -> Self {
        self.env_overrides = enabled;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Load content, start the encounter, and subscribe to its events.
    ///
    /// The subscription is taken before the worker starts, so the initiative
    /// roll and the first turn are never missed.
    pub async fn build(self) -> Result<Client> {
        let data_dir = self
            .data_dir
            .context("Data directory is required. Use .data_dir() to set it.")?;
        let factory = ContentFactory::new(data_dir);

        let encounter_config = factory
            .load_config()
            .with_context(|| format!("Failed to load config from {}", factory.data_dir().display()))?;
        let items = factory.load_items().context("Failed to load item catalog")?;
        let roster = factory.load_roster().context("Failed to load roster")?;

        let mut config = RuntimeConfig::new(encounter_config);
        if self.env_overrides {
            config = config
                .with_env()
                .context("Invalid SKIRMISH_* environment override")?;
        }
        debug!(?config, participants = roster.len(), "content loaded");

        let event_bus = EventBus::with_capacity(self.event_capacity);
        let events = event_bus.subscribe_all();

        let mut builder = EncounterRuntime::builder()
            .config(config)
            .oracles(OracleManager::from_content(&roster, items))
            .event_bus(event_bus);
        for entry in roster {
            let id = entry.participant.id;
            if let Some(provider) = provider_for(entry.controller) {
                builder = builder.shared_provider(id, provider);
            }
            builder = builder.participant(entry.participant);
        }

        let runtime = builder.build().await.context("Failed to start encounter")?;

        Ok(Client { runtime, events })
    }
}

fn provider_for(controller: ControllerSpec) -> Option<Arc<dyn ActionProvider>> {
    match controller {
        ControllerSpec::Aggressive => Some(Arc::new(AggressiveProvider)),
        ControllerSpec::Passive => Some(Arc::new(PassiveProvider)),
        ControllerSpec::Idle => None,
    }
}
