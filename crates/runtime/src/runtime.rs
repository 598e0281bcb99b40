//! High-level runtime orchestrator.
//!
//! The runtime creates an encounter, starts it, spawns its worker, and wires
//! up the command/event channels. Clients drive it through
//! [`EncounterHandle`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use skirmish_core::{
    ActionResolver, Encounter, EncounterConfig, EncounterId, EncounterSummary, ItemOracle,
    ParticipantId, ParticipantSpec, RngOracle, StatProvider, TerminationPolicy, TimeoutAction,
};

use crate::api::{ActionProvider, EncounterHandle, Result, RuntimeError};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::workers::{Command, EncounterWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub encounter: EncounterConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            encounter: EncounterConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    pub const ENV_TURN_SECS: &'static str = "SKIRMISH_TURN_SECS";
    pub const ENV_TIMEOUT_ACTION: &'static str = "SKIRMISH_TIMEOUT_ACTION";
    pub const ENV_SEED: &'static str = "SKIRMISH_SEED";
    pub const ENV_EQUIPMENT: &'static str = "SKIRMISH_EQUIPMENT";

    pub fn new(encounter: EncounterConfig) -> Self {
        Self {
            encounter,
            ..Self::default()
        }
    }

    /// Default configuration overlaid with `SKIRMISH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlays `SKIRMISH_*` environment variables onto this configuration.
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlays overrides looked up by variable name. Unset keys keep their
    /// current value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(secs) = parse_var(&lookup, Self::ENV_TURN_SECS, |v| v.parse::<u64>().ok())? {
            self.encounter.turn_duration_secs = secs;
        }
        if let Some(action) = parse_var(&lookup, Self::ENV_TIMEOUT_ACTION, |v| {
            v.parse::<TimeoutAction>().ok()
        })? {
            self.encounter.default_action_on_timeout = action;
        }
        if let Some(seed) = parse_var(&lookup, Self::ENV_SEED, |v| v.parse::<u64>().ok())? {
            self.encounter.seed = seed;
        }
        if let Some(enabled) = parse_var(&lookup, Self::ENV_EQUIPMENT, parse_bool)? {
            self.encounter.equipment_enabled = enabled;
        }
        Ok(self)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    parse(value.trim())
        .map(Some)
        .ok_or(RuntimeError::InvalidEnv { key, value })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A running encounter: its worker task plus a handle to it.
///
/// Design: the worker owns the [`Encounter`]; [`EncounterHandle`] provides a
/// cloneable façade for clients.
pub struct EncounterRuntime {
    handle: EncounterHandle,
    worker_handle: JoinHandle<()>,
}

impl EncounterRuntime {
    /// Create a new runtime builder
    pub fn builder() -> EncounterRuntimeBuilder {
        EncounterRuntimeBuilder::new()
    }

    pub fn id(&self) -> EncounterId {
        self.handle.id()
    }

    /// Get a cloneable handle to this encounter
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> EncounterHandle {
        self.handle.clone()
    }

    /// Waits for the encounter to end on its own.
    pub async fn finished(&self) -> Result<EncounterSummary> {
        self.handle.finished().await
    }

    /// Stops the encounter and waits for the worker to exit.
    ///
    /// The worker exits once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<EncounterSummary> {
        let summary = self.handle.stop().await?;
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(summary)
    }
}

/// Builder for [`EncounterRuntime`] with flexible configuration.
pub struct EncounterRuntimeBuilder {
    config: RuntimeConfig,
    id: EncounterId,
    participants: Vec<ParticipantSpec>,
    providers: HashMap<ParticipantId, Arc<dyn ActionProvider>>,
    stats: Option<Arc<dyn StatProvider>>,
    items: Option<Arc<dyn ItemOracle>>,
    rng: Option<Arc<dyn RngOracle>>,
    resolver: Option<Box<dyn ActionResolver>>,
    termination: Option<Box<dyn TerminationPolicy>>,
    event_bus: Option<EventBus>,
}

impl EncounterRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            id: EncounterId::default(),
            participants: Vec::new(),
            providers: HashMap::new(),
            stats: None,
            items: None,
            rng: None,
            resolver: None,
            termination: None,
            event_bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the encounter rules
    pub fn encounter_config(mut self, config: EncounterConfig) -> Self {
        self.config.encounter = config;
        self
    }

    pub fn id(mut self, id: EncounterId) -> Self {
        self.id = id;
        self
    }

    pub fn participant(mut self, spec: ParticipantSpec) -> Self {
        self.participants.push(spec);
        self
    }

    pub fn participants(mut self, specs: impl IntoIterator<Item = ParticipantSpec>) -> Self {
        self.participants.extend(specs);
        self
    }

    /// Let `provider` decide for `participant` on each of its turns.
    pub fn provider(
        mut self,
        participant: ParticipantId,
        provider: impl ActionProvider + 'static,
    ) -> Self {
        self.providers.insert(participant, Arc::new(provider));
        self
    }

    /// Like [`provider`](Self::provider), sharing one provider instance.
    pub fn shared_provider(
        mut self,
        participant: ParticipantId,
        provider: Arc<dyn ActionProvider>,
    ) -> Self {
        self.providers.insert(participant, provider);
        self
    }

    /// Set required stat provider
    pub fn stats(mut self, stats: Arc<dyn StatProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn items(mut self, items: Arc<dyn ItemOracle>) -> Self {
        self.items = Some(items);
        self
    }

    /// Set stats and items from an oracle bundle.
    pub fn oracles(self, oracles: OracleManager) -> Self {
        self.stats(oracles.stats).items(oracles.items)
    }

    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn resolver(mut self, resolver: Box<dyn ActionResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn termination(mut self, policy: Box<dyn TerminationPolicy>) -> Self {
        self.termination = Some(policy);
        self
    }

    /// Publish to an existing bus, e.g. one already subscribed to before the
    /// first events are emitted.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Create and start the encounter and spawn its worker.
    pub async fn build(self) -> Result<EncounterRuntime> {
        let mut builder = Encounter::builder(self.config.encounter.clone())
            .id(self.id)
            .participants(self.participants);
        if let Some(stats) = self.stats {
            builder = builder.stats(stats);
        }
        if let Some(items) = self.items {
            builder = builder.items(items);
        }
        if let Some(rng) = self.rng {
            builder = builder.rng(rng);
        }
        if let Some(resolver) = self.resolver {
            builder = builder.resolver(resolver);
        }
        if let Some(termination) = self.termination {
            builder = builder.termination(termination);
        }

        let mut encounter = builder.build()?;
        let first = encounter.start()?;

        info!(
            target: "skirmish::worker",
            encounter = %encounter.id(),
            order = ?encounter.order().ids(),
            "encounter started"
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (summary_tx, summary_rx) = watch::channel(None);
        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        let handle = EncounterHandle::new(
            encounter.id(),
            command_tx.clone(),
            event_bus.clone(),
            summary_rx,
        );

        let worker = EncounterWorker::new(
            encounter,
            self.providers,
            command_rx,
            command_tx.downgrade(),
            event_bus,
            summary_tx,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run(first).await;
        });

        Ok(EncounterRuntime {
            handle,
            worker_handle,
        })
    }
}
