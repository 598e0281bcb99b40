//! Registry mapping encounter ids to running encounters.
//!
//! The core keeps no global state; hosts that run many encounters (one per
//! room or session) look them up here. Encounters share nothing, so each
//! progresses independently on its own worker.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use skirmish_core::{ActionKind, ActionResult, EncounterId, ParticipantId};

use crate::api::{EncounterHandle, Result, RuntimeError};
use crate::runtime::{EncounterRuntime, EncounterRuntimeBuilder};

/// Cloneable registry of running encounters.
///
/// ```text
/// EncounterRegistry
/// ├── encounters: HashMap<EncounterId, EncounterRuntime>
/// └── next_id: EncounterId  (assigned on start)
/// ```
#[derive(Clone, Default)]
pub struct EncounterRegistry {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    encounters: HashMap<EncounterId, EncounterRuntime>,
    next_id: u64,
}

impl EncounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next encounter id, builds and starts the encounter, and
    /// registers it.
    pub async fn start(&self, builder: EncounterRuntimeBuilder) -> Result<EncounterHandle> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = EncounterId(inner.next_id);

        let runtime = builder.id(id).build().await?;
        let handle = runtime.handle();
        inner.encounters.insert(id, runtime);

        info!(target: "skirmish::registry", encounter = %id, "encounter registered");
        Ok(handle)
    }

    pub async fn get(&self, id: EncounterId) -> Option<EncounterHandle> {
        self.inner
            .read()
            .await
            .encounters
            .get(&id)
            .map(EncounterRuntime::handle)
    }

    /// Routes a submission to the encounter it belongs to.
    pub async fn submit_action(
        &self,
        encounter: EncounterId,
        participant: ParticipantId,
        kind: ActionKind,
    ) -> Result<ActionResult> {
        let handle = self
            .get(encounter)
            .await
            .ok_or(RuntimeError::UnknownEncounter(encounter))?;
        handle.submit_action(participant, kind).await
    }

    /// Unregisters an encounter, handing it back to the caller.
    pub async fn remove(&self, id: EncounterId) -> Option<EncounterRuntime> {
        let removed = self.inner.write().await.encounters.remove(&id);
        if removed.is_some() {
            debug!(target: "skirmish::registry", encounter = %id, "encounter removed");
        }
        removed
    }

    /// Drops every encounter that has ended. Returns their ids, sorted.
    pub async fn prune_ended(&self) -> Vec<EncounterId> {
        let mut inner = self.inner.write().await;
        let mut ended: Vec<EncounterId> = inner
            .encounters
            .iter()
            .filter(|(_, runtime)| runtime.handle().is_ended())
            .map(|(id, _)| *id)
            .collect();
        ended.sort();

        for id in &ended {
            inner.encounters.remove(id);
        }
        if !ended.is_empty() {
            info!(target: "skirmish::registry", pruned = ended.len(), "ended encounters pruned");
        }
        ended
    }

    pub async fn ids(&self) -> Vec<EncounterId> {
        let mut ids: Vec<_> = self.inner.read().await.encounters.keys().copied().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.encounters.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
