//! Cloneable façade for issuing commands to a running encounter.
//!
//! [`EncounterHandle`] hides channel plumbing and offers async helpers for
//! submitting actions, changing the roster, or streaming events from specific
//! topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use skirmish_core::{
    ActionKind, ActionRequest, ActionResult, EncounterId, EncounterSnapshot, EncounterSummary,
    InitiativeEntry, Participant, ParticipantId, ParticipantSpec,
};

use super::errors::{Result, RuntimeError};
use super::providers::ActionProvider;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to one encounter.
///
/// The worker keeps running until the last handle is dropped.
#[derive(Clone)]
pub struct EncounterHandle {
    id: EncounterId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    summary_rx: watch::Receiver<Option<EncounterSummary>>,
}

impl EncounterHandle {
    pub(crate) fn new(
        id: EncounterId,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        summary_rx: watch::Receiver<Option<EncounterSummary>>,
    ) -> Self {
        Self {
            id,
            command_tx,
            event_bus,
            summary_rx,
        }
    }

    pub fn id(&self) -> EncounterId {
        self.id
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit an action for the open decision window.
    ///
    /// Rejections leave the window and its deadline untouched.
    pub async fn submit(&self, request: ActionRequest) -> Result<ActionResult> {
        self.request(|reply| Command::Submit { request, reply })
            .await?
    }

    /// Submit `kind` on behalf of `participant` for whatever turn is open.
    pub async fn submit_action(
        &self,
        participant: ParticipantId,
        kind: ActionKind,
    ) -> Result<ActionResult> {
        self.submit(ActionRequest::new(participant, kind)).await
    }

    /// Admit a participant, optionally driven by `provider`.
    ///
    /// Returns the newcomer's initiative entry when it joined mid-fight.
    pub async fn join(
        &self,
        spec: ParticipantSpec,
        provider: Option<Arc<dyn ActionProvider>>,
    ) -> Result<Option<InitiativeEntry>> {
        self.request(|reply| Command::Join {
            spec,
            provider,
            reply,
        })
        .await?
    }

    /// Remove a participant, returning its final state.
    pub async fn leave(&self, participant: ParticipantId) -> Result<Participant> {
        self.request(|reply| Command::Leave { participant, reply })
            .await?
    }

    /// End the encounter. Stopping an ended encounter returns its summary.
    pub async fn stop(&self) -> Result<EncounterSummary> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Query the current encounter state (read-only snapshot)
    pub async fn snapshot(&self) -> Result<EncounterSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Whether the encounter has ended.
    pub fn is_ended(&self) -> bool {
        self.summary_rx.borrow().is_some()
    }

    /// Waits for the encounter to end and returns its summary.
    pub async fn finished(&self) -> Result<EncounterSummary> {
        let mut summary_rx = self.summary_rx.clone();
        let summary = summary_rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        summary.clone().ok_or(RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Turn` - Initiative, decision windows, warnings, rounds
    /// - `Topic::Combat` - Resolved and rejected actions
    /// - `Topic::Lifecycle` - Joins, departures, encounter end
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use skirmish_runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Narrate the action
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Subscribe to every event in publication order.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe_all()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
