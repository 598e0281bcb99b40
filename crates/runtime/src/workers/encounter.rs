//! Encounter worker that owns the authoritative [`skirmish_core::Encounter`].
//!
//! Receives commands from [`EncounterHandle`](crate::EncounterHandle), races
//! each decision window against its deadline, and publishes events to the
//! EventBus.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use skirmish_core::{
    ActionRequest, ActionResult, Advance, CombatError, Encounter, EncounterSnapshot,
    EncounterSummary, InitiativeEntry, Participant, ParticipantId, ParticipantSpec, TurnId,
    TurnReport, TurnWindow,
};

use crate::api::{ActionProvider, Result};
use crate::events::{CombatEvent, Event, EventBus, LifecycleEvent, TurnEvent};

/// Commands that can be sent to the encounter worker
pub enum Command {
    /// Submit a decision for the open window.
    Submit {
        request: ActionRequest,
        reply: oneshot::Sender<Result<ActionResult>>,
    },
    /// Admit a participant, optionally with a provider deciding for it.
    Join {
        spec: ParticipantSpec,
        provider: Option<Arc<dyn ActionProvider>>,
        reply: oneshot::Sender<Result<Option<InitiativeEntry>>>,
    },
    /// Remove a participant.
    Leave {
        participant: ParticipantId,
        reply: oneshot::Sender<Result<Participant>>,
    },
    /// End the encounter.
    Stop {
        reply: oneshot::Sender<EncounterSummary>,
    },
    /// Query the current encounter state (read-only).
    Snapshot {
        reply: oneshot::Sender<EncounterSnapshot>,
    },
}

/// Timer state of the open decision window.
#[derive(Debug, Clone, Copy)]
struct TurnTimer {
    turn: TurnId,
    participant: ParticipantId,
    deadline: Instant,
    /// Cleared once the warning has fired.
    warning: Option<Instant>,
}

/// Background task driving one encounter.
///
/// The worker only holds a weak command sender, so it exits once every
/// [`EncounterHandle`](crate::EncounterHandle) is gone. Dropping the last
/// handle of a running encounter stops it.
pub struct EncounterWorker {
    encounter: Encounter,
    providers: HashMap<ParticipantId, Arc<dyn ActionProvider>>,
    command_rx: mpsc::Receiver<Command>,
    command_tx: mpsc::WeakSender<Command>,
    event_bus: EventBus,
    summary_tx: watch::Sender<Option<EncounterSummary>>,
    timer: Option<TurnTimer>,
    /// Provider deciding for the open window.
    pending: Option<JoinHandle<()>>,
}

impl EncounterWorker {
    pub fn new(
        encounter: Encounter,
        providers: HashMap<ParticipantId, Arc<dyn ActionProvider>>,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        event_bus: EventBus,
        summary_tx: watch::Sender<Option<EncounterSummary>>,
    ) -> Self {
        info!(
            target: "skirmish::worker",
            encounter = %encounter.id(),
            participants = encounter.roster().len(),
            "encounter worker initialized"
        );

        Self {
            encounter,
            providers,
            command_rx,
            command_tx,
            event_bus,
            summary_tx,
            timer: None,
            pending: None,
        }
    }

    /// Main worker loop, starting from the encounter's first window.
    pub async fn run(mut self, first: TurnWindow) {
        self.publish(Event::Turn(TurnEvent::InitiativeRolled {
            order: self.encounter.order().entries().to_vec(),
        }));
        self.open_turn(first);

        loop {
            let deadline = self.timer.map(|timer| timer.deadline);
            let warning = self.timer.and_then(|timer| timer.warning);

            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = wait_until(warning) => self.warn_turn(),
                _ = wait_until(deadline) => self.expire_turn(),
            }
        }

        if !self.encounter.is_ended() {
            let summary = self.encounter.stop();
            self.finish(summary);
        }
        debug!(target: "skirmish::worker", encounter = %self.encounter.id(), "worker exited");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit { request, reply } => {
                let result = self.handle_submit(request);
                if reply.send(result).is_err() {
                    debug!(target: "skirmish::worker", "Submit reply channel closed (caller dropped)");
                }
            }
            Command::Join {
                spec,
                provider,
                reply,
            } => {
                let result = self.handle_join(spec, provider);
                if reply.send(result).is_err() {
                    debug!(target: "skirmish::worker", "Join reply channel closed (caller dropped)");
                }
            }
            Command::Leave { participant, reply } => {
                let result = self.handle_leave(participant);
                if reply.send(result).is_err() {
                    debug!(target: "skirmish::worker", "Leave reply channel closed (caller dropped)");
                }
            }
            Command::Stop { reply } => {
                let was_ended = self.encounter.is_ended();
                let summary = self.encounter.stop();
                if !was_ended {
                    self.finish(summary.clone());
                }
                if reply.send(summary).is_err() {
                    debug!(target: "skirmish::worker", "Stop reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.encounter.snapshot()).is_err() {
                    debug!(target: "skirmish::worker", "Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_submit(&mut self, request: ActionRequest) -> Result<ActionResult> {
        let participant = request.actor;
        match self.encounter.submit_action(request) {
            Ok(report) => {
                let result = report.result.clone();
                self.close_turn(report);
                Ok(result)
            }
            Err(err) => {
                debug!(
                    target: "skirmish::worker",
                    encounter = %self.encounter.id(),
                    %participant,
                    error = %err,
                    "submission rejected"
                );
                self.publish(Event::Combat(CombatEvent::ActionRejected {
                    participant,
                    code: err.error_code().to_owned(),
                    error: err.to_string(),
                }));
                Err(err.into())
            }
        }
    }

    fn handle_join(
        &mut self,
        spec: ParticipantSpec,
        provider: Option<Arc<dyn ActionProvider>>,
    ) -> Result<Option<InitiativeEntry>> {
        let entry = self.encounter.join(&spec)?;
        if let Some(provider) = provider {
            self.providers.insert(spec.id, provider);
        }

        info!(
            target: "skirmish::worker",
            encounter = %self.encounter.id(),
            participant = %spec.id,
            initiative = ?entry.map(|entry| entry.score),
            "participant joined"
        );
        self.publish(Event::Lifecycle(LifecycleEvent::ParticipantJoined {
            participant: spec.id,
            initiative: entry.map(|entry| entry.score),
        }));
        Ok(entry)
    }

    fn handle_leave(&mut self, participant: ParticipantId) -> Result<Participant> {
        let departure = self.encounter.leave(participant)?;
        self.providers.remove(&participant);

        info!(
            target: "skirmish::worker",
            encounter = %self.encounter.id(),
            %participant,
            "participant left"
        );
        self.publish(Event::Lifecycle(LifecycleEvent::ParticipantLeft {
            participant,
            name: departure.participant.name.clone(),
        }));

        if let Some(advance) = departure.advance {
            self.cancel_turn();
            self.apply_advance(advance);
        }
        Ok(departure.participant)
    }

    /// Fires the timeout warning of the open window.
    fn warn_turn(&mut self) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        timer.warning = None;
        let remaining = timer.deadline.saturating_duration_since(Instant::now());
        let (participant, turn) = (timer.participant, timer.turn);

        debug!(target: "skirmish::worker", %participant, %turn, ?remaining, "decision window closing");
        self.publish(Event::Turn(TurnEvent::TurnWarning {
            participant,
            turn,
            remaining,
        }));
    }

    /// Applies the default action once the deadline passes.
    fn expire_turn(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        self.cancel_turn();

        match self.encounter.expire_turn(timer.turn) {
            Some(report) => self.close_turn(report),
            None => warn!(
                target: "skirmish::worker",
                turn = %timer.turn,
                "deadline fired for a turn that already closed"
            ),
        }
    }

    fn close_turn(&mut self, report: TurnReport) {
        self.cancel_turn();
        self.publish(Event::Combat(CombatEvent::ActionResolved {
            result: report.result,
        }));
        self.apply_advance(report.advance);
    }

    fn apply_advance(&mut self, advance: Advance) {
        match advance {
            Advance::Next { window, new_round } => {
                if new_round {
                    debug!(target: "skirmish::worker", round = window.round, "round advanced");
                    self.publish(Event::Turn(TurnEvent::RoundAdvanced {
                        round: window.round,
                    }));
                }
                self.open_turn(window);
            }
            Advance::Ended(summary) => self.finish(summary),
        }
    }

    /// Arms the deadline and warning of a new window and asks its provider.
    fn open_turn(&mut self, window: TurnWindow) {
        let now = Instant::now();
        let warning = self
            .encounter
            .config()
            .warning_offset()
            .map(|offset| now + offset);
        self.timer = Some(TurnTimer {
            turn: window.turn,
            participant: window.participant,
            deadline: now + window.duration,
            warning,
        });

        debug!(
            target: "skirmish::worker",
            encounter = %self.encounter.id(),
            participant = %window.participant,
            turn = %window.turn,
            round = window.round,
            "turn started"
        );
        self.publish(Event::Turn(TurnEvent::TurnStarted {
            participant: window.participant,
            turn: window.turn,
            round: window.round,
            deadline: window.duration,
        }));

        self.dispatch_provider(window);
    }

    /// Runs the window owner's provider in its own task.
    ///
    /// The decision comes back through the command channel tagged with the
    /// turn, so a provider that misses the deadline is rejected as stale.
    fn dispatch_provider(&mut self, window: TurnWindow) {
        let Some(provider) = self.providers.get(&window.participant).cloned() else {
            return;
        };
        let snapshot = self.encounter.snapshot();
        let commands = self.command_tx.clone();

        self.pending = Some(tokio::spawn(async move {
            let Some(kind) = provider.decide(window.participant, &snapshot).await else {
                return;
            };
            let Some(command_tx) = commands.upgrade() else {
                return;
            };

            let (reply, reply_rx) = oneshot::channel();
            let request = ActionRequest::new(window.participant, kind).for_turn(window.turn);
            if command_tx
                .send(Command::Submit { request, reply })
                .await
                .is_err()
            {
                return;
            }
            drop(command_tx);

            if let Ok(Err(err)) = reply_rx.await {
                debug!(
                    target: "skirmish::worker",
                    participant = %window.participant,
                    error = %err,
                    "provider decision rejected"
                );
            }
        }));
    }

    /// Disarms the timer and abandons any provider still deciding.
    fn cancel_turn(&mut self) {
        self.timer = None;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    fn finish(&mut self, summary: EncounterSummary) {
        self.cancel_turn();

        info!(
            target: "skirmish::worker",
            encounter = %self.encounter.id(),
            reason = %summary.reason,
            rounds = summary.rounds,
            "encounter ended"
        );
        self.publish(Event::Lifecycle(LifecycleEvent::EncounterEnded {
            reason: summary.reason.clone(),
            survivors: summary.survivors.clone(),
            rounds: summary.rounds,
        }));
        self.summary_tx.send_replace(Some(summary));
    }

    fn publish(&self, event: Event) {
        self.event_bus.publish(event);
    }
}

async fn wait_until(instant: Option<Instant>) {
    match instant {
        Some(instant) => sleep_until(instant).await,
        None => std::future::pending().await,
    }
}

