//! Turn scheduling.
//!
//! ```text
//! WaitingForOrder -> TurnActive(p) -> Resolving(p) -> TurnActive(next) | Ended
//! ```
//!
//! Every closed window yields exactly one [`ActionResult`], whether the
//! participant decided in time or the default action was substituted.

use std::time::Duration;

use tracing::{debug, warn};

use crate::action::{ActionKind, ActionRequest, ActionResult, StatusChange};
use crate::resolver::{ResolveContext, base_stats};
use crate::state::{ParticipantId, Status, TurnId};

use super::termination::{EncounterSummary, EndReason};
use super::{Encounter, SubmitError};

/// One participant's decision window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnWindow {
    pub turn: TurnId,
    pub participant: ParticipantId,
    pub round: u32,
    /// How long the participant has to decide. The caller owns the timer.
    pub duration: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Built but not started; no initiative order yet.
    WaitingForOrder,
    TurnActive(TurnWindow),
    /// Transient while an action is applied.
    Resolving(TurnWindow),
    Ended(EncounterSummary),
}

/// What happens after a turn closes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Advance {
    Next {
        window: TurnWindow,
        /// The order wrapped and a new round began with this window.
        new_round: bool,
    },
    Ended(EncounterSummary),
}

impl Advance {
    pub fn window(&self) -> Option<TurnWindow> {
        match self {
            Self::Next { window, .. } => Some(*window),
            Self::Ended(_) => None,
        }
    }
}

/// Result of closing a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub result: ActionResult,
    pub advance: Advance,
}

impl Encounter {
    /// Submits a decision for the open window.
    ///
    /// Rejections leave the window open and state untouched.
    pub fn submit_action(&mut self, request: ActionRequest) -> Result<TurnReport, SubmitError> {
        let window = match &self.phase {
            TurnPhase::Ended(_) => return Err(SubmitError::EncounterEnded),
            TurnPhase::WaitingForOrder => return Err(SubmitError::NotStarted),
            TurnPhase::Resolving(_) => {
                return Err(SubmitError::StaleSubmission {
                    participant: request.actor,
                    turn: request.turn,
                });
            }
            TurnPhase::TurnActive(window) => *window,
        };

        self.check_turn(&request, &window)?;
        self.close_turn(window, request.kind, false)
    }

    /// Applies the configured default action if `turn` is still open.
    ///
    /// Returns `None` when the turn already closed, so a timer that lost the
    /// race against a submission is harmless.
    pub fn expire_turn(&mut self, turn: TurnId) -> Option<TurnReport> {
        let window = self.active_window().filter(|window| window.turn == turn)?;
        let kind = ActionKind::from(self.config.default_action_on_timeout);

        debug!(
            participant = %window.participant,
            %turn,
            action = kind.name(),
            "decision window elapsed"
        );

        match self.close_turn(window, kind, true) {
            Ok(report) => Some(report),
            Err(err) => {
                warn!(%turn, error = %err, "default action rejected, passing");
                self.close_turn(window, ActionKind::Pass, true).ok()
            }
        }
    }

    fn check_turn(&self, request: &ActionRequest, window: &TurnWindow) -> Result<(), SubmitError> {
        if let Some(turn) = request.turn
            && turn != window.turn
        {
            return Err(SubmitError::StaleSubmission {
                participant: request.actor,
                turn: Some(turn),
            });
        }
        if request.actor != window.participant {
            let just_closed = self
                .last_closed
                .is_some_and(|closed| closed.participant == request.actor);
            if just_closed {
                return Err(SubmitError::StaleSubmission {
                    participant: request.actor,
                    turn: request.turn,
                });
            }
            return Err(SubmitError::OutOfTurn {
                participant: request.actor,
                active: window.participant,
            });
        }
        Ok(())
    }

    fn close_turn(
        &mut self,
        window: TurnWindow,
        kind: ActionKind,
        timed_out: bool,
    ) -> Result<TurnReport, SubmitError> {
        self.phase = TurnPhase::Resolving(window);

        let request = ActionRequest::new(window.participant, kind).for_turn(window.turn);
        let nonce = self.nonce + 1;
        let mut ctx = ResolveContext {
            roster: &mut self.roster,
            config: &self.config,
            rng: self.rng.as_ref(),
            items: self.items.as_ref(),
            stats: self.stats.as_ref(),
            nonce,
            view: base_stats,
        };
        let resolution = match self.resolver.resolve(&request, &mut ctx) {
            Ok(resolution) => resolution,
            Err(err) => {
                self.phase = TurnPhase::TurnActive(window);
                return Err(err.into());
            }
        };
        self.nonce = nonce;

        if kind != ActionKind::Disengage
            && let Some(actor) = self.roster.get_mut(window.participant)
        {
            actor.disengaged = false;
        }

        let result = ActionResult {
            turn: window.turn,
            round: window.round,
            actor: window.participant,
            timed_out,
            outcome: resolution.outcome,
            status_changes: resolution.status_changes,
        };
        self.last_closed = Some(window);

        debug!(
            participant = %window.participant,
            turn = %window.turn,
            action = kind.name(),
            timed_out,
            "turn resolved"
        );

        let cause = result
            .status_changes
            .last()
            .and_then(|change| self.reason_for(change));
        let advance = self.advance(cause);
        Ok(TurnReport { result, advance })
    }

    fn reason_for(&self, change: &StatusChange) -> Option<EndReason> {
        let name = self.roster.get(change.participant)?.name.clone();
        let participant = change.participant;
        match change.to {
            Status::Defeated => Some(EndReason::Defeated { participant, name }),
            Status::Fled => Some(EndReason::Fled { participant, name }),
            Status::Active => None,
        }
    }

    /// Evaluates termination, then moves to the next active participant.
    ///
    /// Inactive participants are skipped without a turn and dropped from the
    /// order. The round increments when the scan wraps past the end.
    pub(super) fn advance(&mut self, cause: Option<EndReason>) -> Advance {
        if let Some(reason) = self.end_reason(cause) {
            return Advance::Ended(self.finish(reason));
        }

        let len = self.order.len();
        let next = (1..=len).find_map(|step| {
            let entry = self.order.get((self.cursor + step) % len)?;
            self.roster
                .is_active(entry.participant)
                .then_some((entry.participant, self.cursor + step >= len))
        });
        let Some((participant, wrapped)) = next else {
            return Advance::Ended(self.finish(EndReason::NoOpponents));
        };

        let roster = &self.roster;
        self.order.retain(|id| roster.is_active(id));
        self.cursor = self.order.position(participant).unwrap_or(0);
        if wrapped {
            self.round += 1;
            debug!(round = self.round, "round advanced");
        }

        let window = self.open_window(participant);
        Advance::Next {
            window,
            new_round: wrapped,
        }
    }

    pub(super) fn open_window(&mut self, participant: ParticipantId) -> TurnWindow {
        let turn = self.next_turn;
        self.next_turn = turn.next();
        if let Some(current) = self.roster.get_mut(participant) {
            // a defend bonus lasts until its owner acts again
            current.defending = None;
        }

        let window = TurnWindow {
            turn,
            participant,
            round: self.round,
            duration: self.config.turn_duration(),
        };
        self.phase = TurnPhase::TurnActive(window);
        debug!(%participant, %turn, round = self.round, "turn opened");
        window
    }

    /// Returns the reason the encounter should end now, if it should.
    pub(super) fn end_reason(&self, cause: Option<EndReason>) -> Option<EndReason> {
        if self.termination.is_over(&self.roster) {
            return Some(cause.unwrap_or(EndReason::NoOpponents));
        }
        let mut active = self.roster.iter_active().peekable();
        if self.config.end_on_mutual_disengage
            && active.peek().is_some()
            && active.all(|p| p.disengaged)
        {
            return Some(EndReason::AllDisengaged);
        }
        None
    }

    pub(super) fn finish(&mut self, reason: EndReason) -> EncounterSummary {
        let summary = EncounterSummary {
            reason,
            survivors: self.roster.active_ids(),
            rounds: self.round,
        };
        debug!(reason = %summary.reason, rounds = summary.rounds, "encounter ended");
        self.phase = TurnPhase::Ended(summary.clone());
        summary
    }

    /// True once the encounter has ended or its end condition holds.
    pub fn check_termination(&self) -> bool {
        self.is_ended() || self.end_reason(None).is_some()
    }
}
