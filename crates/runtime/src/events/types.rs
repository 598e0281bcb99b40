//! Event types for different topics.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use skirmish_core::{ActionResult, EndReason, InitiativeEntry, ParticipantId, TurnId};

/// Events related to turn management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Initiative was rolled when the encounter started.
    InitiativeRolled { order: Vec<InitiativeEntry> },

    /// A decision window opened.
    TurnStarted {
        participant: ParticipantId,
        turn: TurnId,
        round: u32,
        /// Time until the default action is applied.
        deadline: Duration,
    },

    /// The decision window is about to elapse.
    TurnWarning {
        participant: ParticipantId,
        turn: TurnId,
        remaining: Duration,
    },

    /// The initiative order wrapped.
    RoundAdvanced { round: u32 },
}

/// Events related to action resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A turn closed, by submission or by timeout.
    ActionResolved { result: ActionResult },

    /// A submission was rejected. The window stays open.
    ActionRejected {
        participant: ParticipantId,
        code: String,
        error: String,
    },
}

/// Events related to roster and encounter lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    ParticipantJoined {
        participant: ParticipantId,
        /// Initiative score when joining mid-fight.
        initiative: Option<i32>,
    },

    ParticipantLeft {
        participant: ParticipantId,
        name: String,
    },

    EncounterEnded {
        reason: EndReason,
        survivors: Vec<ParticipantId>,
        rounds: u32,
    },
}
