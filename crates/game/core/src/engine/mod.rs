//! Encounter state machine.
//!
//! An [`Encounter`] owns its roster, initiative order, and turn phase. It is
//! driven entirely by method calls: the host (or the async runtime) opens
//! turns with [`Encounter::start`], feeds decisions through
//! [`Encounter::submit_action`], and reports elapsed deadlines through
//! [`Encounter::expire_turn`]. Nothing here waits or reads a clock; a
//! [`TurnWindow`] carries its duration and the caller runs the timer.
//!
//! - `turns`: scheduling (phases, windows, submission, timeout, advance)
//! - `lifecycle`: building, starting, joins, leaves, stop, snapshots
//! - `termination`: pluggable end conditions and summaries

mod errors;
mod lifecycle;
mod termination;
mod turns;

pub use errors::{AdmissionError, CreateError, JoinError, LeaveError, StartError, SubmitError};
pub use lifecycle::{Departure, EncounterBuilder, EncounterSnapshot, EncounterState};
pub use termination::{EncounterSummary, EndReason, LastStanding, OpposingSides, TerminationPolicy};
pub use turns::{Advance, TurnPhase, TurnReport, TurnWindow};

use std::fmt;
use std::sync::Arc;

use crate::config::EncounterConfig;
use crate::env::{ItemOracle, RngOracle, StatProvider};
use crate::initiative::InitiativeOrder;
use crate::resolver::ActionResolver;
use crate::state::{EncounterId, Roster, TurnId};

/// A single combat session.
///
/// Encounters share no mutable state with each other; any number can run in
/// parallel.
pub struct Encounter {
    id: EncounterId,
    config: EncounterConfig,
    roster: Roster,
    order: InitiativeOrder,
    /// Index of the active participant in `order`.
    cursor: usize,
    round: u32,
    next_turn: TurnId,
    /// Number of resolved actions. Feeds roll seeds.
    nonce: u64,
    phase: TurnPhase,
    /// Most recently closed window, used to tell stale submissions apart
    /// from out-of-turn ones.
    last_closed: Option<TurnWindow>,
    stats: Arc<dyn StatProvider>,
    items: Arc<dyn ItemOracle>,
    rng: Arc<dyn RngOracle>,
    resolver: Box<dyn ActionResolver>,
    termination: Box<dyn TerminationPolicy>,
}

impl Encounter {
    pub fn builder(config: EncounterConfig) -> EncounterBuilder {
        EncounterBuilder::new(config)
    }

    pub fn id(&self) -> EncounterId {
        self.id
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn order(&self) -> &InitiativeOrder {
        &self.order
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn state(&self) -> EncounterState {
        EncounterState::from(&self.phase)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, TurnPhase::Ended(_))
    }

    /// The open decision window, if any.
    pub fn active_window(&self) -> Option<TurnWindow> {
        match self.phase {
            TurnPhase::TurnActive(window) => Some(window),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&EncounterSummary> {
        match &self.phase {
            TurnPhase::Ended(summary) => Some(summary),
            _ => None,
        }
    }
}

impl fmt::Debug for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("id", &self.id)
            .field("round", &self.round)
            .field("nonce", &self.nonce)
            .field("phase", &self.phase)
            .field("order", &self.order.ids())
            .field("termination", &self.termination.name())
            .finish_non_exhaustive()
    }
}
