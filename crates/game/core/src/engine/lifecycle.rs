//! Building, starting, joining, leaving, and stopping encounters.

use std::sync::Arc;

use tracing::debug;

use crate::config::EncounterConfig;
use crate::env::{ItemDefinition, ItemOracle, PcgRng, RngOracle, StatProvider};
use crate::initiative::{InitiativeEntry, InitiativeOrder, roll_initiative, roll_order};
use crate::resolver::{ActionResolver, resolver_for};
use crate::state::{
    EncounterId, EquipmentSlotError, ItemId, Participant, ParticipantId, ParticipantSpec, Roster,
    TurnId,
};

use super::errors::{AdmissionError, CreateError, JoinError, LeaveError, StartError};
use super::termination::{EncounterSummary, EndReason, TerminationPolicy};
use super::turns::{Advance, TurnPhase, TurnWindow};
use super::Encounter;

/// Coarse lifecycle state derived from the turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EncounterState {
    Forming,
    Active,
    Ended,
}

impl From<&TurnPhase> for EncounterState {
    fn from(phase: &TurnPhase) -> Self {
        match phase {
            TurnPhase::WaitingForOrder => Self::Forming,
            TurnPhase::TurnActive(_) | TurnPhase::Resolving(_) => Self::Active,
            TurnPhase::Ended(_) => Self::Ended,
        }
    }
}

/// Catalog used when the host supplies none.
struct NoItems;

impl ItemOracle for NoItems {
    fn item(&self, _id: ItemId) -> Option<ItemDefinition> {
        None
    }

    fn all_items(&self) -> Vec<ItemDefinition> {
        Vec::new()
    }
}

/// Builder for [`Encounter`].
///
/// A stat provider is required. Items default to an empty catalog, the RNG to
/// [`PcgRng`], the resolver to the stack selected by
/// `config.equipment_enabled`, and termination to `config.termination`.
pub struct EncounterBuilder {
    id: EncounterId,
    config: EncounterConfig,
    participants: Vec<ParticipantSpec>,
    stats: Option<Arc<dyn StatProvider>>,
    items: Option<Arc<dyn ItemOracle>>,
    rng: Option<Arc<dyn RngOracle>>,
    resolver: Option<Box<dyn ActionResolver>>,
    termination: Option<Box<dyn TerminationPolicy>>,
}

impl EncounterBuilder {
    pub fn new(config: EncounterConfig) -> Self {
        Self {
            id: EncounterId::default(),
            config,
            participants: Vec::new(),
            stats: None,
            items: None,
            rng: None,
            resolver: None,
            termination: None,
        }
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

    pub fn stats(mut self, stats: Arc<dyn StatProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn items(mut self, items: Arc<dyn ItemOracle>) -> Self {
        self.items = Some(items);
        self
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

    /// Validates configuration and admits every participant. The encounter
    /// is returned in the `Forming` state.
    pub fn build(self) -> Result<Encounter, CreateError> {
        self.config.validate()?;

        let count = self.participants.len();
        if count < EncounterConfig::MIN_PARTICIPANTS {
            return Err(CreateError::TooFewParticipants {
                count,
                min: EncounterConfig::MIN_PARTICIPANTS,
            });
        }
        if count > EncounterConfig::MAX_PARTICIPANTS {
            return Err(CreateError::TooManyParticipants {
                count,
                max: EncounterConfig::MAX_PARTICIPANTS,
            });
        }

        let stats = self.stats.ok_or(CreateError::MissingStatProvider)?;
        let items = self.items.unwrap_or_else(|| Arc::new(NoItems));

        let mut roster = Roster::new();
        for spec in &self.participants {
            if roster.contains(spec.id) {
                return Err(AdmissionError::Duplicate(spec.id).into());
            }
            roster.insert(admit(spec, stats.as_ref(), items.as_ref())?);
        }

        let resolver = self
            .resolver
            .unwrap_or_else(|| resolver_for(&self.config));
        let termination = self
            .termination
            .unwrap_or_else(|| self.config.termination.into());

        Ok(Encounter {
            id: self.id,
            roster,
            order: InitiativeOrder::default(),
            cursor: 0,
            round: 0,
            next_turn: TurnId::FIRST,
            nonce: 0,
            phase: TurnPhase::WaitingForOrder,
            last_closed: None,
            stats,
            items,
            rng: self.rng.unwrap_or_else(|| Arc::new(PcgRng)),
            resolver,
            termination,
            config: self.config,
        })
    }
}

/// Reads the participant's stats and applies its initial equipment.
fn admit(
    spec: &ParticipantSpec,
    stats: &dyn StatProvider,
    items: &dyn ItemOracle,
) -> Result<Participant, AdmissionError> {
    let block = stats.combat_stats(spec.id)?;
    let mut participant = Participant::new(spec, &block)?;

    for &(slot, item) in &spec.equipped {
        if !participant.carries(item) {
            return Err(EquipmentSlotError::NotCarried { item }.into());
        }
        let definition = items
            .item(item)
            .ok_or(EquipmentSlotError::UnknownItem { item })?;
        let displaced = participant.equipment.equip(slot, definition)?;
        participant.take_item(item);
        if let Some(previous) = displaced {
            // the slot freed by `take_item` always has room
            let _ = participant.inventory.try_push(previous.id);
        }
    }
    Ok(participant)
}

/// A participant released by [`Encounter::leave`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub participant: Participant,
    /// Set when the departure closed the active window or ended the encounter.
    pub advance: Option<Advance>,
}

/// Read-only copy of encounter state for hosts and action providers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSnapshot {
    pub id: EncounterId,
    pub state: EncounterState,
    pub phase: TurnPhase,
    pub round: u32,
    pub order: Vec<InitiativeEntry>,
    pub participants: Vec<Participant>,
    pub config: EncounterConfig,
}

impl EncounterSnapshot {
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn active_window(&self) -> Option<TurnWindow> {
        match self.phase {
            TurnPhase::TurnActive(window) => Some(window),
            _ => None,
        }
    }

    /// Active participants `id` may fight. Under side-based termination,
    /// allies are excluded.
    pub fn opponents_of(&self, id: ParticipantId) -> impl Iterator<Item = &Participant> {
        let side = self.participant(id).map(|p| p.side);
        let by_side = self.config.termination == crate::config::TerminationKind::OpposingSides;
        self.participants.iter().filter(move |p| {
            p.is_active() && p.id != id && !(by_side && Some(p.side) == side)
        })
    }
}

impl Encounter {
    /// Rolls initiative and opens the first decision window.
    pub fn start(&mut self) -> Result<TurnWindow, StartError> {
        match self.phase {
            TurnPhase::WaitingForOrder => {}
            TurnPhase::Ended(_) => return Err(StartError::EncounterEnded),
            TurnPhase::TurnActive(_) | TurnPhase::Resolving(_) => {
                return Err(StartError::AlreadyStarted);
            }
        }

        let active: Vec<(ParticipantId, i32)> = self
            .roster
            .iter_active()
            .map(|p| (p.id, p.base.initiative_mod))
            .collect();
        if active.len() < EncounterConfig::MIN_PARTICIPANTS {
            return Err(StartError::TooFewParticipants {
                active: active.len(),
            });
        }
        if self.termination.is_over(&self.roster) {
            return Err(StartError::AlreadyDecided);
        }

        self.order = roll_order(&active, &self.config, self.rng.as_ref());
        self.cursor = 0;
        self.round = 1;
        let first = self
            .order
            .get(0)
            .map(|entry| entry.participant)
            .ok_or(StartError::TooFewParticipants { active: 0 })?;

        debug!(encounter = %self.id, order = ?self.order.ids(), "initiative rolled");
        Ok(self.open_window(first))
    }

    /// Admits a participant.
    ///
    /// While forming, the newcomer just joins the roster. Once active, it
    /// rolls initiative and is inserted where its score places it; returns
    /// that entry.
    pub fn join(&mut self, spec: &ParticipantSpec) -> Result<Option<InitiativeEntry>, JoinError> {
        if self.is_ended() {
            return Err(JoinError::EncounterEnded);
        }
        if self.roster.contains(spec.id) {
            return Err(AdmissionError::Duplicate(spec.id).into());
        }
        if self.roster.len() >= EncounterConfig::MAX_PARTICIPANTS {
            return Err(AdmissionError::RosterFull {
                capacity: EncounterConfig::MAX_PARTICIPANTS,
            }
            .into());
        }

        let participant = admit(spec, self.stats.as_ref(), self.items.as_ref())?;
        let active = participant.is_active();
        let modifier = participant.base.initiative_mod;
        self.roster.insert(participant);

        if matches!(self.phase, TurnPhase::WaitingForOrder) || !active {
            return Ok(None);
        }

        let entry = roll_initiative(spec.id, modifier, self.nonce, &self.config, self.rng.as_ref());
        let index = self.order.insert(entry);
        if index <= self.cursor {
            self.cursor += 1;
        }
        debug!(participant = %spec.id, score = entry.score, index, "joined mid-fight");
        Ok(Some(entry))
    }

    /// Removes a participant.
    ///
    /// Leaving during one's own window cancels it without an action result
    /// and advances the turn. The departure may end the encounter.
    pub fn leave(&mut self, id: ParticipantId) -> Result<Departure, LeaveError> {
        if self.is_ended() {
            return Err(LeaveError::EncounterEnded);
        }
        let participant = self
            .roster
            .remove(id)
            .ok_or(LeaveError::UnknownParticipant(id))?;
        let reason = EndReason::Left {
            participant: id,
            name: participant.name.clone(),
        };

        let window = match self.phase {
            TurnPhase::TurnActive(window) | TurnPhase::Resolving(window) => window,
            TurnPhase::WaitingForOrder | TurnPhase::Ended(_) => {
                return Ok(Departure {
                    participant,
                    advance: None,
                });
            }
        };

        let advance = if window.participant == id {
            self.last_closed = Some(window);
            Some(self.advance(Some(reason)))
        } else {
            let roster = &self.roster;
            self.order.retain(|p| roster.is_active(p));
            self.cursor = self.order.position(window.participant).unwrap_or(0);
            self.end_reason(Some(reason))
                .map(|reason| Advance::Ended(self.finish(reason)))
        };

        debug!(participant = %id, "left encounter");
        Ok(Departure {
            participant,
            advance,
        })
    }

    /// Ends the encounter. Stopping an ended encounter returns its summary.
    pub fn stop(&mut self) -> EncounterSummary {
        match &self.phase {
            TurnPhase::Ended(summary) => summary.clone(),
            _ => self.finish(EndReason::Stopped),
        }
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            id: self.id,
            state: self.state(),
            phase: self.phase.clone(),
            round: self.round,
            order: self.order.entries().to_vec(),
            participants: self.roster.iter().cloned().collect(),
            config: self.config.clone(),
        }
    }
}
