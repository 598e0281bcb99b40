//! Asynchronous abstraction for sourcing participant intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so encounters can
//! run with AI policies, scripted fixtures, or remote players. A provider is
//! asked once per decision window and races the deadline like a human would.
use async_trait::async_trait;
use skirmish_core::{ActionKind, EncounterSnapshot, ParticipantId};

/// Decides what a participant does on its turn.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Returns the action to submit, or `None` to let the window elapse.
    async fn decide(
        &self,
        participant: ParticipantId,
        snapshot: &EncounterSnapshot,
    ) -> Option<ActionKind>;
}

/// Attacks the opponent with the fewest hit points, lowest id first on ties.
///
/// Defends when no opponent is left to attack.
pub struct AggressiveProvider;

#[async_trait]
impl ActionProvider for AggressiveProvider {
    async fn decide(
        &self,
        participant: ParticipantId,
        snapshot: &EncounterSnapshot,
    ) -> Option<ActionKind> {
        let target = snapshot
            .opponents_of(participant)
            .min_by_key(|opponent| (opponent.hit_points.current, opponent.id))
            .map(|opponent| opponent.id);

        Some(match target {
            Some(target) => ActionKind::Attack { target },
            None => ActionKind::Defend,
        })
    }
}

/// Always defends.
pub struct PassiveProvider;

#[async_trait]
impl ActionProvider for PassiveProvider {
    async fn decide(
        &self,
        _participant: ParticipantId,
        _snapshot: &EncounterSnapshot,
    ) -> Option<ActionKind> {
        Some(ActionKind::Defend)
    }
}
