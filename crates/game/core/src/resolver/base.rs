//! Rules for every action, using the context's stats view.

use tracing::debug;

use crate::action::{ActionKind, ActionOutcome, ActionRequest, Resolution, StatusChange};
use crate::combat::{AttackSeeds, resolve_attack};
use crate::env::{ItemKind, RollContext};
use crate::state::{EquipmentSlotError, ItemId, Participant, ParticipantId, Status};

use super::{ActionResolver, ResolveContext, ResolveError};

/// Resolver without equipment support.
///
/// Equip and unequip requests are rejected with
/// [`ResolveError::EquipmentDisabled`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseResolver;

impl ActionResolver for BaseResolver {
    fn resolve(
        &self,
        request: &ActionRequest,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Resolution, ResolveError> {
        let actor = request.actor;
        if !ctx.roster.is_active(actor) {
            return Err(ResolveError::UnknownActor(actor));
        }

        match request.kind {
            ActionKind::Attack { target } => attack(actor, target, ctx),
            ActionKind::Defend => {
                let bonus = ctx.config.defend_bonus;
                participant_mut(ctx, actor)?.defending = Some(bonus);
                Ok(Resolution::new(ActionOutcome::Defend { bonus }))
            }
            ActionKind::Flee => flee(actor, ctx),
            ActionKind::UseItem { item, target } => use_item(actor, item, target, ctx),
            ActionKind::Disengage => {
                participant_mut(ctx, actor)?.disengaged = true;
                Ok(Resolution::new(ActionOutcome::Disengage))
            }
            ActionKind::Pass => Ok(Resolution::new(ActionOutcome::Pass)),
            ActionKind::Equip { .. } | ActionKind::Unequip { .. } => {
                Err(ResolveError::EquipmentDisabled)
            }
        }
    }
}

fn participant_mut<'c>(
    ctx: &'c mut ResolveContext<'_>,
    id: ParticipantId,
) -> Result<&'c mut Participant, ResolveError> {
    ctx.roster
        .get_mut(id)
        .ok_or(ResolveError::UnknownActor(id))
}

fn attack(
    actor: ParticipantId,
    target: ParticipantId,
    ctx: &mut ResolveContext<'_>,
) -> Result<Resolution, ResolveError> {
    if target == actor {
        return Err(ResolveError::InvalidTarget { target });
    }
    let attacker = ctx
        .roster
        .active(actor)
        .ok_or(ResolveError::UnknownActor(actor))?;
    let defender = ctx
        .roster
        .active(target)
        .ok_or(ResolveError::InvalidTarget { target })?;

    let attacker_stats = ctx.stats_of(attacker);
    let defender_stats = ctx.stats_of(defender);
    let defend_bonus = defender.defending.unwrap_or(0);
    let seeds = AttackSeeds {
        hit: ctx.seed(actor, RollContext::Hit),
        damage: ctx.seed(actor, RollContext::Damage),
    };
    let result = resolve_attack(
        &attacker_stats,
        &defender_stats,
        defend_bonus,
        ctx.config,
        ctx.rng,
        seeds,
    );

    let defender = participant_mut(ctx, target)?;
    defender.defending = None;
    let before = defender.status;
    let dealt = defender.take_damage(result.damage);

    debug!(
        attacker = %actor,
        defender = %target,
        outcome = %result.outcome,
        roll = result.roll,
        hit_chance = result.hit_chance,
        damage = dealt,
        "attack resolved"
    );

    let mut resolution = Resolution::new(ActionOutcome::Attack {
        target,
        outcome: result.outcome,
        roll: result.roll,
        hit_chance: result.hit_chance,
        damage: dealt,
        target_hit_points: defender.hit_points,
    });
    if before != defender.status {
        resolution = resolution.with_change(StatusChange {
            participant: target,
            from: before,
            to: defender.status,
        });
    }
    Ok(resolution)
}

fn flee(actor: ParticipantId, ctx: &mut ResolveContext<'_>) -> Result<Resolution, ResolveError> {
    let roll = ctx.rng.roll_d100(ctx.seed(actor, RollContext::Flee));
    let success = roll <= ctx.config.flee_success_chance;

    let mut resolution = Resolution::new(ActionOutcome::Flee { success, roll });
    if success {
        let participant = participant_mut(ctx, actor)?;
        let before = participant.status;
        participant.status = Status::Fled;
        resolution = resolution.with_change(StatusChange {
            participant: actor,
            from: before,
            to: Status::Fled,
        });
    }
    Ok(resolution)
}

fn use_item(
    actor: ParticipantId,
    item: ItemId,
    target: Option<ParticipantId>,
    ctx: &mut ResolveContext<'_>,
) -> Result<Resolution, ResolveError> {
    let target = target.unwrap_or(actor);
    let carried = ctx
        .roster
        .get(actor)
        .is_some_and(|participant| participant.carries(item));
    if !carried {
        return Err(EquipmentSlotError::NotCarried { item }.into());
    }
    let definition = ctx
        .items
        .item(item)
        .ok_or(EquipmentSlotError::UnknownItem { item })?;
    let ItemKind::Consumable { heal } = definition.kind else {
        return Err(ResolveError::NotConsumable { item });
    };
    if !ctx.roster.is_active(target) {
        return Err(ResolveError::InvalidTarget { target });
    }

    participant_mut(ctx, actor)?.take_item(item);
    let healed = participant_mut(ctx, target)?.hit_points.heal(heal);

    Ok(Resolution::new(ActionOutcome::UseItem {
        item,
        target,
        healed,
    }))
}
