//! Equipment modifier layer.

use tracing::debug;

use crate::action::{ActionKind, ActionOutcome, ActionRequest, Resolution};
use crate::state::{CombatStats, EquipSlot, EquipmentSlotError, ItemId, Participant, ParticipantId};

use super::{ActionResolver, ResolveContext, ResolveError};

/// Base stats plus the modifiers of everything the participant has equipped.
///
/// Accuracy and defense add directly. The damage range shifts by the damage
/// modifier at both ends, flooring at zero.
pub fn effective_stats(participant: &Participant) -> CombatStats {
    let modifiers = participant.equipment.modifiers();
    let base = participant.base;
    CombatStats {
        accuracy: base.accuracy.saturating_add(modifiers.accuracy),
        defense: base.defense.saturating_add(modifiers.defense),
        damage: base.damage.shifted(modifiers.damage),
        initiative_mod: base.initiative_mod,
    }
}

/// Decorator that adds equipment to any resolver.
///
/// Equip and unequip are resolved here. Every other action is delegated to
/// the wrapped resolver with [`effective_stats`] as the stats view.
#[derive(Clone, Copy, Debug, Default)]
pub struct EquipmentLayer<R> {
    inner: R,
}

impl<R> EquipmentLayer<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ActionResolver> ActionResolver for EquipmentLayer<R> {
    fn resolve(
        &self,
        request: &ActionRequest,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Resolution, ResolveError> {
        match request.kind {
            ActionKind::Equip { item, slot } => equip(request.actor, item, slot, ctx),
            ActionKind::Unequip { slot } => unequip(request.actor, slot, ctx),
            _ => {
                let previous = ctx.view;
                ctx.view = effective_stats;
                let resolution = self.inner.resolve(request, ctx);
                ctx.view = previous;
                resolution
            }
        }
    }
}

fn active_mut<'c>(
    ctx: &'c mut ResolveContext<'_>,
    id: ParticipantId,
) -> Result<&'c mut Participant, ResolveError> {
    ctx.roster
        .get_mut(id)
        .filter(|participant| participant.is_active())
        .ok_or(ResolveError::UnknownActor(id))
}

fn equip(
    actor: ParticipantId,
    item: ItemId,
    slot: EquipSlot,
    ctx: &mut ResolveContext<'_>,
) -> Result<Resolution, ResolveError> {
    if !active_mut(ctx, actor)?.carries(item) {
        return Err(EquipmentSlotError::NotCarried { item }.into());
    }
    let definition = ctx
        .items
        .item(item)
        .ok_or(EquipmentSlotError::UnknownItem { item })?;
    let block = ctx.stats.combat_stats(actor)?;
    block.validate(actor)?;

    let participant = active_mut(ctx, actor)?;
    let displaced = participant.equipment.equip(slot, definition)?;
    participant.take_item(item);
    if let Some(previous) = &displaced {
        participant
            .inventory
            .try_push(previous.id)
            .map_err(|_| ResolveError::InventoryFull { participant: actor })?;
    }
    participant.refresh(&block)?;

    debug!(participant = %actor, %item, %slot, "equipped");

    Ok(Resolution::new(ActionOutcome::Equip {
        item,
        slot,
        displaced: displaced.map(|previous| previous.id),
    }))
}

fn unequip(
    actor: ParticipantId,
    slot: EquipSlot,
    ctx: &mut ResolveContext<'_>,
) -> Result<Resolution, ResolveError> {
    let participant = active_mut(ctx, actor)?;
    if participant.equipment.get(slot).is_none() {
        return Err(EquipmentSlotError::SlotEmpty { slot }.into());
    }
    if participant.inventory.is_full() {
        return Err(ResolveError::InventoryFull { participant: actor });
    }
    let block = ctx.stats.combat_stats(actor)?;
    block.validate(actor)?;

    let participant = active_mut(ctx, actor)?;
    let removed = participant.equipment.unequip(slot)?;
    participant
        .inventory
        .try_push(removed.id)
        .map_err(|_| ResolveError::InventoryFull { participant: actor })?;
    participant.refresh(&block)?;

    debug!(participant = %actor, item = %removed.id, %slot, "unequipped");

    Ok(Resolution::new(ActionOutcome::Unequip {
        item: removed.id,
        slot,
    }))
}
