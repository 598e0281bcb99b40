//! Damage draws.

use crate::env::RngOracle;
use crate::state::DamageRange;

use super::AttackOutcome;

/// Draw damage for an attack outcome.
///
/// Misses deal nothing and draw nothing. Critical hits deal the top of the
/// range without drawing. Regular hits draw uniformly from `range`.
pub fn roll_damage(
    range: DamageRange,
    outcome: AttackOutcome,
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
) -> u32 {
    match outcome {
        AttackOutcome::Miss => 0,
        AttackOutcome::Critical => range.max,
        AttackOutcome::Hit => rng.range(seed, range.min, range.max),
    }
}
