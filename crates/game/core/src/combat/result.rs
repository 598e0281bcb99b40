//! Attack result types and attack resolution.

use crate::config::EncounterConfig;
use crate::env::RngOracle;
use crate::state::CombatStats;

use super::damage::roll_damage;
use super::hit::{calculate_hit_chance, classify_roll};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackOutcome {
    /// Attack missed the target.
    Miss,
    /// Attack hit the target.
    Hit,
    /// Hit that deals the top of the damage range.
    Critical,
}

impl AttackOutcome {
    pub fn is_hit(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Result of attack arithmetic, before it is applied to the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// The d100 roll.
    pub roll: u32,
    pub hit_chance: u32,
    /// Damage drawn. Zero on a miss.
    pub damage: u32,
}

/// Seeds for the two draws an attack may make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackSeeds {
    pub hit: u64,
    pub damage: u64,
}

/// Resolve an attack: hit roll, classification, then damage.
///
/// `defend_bonus` is the defender's pending defend bonus (0 if none) and is
/// added to its defense for this roll only.
pub fn resolve_attack(
    attacker: &CombatStats,
    defender: &CombatStats,
    defend_bonus: i32,
    config: &EncounterConfig,
    rng: &(impl RngOracle + ?Sized),
    seeds: AttackSeeds,
) -> AttackResult {
    let hit_chance = calculate_hit_chance(
        attacker.accuracy,
        defender.defense.saturating_add(defend_bonus),
        config,
    );
    let roll = rng.roll_d100(seeds.hit);
    let outcome = classify_roll(roll, hit_chance, config.critical_chance);
    let damage = roll_damage(attacker.damage, outcome, rng, seeds.damage);

    AttackResult {
        outcome,
        roll,
        hit_chance,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::state::DamageRange;

    const SEEDS: AttackSeeds = AttackSeeds { hit: 1, damage: 2 };

    fn attacker() -> CombatStats {
        CombatStats {
            accuracy: 80,
            defense: 0,
            damage: DamageRange::new(5, 10),
            initiative_mod: 0,
        }
    }

    fn defender() -> CombatStats {
        CombatStats {
            accuracy: 0,
            defense: 10,
            damage: DamageRange::new(1, 2),
            initiative_mod: 0,
        }
    }

    #[test]
    fn hit_draws_damage_from_range() {
        // d100 = 42 (hit at 70%), damage = 5 + (2 % 6) = 7
        let rng = ScriptedRng::new([41, 2]);
        let result = resolve_attack(
            &attacker(),
            &defender(),
            0,
            &EncounterConfig::default(),
            &rng,
            SEEDS,
        );
        assert_eq!(result.hit_chance, 70);
        assert_eq!(result.roll, 42);
        assert_eq!(result.outcome, AttackOutcome::Hit);
        assert_eq!(result.damage, 7);
    }

    #[test]
    fn defend_bonus_lowers_hit_chance() {
        let rng = ScriptedRng::new([59]);
        let result = resolve_attack(
            &attacker(),
            &defender(),
            20,
            &EncounterConfig::default(),
            &rng,
            SEEDS,
        );
        assert_eq!(result.hit_chance, 50);
        assert_eq!(result.outcome, AttackOutcome::Miss);
        assert_eq!(result.damage, 0);
    }

    #[test]
    fn low_roll_is_critical() {
        let rng = ScriptedRng::new([0]);
        let result = resolve_attack(
            &attacker(),
            &defender(),
            0,
            &EncounterConfig::default(),
            &rng,
            SEEDS,
        );
        assert_eq!(result.outcome, AttackOutcome::Critical);
        assert_eq!(result.damage, 10);
    }
}
