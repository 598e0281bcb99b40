//! Hit chance and roll classification.

use crate::config::EncounterConfig;

use super::AttackOutcome;

/// Calculate hit chance from attacker accuracy and defender defense.
///
/// # Formula
///
/// ```text
/// hit_chance = accuracy - defense
/// clamped to [min_hit_chance, max_hit_chance]
/// ```
///
/// `defense` already includes any pending defend bonus.
pub fn calculate_hit_chance(accuracy: i32, defense: i32, config: &EncounterConfig) -> u32 {
    let raw = accuracy.saturating_sub(defense);
    let min = config.min_hit_chance as i32;
    let max = config.max_hit_chance as i32;
    raw.clamp(min, max) as u32
}

/// Classify a d100 roll (1-100).
///
/// A roll at or under `hit_chance` hits; a hit at or under `critical_chance`
/// is critical.
pub fn classify_roll(roll: u32, hit_chance: u32, critical_chance: u32) -> AttackOutcome {
    if roll > hit_chance {
        AttackOutcome::Miss
    } else if roll <= critical_chance.min(hit_chance) {
        AttackOutcome::Critical
    } else {
        AttackOutcome::Hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_chance_is_clamped_into_band() {
        let config = EncounterConfig::default();
        assert_eq!(calculate_hit_chance(80, 10, &config), 70);
        assert_eq!(calculate_hit_chance(200, 0, &config), 95);
        assert_eq!(calculate_hit_chance(0, 90, &config), 10);
    }

    #[test]
    fn band_comes_from_config() {
        let config = EncounterConfig::default().with_hit_band(25, 60);
        assert_eq!(calculate_hit_chance(80, 10, &config), 60);
        assert_eq!(calculate_hit_chance(10, 10, &config), 25);
    }

    #[test]
    fn roll_classification() {
        assert_eq!(classify_roll(71, 70, 5), AttackOutcome::Miss);
        assert_eq!(classify_roll(70, 70, 5), AttackOutcome::Hit);
        assert_eq!(classify_roll(6, 70, 5), AttackOutcome::Hit);
        assert_eq!(classify_roll(5, 70, 5), AttackOutcome::Critical);
        // critical band never exceeds the hit chance
        assert_eq!(classify_roll(4, 3, 5), AttackOutcome::Miss);
        assert_eq!(classify_roll(3, 3, 5), AttackOutcome::Critical);
    }
}
