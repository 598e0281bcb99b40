//! RNG oracle for deterministic random number generation.
//!
//! Every random draw in an encounter (initiative, hit roll, damage, flee) is
//! derived from a seed computed from the encounter seed, the action nonce, the
//! participant, and a [`RollContext`]. Given the same seed and the same
//! sequence of submissions, an encounter replays identically.

use std::collections::VecDeque;
use std::sync::Mutex;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same values given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        // Widened so a span covering all of u32 does not overflow.
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// RNG that replays a fixed script of raw draws, ignoring seeds.
///
/// Once the script runs out it keeps returning the last value (or zero).
/// Used to pin exact outcomes in scenario tests and demos.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    script: Mutex<VecDeque<u32>>,
    last: Mutex<u32>,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: Mutex::new(draws.into_iter().collect()),
            last: Mutex::new(0),
        }
    }

    /// Appends draws to the end of the script.
    pub fn push(&self, draws: impl IntoIterator<Item = u32>) {
        if let Ok(mut script) = self.script.lock() {
            script.extend(draws);
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let Ok(mut last) = self.last.lock() else {
            return next.unwrap_or(0);
        };
        if let Some(value) = next {
            *last = value;
        }
        *last
    }
}

/// Distinguishes independent draws made for the same action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollContext {
    Initiative = 0,
    Hit = 1,
    Damage = 2,
    Flee = 3,
}

/// Compute deterministic seed from encounter state components.
///
/// * `encounter_seed` - Base seed set at encounter creation
/// * `nonce` - Action sequence number (increments each resolved action)
/// * `participant` - Participant the roll is made for
/// * `context` - Which of the action's rolls this is
pub fn compute_seed(encounter_seed: u64, nonce: u64, participant: u64, context: RollContext) -> u64 {
    // SplitMix64 / FxHash multipliers
    let mut hash = encounter_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= participant.wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        let seed = compute_seed(42, 7, 3, RollContext::Hit);
        assert_eq!(rng.next_u32(seed), rng.next_u32(seed));
        assert_ne!(
            compute_seed(42, 7, 3, RollContext::Hit),
            compute_seed(42, 7, 3, RollContext::Damage)
        );
    }

    #[test]
    fn range_stays_inclusive() {
        let rng = PcgRng;
        for seed in 0..500 {
            let value = rng.range(seed, 5, 10);
            assert!((5..=10).contains(&value));
            let roll = rng.roll_d100(seed);
            assert!((1..=100).contains(&roll));
        }
        assert_eq!(rng.range(1, 7, 7), 7);
    }

    #[test]
    fn range_spanning_all_of_u32() {
        for seed in 0..100 {
            let _ = PcgRng.range(seed, 0, u32::MAX);
            assert!(PcgRng.range(seed, 1, u32::MAX) >= 1);
        }
        let rng = ScriptedRng::new([u32::MAX, 7]);
        assert_eq!(rng.range(0, 0, u32::MAX), u32::MAX);
        assert_eq!(rng.range(0, 0, u32::MAX), 7);
    }

    #[test]
    fn scripted_rng_replays_and_sticks() {
        let rng = ScriptedRng::new([9, 3]);
        assert_eq!(rng.roll_d100(0), 10);
        assert_eq!(rng.range(0, 5, 10), 8);
        assert_eq!(rng.remaining(), 0);
        assert_eq!(rng.next_u32(0), 3);
    }
}
