//! Attack resolution arithmetic.
//!
//! Pure functions only: nothing here touches participants. The resolver
//! feeds in effective stats and a random source, then applies the returned
//! [`AttackResult`] itself.
//!
//! - `calculate_hit_chance`: accuracy vs defense, clamped to the configured band
//! - `classify_roll`: d100 roll against hit chance and critical chance
//! - `roll_damage`: damage draw from the attacker's range
//! - `resolve_attack`: all of the above in order

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::roll_damage;
pub use hit::{calculate_hit_chance, classify_roll};
pub use result::{AttackOutcome, AttackResult, AttackSeeds, resolve_attack};
