//! Worker tasks that back the runtime orchestration.
//!
//! Each running encounter is owned by exactly one encounter worker; workers
//! share nothing, so independent encounters progress in parallel.

mod encounter;

pub use encounter::{Command, EncounterWorker};
