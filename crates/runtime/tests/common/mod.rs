#![allow(dead_code)]

use std::sync::Arc;

use skirmish_core::{
    EncounterConfig, HitPoints, ParticipantId, ParticipantSpec, ScriptedRng, StatBlock,
};
use skirmish_runtime::{EncounterRuntime, EncounterRuntimeBuilder, Event, StaticStatProvider};
use tokio::sync::broadcast;

pub const A: ParticipantId = ParticipantId(1);
pub const B: ParticipantId = ParticipantId(2);
pub const C: ParticipantId = ParticipantId(3);

fn block(hp: u32, accuracy: i32, defense: i32, damage_min: u32, damage_max: u32) -> StatBlock {
    StatBlock {
        hit_points: HitPoints::full(hp),
        accuracy,
        defense,
        damage_min,
        damage_max,
        initiative_mod: 0,
    }
}

pub fn stats() -> StaticStatProvider {
    StaticStatProvider::new()
        .with(A, block(20, 80, 0, 5, 10))
        .with(B, block(15, 40, 10, 1, 4))
        .with(C, block(12, 50, 5, 2, 5))
}

pub fn spec(id: ParticipantId) -> ParticipantSpec {
    let name = match id {
        A => "Aldric",
        B => "Brute",
        _ => "Cutter",
    };
    ParticipantSpec::new(id, name)
}

/// A duel where A rolls initiative 20 and B rolls 1, then `draws` follow.
pub fn duel(config: EncounterConfig, draws: &[u32]) -> EncounterRuntimeBuilder {
    let mut script = vec![19, 0];
    script.extend_from_slice(draws);
    EncounterRuntime::builder()
        .encounter_config(config)
        .stats(Arc::new(stats()))
        .rng(Arc::new(ScriptedRng::new(script)))
        .participants([spec(A), spec(B)])
}

pub async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
    rx.recv().await.expect("event bus closed")
}

/// Skips events until one matches.
pub async fn wait_for(
    rx: &mut broadcast::Receiver<Event>,
    matches: impl Fn(&Event) -> bool,
) -> Event {
    loop {
        let event = next_event(rx).await;
        if matches(&event) {
            return event;
        }
    }
}
