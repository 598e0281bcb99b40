//! Runs the bundled demo content end to end.

use std::path::Path;

use serde_json::Value;
use skirmish_cli::Client;
use skirmish_runtime::{Event, LifecycleEvent, TurnEvent};

fn data_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
}

async fn run_bundled() -> (Vec<String>, skirmish_core::EncounterSummary) {
    let client = Client::builder()
        .data_dir(data_dir())
        .env_overrides(false)
        .build()
        .await
        .unwrap();

    let mut out = Vec::new();
    let summary = client.run(&mut out).await.unwrap();
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    (lines, summary)
}

#[tokio::test(start_paused = true)]
async fn streams_from_initiative_to_end() {
    let (lines, summary) = run_bundled().await;

    let events: Vec<Event> = lines
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(matches!(
        events.first(),
        Some(Event::Turn(TurnEvent::InitiativeRolled { order })) if order.len() == 4
    ));
    match events.last() {
        Some(Event::Lifecycle(LifecycleEvent::EncounterEnded {
            reason,
            survivors,
            rounds,
        })) => {
            assert_eq!(*reason, summary.reason);
            assert_eq!(*survivors, summary.survivors);
            assert_eq!(*rounds, summary.rounds);
        }
        other => panic!("expected EncounterEnded last, got {other:?}"),
    }
    assert!(!summary.survivors.is_empty());

    // Every line is standalone JSON keyed by its topic.
    for line in &lines {
        let value: Value = serde_json::from_str(line).unwrap();
        let topic = value.as_object().unwrap().keys().next().unwrap().clone();
        assert!(["Turn", "Combat", "Lifecycle"].contains(&topic.as_str()));
    }
}

#[tokio::test(start_paused = true)]
async fn same_seed_replays_identically() {
    let (first, _) = run_bundled().await;
    let (second, _) = run_bundled().await;
    assert_eq!(first, second);
}
