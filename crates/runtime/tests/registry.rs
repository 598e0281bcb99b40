mod common;

use skirmish_core::{ActionKind, EncounterConfig, EncounterId};
use skirmish_runtime::{EncounterRegistry, RuntimeError};

use common::{A, B, duel};

#[tokio::test(start_paused = true)]
async fn encounters_are_independent() {
    let registry = EncounterRegistry::new();
    let first = registry
        .start(duel(EncounterConfig::default(), &[]))
        .await
        .unwrap();
    let second = registry
        .start(duel(EncounterConfig::default(), &[]))
        .await
        .unwrap();

    assert_eq!(first.id(), EncounterId(1));
    assert_eq!(second.id(), EncounterId(2));
    assert_eq!(registry.ids().await, vec![EncounterId(1), EncounterId(2)]);

    let result = registry
        .submit_action(EncounterId(1), A, ActionKind::Defend)
        .await
        .unwrap();
    assert_eq!(result.actor, A);

    let first_window = first.snapshot().await.unwrap().active_window().unwrap();
    let second_window = second.snapshot().await.unwrap().active_window().unwrap();
    assert_eq!(first_window.participant, B);
    assert_eq!(second_window.participant, A);
}

#[tokio::test(start_paused = true)]
async fn unknown_encounter_is_rejected() {
    let registry = EncounterRegistry::new();
    let err = registry
        .submit_action(EncounterId(7), A, ActionKind::Pass)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownEncounter(EncounterId(7))));
    assert!(registry.get(EncounterId(7)).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn prune_drops_only_ended_encounters() {
    let registry = EncounterRegistry::new();
    let running = registry
        .start(duel(EncounterConfig::default(), &[]))
        .await
        .unwrap();
    let stopped = registry
        .start(duel(EncounterConfig::default(), &[]))
        .await
        .unwrap();
    stopped.stop().await.unwrap();

    assert_eq!(registry.prune_ended().await, vec![stopped.id()]);
    assert_eq!(registry.len().await, 1);
    assert!(registry.get(running.id()).await.is_some());

    let runtime = registry.remove(running.id()).await.unwrap();
    assert!(registry.is_empty().await);
    drop(running);
    drop(stopped);
    let summary = runtime.shutdown().await.unwrap();
    assert!(summary.survivors.contains(&A));
}
