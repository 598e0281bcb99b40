mod common;

use std::time::Duration;

use skirmish_core::{
    ActionKind, ActionOutcome, ActionRequest, AttackOutcome, ConfigError, CreateError,
    EncounterConfig, EncounterState, EndReason, HitPoints, JoinError, ParticipantId, SubmitError,
    TimeoutAction, TurnId,
};
use skirmish_runtime::{
    CombatEvent, Event, LifecycleEvent, RuntimeConfig, RuntimeError, Topic, TurnEvent,
};
use tokio::time::Instant;

use common::{A, B, C, duel, next_event, spec, wait_for};

#[tokio::test(start_paused = true)]
async fn elapsed_window_applies_default_action() {
    let runtime = duel(EncounterConfig::default(), &[]).build().await.unwrap();
    let handle = runtime.handle();
    let mut events = handle.subscribe_all();
    let started = Instant::now();

    assert!(matches!(
        next_event(&mut events).await,
        Event::Turn(TurnEvent::InitiativeRolled { .. })
    ));
    assert_eq!(
        next_event(&mut events).await,
        Event::Turn(TurnEvent::TurnStarted {
            participant: A,
            turn: TurnId(1),
            round: 1,
            deadline: Duration::from_secs(30),
        })
    );

    let Event::Turn(TurnEvent::TurnWarning {
        participant,
        remaining,
        ..
    }) = next_event(&mut events).await
    else {
        panic!("expected a timeout warning");
    };
    assert_eq!(participant, A);
    assert!(remaining <= Duration::from_secs(10));
    assert!(remaining > Duration::from_secs(9));

    let Event::Combat(CombatEvent::ActionResolved { result }) = next_event(&mut events).await
    else {
        panic!("expected the default action");
    };
    assert!(result.timed_out);
    assert_eq!(result.actor, A);
    assert_eq!(result.outcome, ActionOutcome::Defend { bonus: 20 });
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30));
    assert!(elapsed < Duration::from_secs(31));

    assert!(matches!(
        next_event(&mut events).await,
        Event::Turn(TurnEvent::TurnStarted {
            participant: B,
            turn: TurnId(2),
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn timeout_action_follows_config() {
    let config = EncounterConfig::default().with_timeout_action(TimeoutAction::Pass);
    let runtime = duel(config, &[]).build().await.unwrap();
    let mut combat = runtime.handle().subscribe(Topic::Combat);

    let Event::Combat(CombatEvent::ActionResolved { result }) = next_event(&mut combat).await
    else {
        panic!("expected the default action");
    };
    assert!(result.timed_out);
    assert_eq!(result.outcome, ActionOutcome::Pass);
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_keeps_the_deadline() {
    let runtime = duel(EncounterConfig::default(), &[]).build().await.unwrap();
    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);
    let started = Instant::now();

    tokio::time::sleep(Duration::from_secs(25)).await;
    let err = handle
        .submit_action(A, ActionKind::Attack {
            target: ParticipantId(99),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Submit(SubmitError::InvalidTarget { .. })
    ));

    assert!(matches!(
        next_event(&mut combat).await,
        Event::Combat(CombatEvent::ActionRejected { participant: A, .. })
    ));
    let Event::Combat(CombatEvent::ActionResolved { result }) = next_event(&mut combat).await
    else {
        panic!("expected the default action");
    };
    assert!(result.timed_out);
    assert_eq!(result.turn, TurnId(1));
    assert!(started.elapsed() < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn submissions_resolve_in_turn_order() {
    // A: d100 42 vs 70% -> hit for 5 + 3
    let runtime = duel(EncounterConfig::default(), &[41, 3]).build().await.unwrap();
    let handle = runtime.handle();

    let err = handle.submit_action(B, ActionKind::Defend).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Submit(SubmitError::OutOfTurn {
            participant: B,
            active: A,
        })
    ));

    let result = handle
        .submit_action(A, ActionKind::Attack { target: B })
        .await
        .unwrap();
    assert!(!result.timed_out);
    assert_eq!(
        result.outcome,
        ActionOutcome::Attack {
            target: B,
            outcome: AttackOutcome::Hit,
            roll: 42,
            hit_chance: 70,
            damage: 8,
            target_hit_points: HitPoints::new(7, 15),
        }
    );

    // a second decision for the closed turn changes nothing
    let err = handle
        .submit(ActionRequest::new(A, ActionKind::Defend).for_turn(TurnId(1)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Submit(SubmitError::StaleSubmission { participant: A, .. })
    ));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.active_window().unwrap().participant, B);
    assert_eq!(
        snapshot.participant(B).unwrap().hit_points,
        HitPoints::new(7, 15)
    );
    assert_eq!(snapshot.participant(A).unwrap().defending, None);
}

#[tokio::test(start_paused = true)]
async fn leaving_mid_duel_ends_the_encounter() {
    let runtime = duel(EncounterConfig::default(), &[]).build().await.unwrap();
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    let departed = handle.leave(A).await.unwrap();
    assert_eq!(departed.name, "Aldric");

    assert_eq!(
        next_event(&mut lifecycle).await,
        Event::Lifecycle(LifecycleEvent::ParticipantLeft {
            participant: A,
            name: "Aldric".into(),
        })
    );
    assert!(matches!(
        next_event(&mut lifecycle).await,
        Event::Lifecycle(LifecycleEvent::EncounterEnded { .. })
    ));

    let summary = handle.finished().await.unwrap();
    assert_eq!(summary.reason.to_string(), "Aldric left");
    assert_eq!(summary.survivors, vec![B]);
    assert!(handle.is_ended());
}

#[tokio::test(start_paused = true)]
async fn ended_encounter_keeps_answering() {
    let runtime = duel(EncounterConfig::default(), &[]).build().await.unwrap();
    let handle = runtime.handle();
    let summary = handle.stop().await.unwrap();
    assert_eq!(summary.reason, EndReason::Stopped);

    let err = handle.submit_action(A, ActionKind::Pass).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Submit(SubmitError::EncounterEnded)));

    let err = handle.join(spec(C), None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Join(JoinError::EncounterEnded)));

    assert_eq!(handle.stop().await.unwrap(), summary);
    assert_eq!(handle.snapshot().await.unwrap().state, EncounterState::Ended);

    // no timer survives the end
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(handle.finished().await.unwrap(), summary);
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_stops_the_encounter() {
    let runtime = duel(EncounterConfig::default(), &[]).build().await.unwrap();
    let mut events = runtime.handle().subscribe_all();
    drop(runtime);

    let ended = wait_for(&mut events, |event| {
        matches!(event, Event::Lifecycle(LifecycleEvent::EncounterEnded { .. }))
    })
    .await;
    assert!(matches!(
        ended,
        Event::Lifecycle(LifecycleEvent::EncounterEnded {
            reason: EndReason::Stopped,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn joiner_takes_its_initiative_slot() {
    // C rolls 5: between A (20) and B (1)
    let runtime = duel(EncounterConfig::default(), &[4]).build().await.unwrap();
    let handle = runtime.handle();
    let mut events = handle.subscribe_all();

    let entry = handle.join(spec(C), None).await.unwrap().unwrap();
    assert_eq!(entry.participant, C);
    assert_eq!(entry.score, 5);

    handle.submit_action(A, ActionKind::Defend).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.active_window().unwrap().participant, C);

    assert!(matches!(
        wait_for(&mut events, |event| matches!(event, Event::Lifecycle(_))).await,
        Event::Lifecycle(LifecycleEvent::ParticipantJoined {
            participant: C,
            initiative: Some(5),
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn unbounded_turn_duration_is_refused_at_build() {
    let config = RuntimeConfig::default()
        .with_overrides(|key| (key == "SKIRMISH_TURN_SECS").then(|| u64::MAX.to_string()))
        .unwrap();

    let err = duel(EncounterConfig::default(), &[])
        .config(config)
        .build()
        .await
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RuntimeError::Create(CreateError::Config(ConfigError::TurnDurationTooLong { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn longest_turn_duration_still_times_out() {
    let mut config = EncounterConfig::default();
    config.turn_duration_secs = EncounterConfig::MAX_TURN_DURATION_SECS;
    let runtime = duel(config, &[]).build().await.unwrap();
    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    let Event::Combat(CombatEvent::ActionResolved { result }) = next_event(&mut combat).await
    else {
        panic!("expected the default action");
    };
    assert!(result.timed_out);
    assert_eq!(result.actor, A);
    assert!(handle.snapshot().await.is_ok());
}
