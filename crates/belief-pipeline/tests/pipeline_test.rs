//! End-to-end cycles over an in-memory store: view creation, reconfirmation,
//! promotion, conflict flagging, expiry and counter-evidence.

use std::sync::Arc;

use belief_core::config::BeliefConfig;
use belief_core::errors::{BeliefError, ErrorCode};
use belief_core::models::{FlaggedCounterpart, ViewStatus, ViewType};
use belief_core::traits::{CancellationToken, Cancellable, IViewStorage};
use belief_core::models::DerivedView;
use belief_core::Event;
use belief_gate::{ConflictDetector, GateCriterion, GateDecision, PromotionGate};
use belief_pipeline::{BeliefPipeline, CounterEvidenceOutcome};
use belief_storage::InMemoryStore;
use chrono::{DateTime, Duration, Utc};
use test_fixtures::{daily_events, load_scenario, ts};

fn pipeline_over(events: Vec<Event>) -> BeliefPipeline {
    let store = Arc::new(InMemoryStore::new());
    store.insert_events(events).unwrap();
    BeliefPipeline::with_store(BeliefConfig::default(), store)
}

fn run(pipeline: &BeliefPipeline, user: &str, now: DateTime<Utc>) -> belief_pipeline::CycleReport {
    pipeline
        .run_user(user, now, &CancellationToken::new())
        .unwrap()
}

/// One hour after the daily event of day `n`.
fn day(n: i64) -> DateTime<Utc> {
    ts("2026-01-01T08:00:00Z") + Duration::days(n) + Duration::hours(1)
}

#[test]
fn apple_habit_becomes_an_active_view() {
    let scenario = load_scenario("habit_apples");
    let pipeline = pipeline_over(scenario.events);

    let report = run(&pipeline, &scenario.user_id, scenario.now);

    assert_eq!(report.events_analyzed, 5);
    assert_eq!(report.patterns_detected, 1);
    assert_eq!(report.views_created.len(), 1);
    assert!(report.promoted.is_empty());

    let views = pipeline.active_views(&scenario.user_id).unwrap();
    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.view_type, ViewType::Habit);
    assert_eq!(view.hypothesis, "often 吃 苹果");
    assert_eq!(view.derived_from.len(), 5);
    assert_eq!(view.time_span().num_days(), 10);
    assert!((view.confidence.value() - 0.87744).abs() < 1e-4);
    assert!(pipeline.current_concepts(&scenario.user_id).unwrap().is_empty());
}

#[test]
fn rerunning_a_cycle_on_the_same_snapshot_changes_nothing() {
    let scenario = load_scenario("habit_apples");
    let pipeline = pipeline_over(scenario.events);

    run(&pipeline, &scenario.user_id, scenario.now);
    let before = pipeline.active_views(&scenario.user_id).unwrap();
    let again = run(&pipeline, &scenario.user_id, scenario.now);

    assert!(again.views_created.is_empty());
    assert!(again.views_reconfirmed.is_empty());
    assert_eq!(pipeline.active_views(&scenario.user_id).unwrap(), before);
}

#[test]
fn daily_habit_is_reconfirmed_then_promoted() {
    let pipeline = pipeline_over(daily_events("u1", "吃", "苹果", ts("2026-01-01T08:00:00Z"), 46));

    let first = run(&pipeline, "u1", day(10));
    assert_eq!(first.views_created.len(), 1);
    let habit_id = first.views_created[0].clone();

    for n in [20, 30] {
        let report = run(&pipeline, "u1", day(n));
        assert!(report.views_reconfirmed.contains(&habit_id), "day {n}");
        assert!(report.promoted.is_empty(), "day {n}");
    }

    let promoting = run(&pipeline, "u1", day(40));
    let concept_id = promoting
        .concept_for(&habit_id)
        .expect("habit promoted on day 40")
        .to_string();

    let habit = pipeline.view(&habit_id).unwrap().unwrap();
    assert_eq!(habit.status, ViewStatus::Promoted);
    assert_eq!(habit.validated_count, 3);
    assert_eq!(habit.promoted_to.as_deref(), Some(concept_id.as_str()));

    let concepts = pipeline.current_concepts("u1").unwrap();
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0].canonical_name, "habit:吃:苹果");
    assert_eq!(concepts[0].version, 1);
    assert!(concepts[0].promotion_confidence > 0.85);
    assert_eq!(pipeline.metrics().snapshot().views_promoted, 1);
}

#[test]
fn steady_habit_after_promotion_keeps_a_single_version() {
    let pipeline = pipeline_over(daily_events("u1", "吃", "苹果", ts("2026-01-01T08:00:00Z"), 120));
    for n in [10, 20, 30, 40] {
        run(&pipeline, "u1", day(n));
    }
    let concept = pipeline.current_concepts("u1").unwrap().remove(0);

    for n in 41..120 {
        let report = run(&pipeline, "u1", day(n));
        assert!(report.promoted.is_empty(), "day {n}");
        assert!(report.views_created.is_empty(), "day {n}");
        assert_eq!(report.concepts_reconfirmed, vec![concept.concept_id.clone()], "day {n}");
    }

    let history = pipeline.registry().history("u1", "habit:吃:苹果").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].concept_id, concept.concept_id);
    assert!(history[0].is_current());
    assert_eq!(history[0].access_count, 79);
    assert_eq!(history[0].last_accessed_at, Some(day(119)));
    assert!(pipeline.active_views("u1").unwrap().is_empty());
}

#[test]
fn chinese_negation_contradicts_a_promoted_habit() {
    let pipeline = pipeline_over(daily_events("u1", "吃", "苹果", ts("2026-01-01T08:00:00Z"), 46));
    for n in [10, 20, 30, 40] {
        run(&pipeline, "u1", day(n));
    }
    let concepts = pipeline.current_concepts("u1").unwrap();
    assert_eq!(concepts[0].content.hypothesis, "often 吃 苹果");

    let evidence = (0..19).map(|i| format!("n{i}")).collect();
    let contrary = DerivedView::new("u1", "从不吃苹果", ViewType::Habit, evidence, day(40))
        .with_subject("吃", "苹果")
        .with_confidence(0.95)
        .with_validated_count(4)
        .with_evidence_span(day(5), day(41));

    let conflicts = ConflictDetector::new().conflicts_for(&contrary, &[], &concepts);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].counterpart.id(), concepts[0].concept_id);
    assert_eq!(conflicts[0].pair.positive, "often");
    assert_eq!(conflicts[0].pair.negative, "从不");

    match PromotionGate::default().decide(&contrary, &[], &concepts, day(41)) {
        GateDecision::Hold { failed, conflicts } => {
            assert!(failed.contains(&GateCriterion::NoConflict));
            assert_eq!(conflicts.len(), 1);
        }
        other => panic!("contradicting view must be held, got {other:?}"),
    }
}

#[test]
fn view_locks_are_released_after_each_cycle() {
    let pipeline = pipeline_over(daily_events("u1", "吃", "苹果", ts("2026-01-01T08:00:00Z"), 46));
    for n in [10, 20, 30, 40] {
        run(&pipeline, "u1", day(n));
        assert!(pipeline.locks().is_empty(), "day {n}");
    }

    let scenario = load_scenario("habit_apples");
    let other = pipeline_over(scenario.events);
    let report = run(&other, &scenario.user_id, scenario.now);
    other
        .counter_evidence()
        .record(&report.views_created[0], &["c1".to_string()], scenario.now)
        .unwrap();
    run(&other, &scenario.user_id, scenario.now + Duration::hours(1));
    assert!(other.locks().is_empty());
}

#[test]
fn stopping_a_promoted_habit_flags_a_conflict_with_the_concept() {
    let pipeline = pipeline_over(daily_events("u1", "吃", "苹果", ts("2026-01-01T08:00:00Z"), 46));
    for n in [10, 20, 30, 40] {
        run(&pipeline, "u1", day(n));
    }
    let concept = pipeline.current_concepts("u1").unwrap().remove(0);

    let report = run(&pipeline, "u1", day(80));
    assert!(!report.flagged.is_empty());

    let flagged = pipeline.flagged_conflicts("u1").unwrap();
    let against_concept = flagged
        .iter()
        .find(|f| matches!(&f.counterpart, FlaggedCounterpart::Concept(c) if c.concept_id == concept.concept_id))
        .expect("stopped habit contradicts the concept");
    assert_eq!(against_concept.view.hypothesis, "rarely 吃 苹果 anymore");
    assert_eq!(against_concept.conflict.target, "苹果");
    assert_eq!(against_concept.conflict.pair.positive, "often");
    assert!(against_concept.view.is_active());

    // Flagging never touches the registry.
    let current = pipeline.current_concepts("u1").unwrap();
    assert_eq!(current, vec![concept.clone()]);

    // Once the concept is withdrawn the pairing is no longer reported.
    pipeline
        .registry()
        .deprecate(&concept.concept_id, Some("user changed"), day(81))
        .unwrap();
    let flagged = pipeline.flagged_conflicts("u1").unwrap();
    assert!(flagged
        .iter()
        .all(|f| !matches!(f.counterpart, FlaggedCounterpart::Concept(_))));
}

#[test]
fn two_contradicting_views_are_reported_once() {
    let store = Arc::new(InMemoryStore::new());
    let now = day(20);
    let often = DerivedView::new("u1", "often eat apple", ViewType::Habit, vec!["e1".into()], now)
        .with_subject("eat", "apple")
        .with_confidence(0.6);
    let rarely = DerivedView::new("u1", "rarely eat apple lately", ViewType::Anomaly, vec!["e2".into()], now)
        .with_subject("eat", "apple")
        .with_confidence(0.6);
    store.insert_view(&often).unwrap();
    store.insert_view(&rarely).unwrap();
    let pipeline = BeliefPipeline::with_store(BeliefConfig::default(), store);

    let report = run(&pipeline, "u1", now);
    assert_eq!(report.flagged.len(), 2);

    let flagged = pipeline.flagged_conflicts("u1").unwrap();
    assert_eq!(flagged.len(), 1);
    let ids = [often.id.as_str(), rarely.id.as_str()];
    assert!(ids.contains(&flagged[0].view.id.as_str()));
    match &flagged[0].counterpart {
        FlaggedCounterpart::View(other) => {
            assert!(ids.contains(&other.id.as_str()));
            assert_ne!(other.id, flagged[0].view.id);
        }
        other => panic!("expected a view counterpart, got {other:?}"),
    }
}

#[test]
fn silent_views_expire_on_a_later_cycle() {
    let scenario = load_scenario("habit_apples");
    let pipeline = pipeline_over(scenario.events);
    let created = run(&pipeline, &scenario.user_id, scenario.now);

    let later = run(&pipeline, &scenario.user_id, scenario.now + Duration::days(61));

    assert_eq!(later.expired, created.views_created);
    assert!(pipeline.active_views(&scenario.user_id).unwrap().is_empty());
    let view = pipeline.view(&created.views_created[0]).unwrap().unwrap();
    assert_eq!(view.status, ViewStatus::Expired);
}

#[test]
fn malformed_batch_fails_with_input_error_and_writes_nothing() {
    let scenario = load_scenario("malformed_batch");
    let pipeline = pipeline_over(scenario.events);

    let err = pipeline
        .run_user(&scenario.user_id, scenario.now, &CancellationToken::new())
        .unwrap_err();

    assert!(matches!(err, BeliefError::InputError { .. }));
    assert_eq!(err.error_code(), "INPUT_ERROR");
    assert!(pipeline.active_views(&scenario.user_id).unwrap().is_empty());
}

#[test]
fn cancelled_cycle_reports_cancelled() {
    let scenario = load_scenario("habit_apples");
    let pipeline = pipeline_over(scenario.events);
    let token = CancellationToken::new();
    token.cancel();

    let err = pipeline
        .run_user(&scenario.user_id, scenario.now, &token)
        .unwrap_err();
    assert!(matches!(err, BeliefError::Cancelled { .. }));
}

#[test]
fn counter_evidence_accumulates_then_rejects() {
    let scenario = load_scenario("habit_apples");
    let pipeline = pipeline_over(scenario.events);
    let report = run(&pipeline, &scenario.user_id, scenario.now);
    let view_id = report.views_created[0].clone();
    let recorder = pipeline.counter_evidence();
    let at = scenario.now + Duration::hours(2);

    // Supporting evidence cannot also count against the view.
    let outcome = recorder.record(&view_id, &["apple-1".to_string()], at).unwrap();
    assert_eq!(outcome, CounterEvidenceOutcome::Unchanged);

    let outcome = recorder.record(&view_id, &["c1".to_string()], at).unwrap();
    match outcome {
        CounterEvidenceOutcome::Recorded { added, ratio, rejected } => {
            assert_eq!(added, 1);
            assert!((ratio - 1.0 / 6.0).abs() < 1e-9);
            assert!(!rejected);
        }
        other => panic!("unexpected {other:?}"),
    }

    let ids: Vec<String> = ["c1", "c2", "c3"].iter().map(|s| s.to_string()).collect();
    let outcome = recorder.record(&view_id, &ids, at).unwrap();
    assert!(matches!(
        outcome,
        CounterEvidenceOutcome::Recorded { added: 2, rejected: true, .. }
    ));
    let view = pipeline.view(&view_id).unwrap().unwrap();
    assert_eq!(view.status, ViewStatus::Rejected);
    assert_eq!(view.counter_evidence.len(), 3);

    let outcome = recorder.record(&view_id, &["c4".to_string()], at).unwrap();
    assert_eq!(
        outcome,
        CounterEvidenceOutcome::Ignored {
            status: ViewStatus::Rejected
        }
    );
}

#[test]
fn counter_evidence_for_unknown_view_is_not_found() {
    let pipeline = pipeline_over(Vec::new());
    let err = pipeline
        .counter_evidence()
        .record("view_missing", &["c1".to_string()], Utc::now())
        .unwrap_err();
    assert!(matches!(err, BeliefError::ViewNotFound { .. }));
}

#[test]
fn users_never_see_each_other() {
    let mut events = daily_events("alice", "drink", "tea", ts("2026-01-01T08:00:00Z"), 12);
    events.extend(daily_events("bob", "drink", "coffee", ts("2026-01-01T09:00:00Z"), 12));
    let pipeline = pipeline_over(events);

    run(&pipeline, "alice", day(11));
    let bob = run(&pipeline, "bob", day(11));

    assert_eq!(bob.events_analyzed, 12);
    let alice_views = pipeline.active_views("alice").unwrap();
    let bob_views = pipeline.active_views("bob").unwrap();
    assert!(alice_views.iter().all(|v| v.user_id == "alice"));
    assert!(bob_views.iter().all(|v| v.hypothesis.contains("coffee")));
}
