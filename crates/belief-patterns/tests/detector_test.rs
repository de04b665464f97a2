use belief_core::errors::ErrorCode;
use belief_core::models::{PatternMetadata, PatternType};
use belief_core::traits::{Cancellable, CancellationToken};
use belief_core::{BeliefError, TimeRange};
use belief_patterns::PatternDetector;
use chrono::Duration;
use test_fixtures::{load_scenario, spaced_events, ts};

#[test]
fn habit_scenario_yields_single_high_frequency_pattern() {
    let scenario = load_scenario("habit_apples");
    let detector = PatternDetector::default();
    let window = detector.window_ending(scenario.now);

    let result = detector
        .detect(&scenario.user_id, &scenario.events, window, &CancellationToken::new())
        .unwrap();

    assert_eq!(result.events_analyzed, 5);
    assert_eq!(result.patterns.len(), 1);
    let p = &result.patterns[0];
    assert_eq!(p.pattern_type, PatternType::HighFrequency);
    assert_eq!((p.action.as_str(), p.target.as_str()), ("吃", "苹果"));
    assert_eq!(p.evidence_count(), 5);
    assert!((p.time_span_days() - 10.0).abs() < 1e-9);
    assert!(p.consistency > 0.8 && p.consistency <= 1.0);
}

#[test]
fn weekday_scenario_yields_routine() {
    let scenario = load_scenario("weekday_routine");
    let detector = PatternDetector::default();
    let window = detector.window_ending(scenario.now);
    let result = detector
        .detect(&scenario.user_id, &scenario.events, window, &CancellationToken::new())
        .unwrap();

    let temporal: Vec<_> = result.of_type(PatternType::Temporal).collect();
    assert_eq!(temporal.len(), 1);
    match &temporal[0].metadata {
        PatternMetadata::Temporal { weekdays, .. } => assert_eq!(weekdays, &vec![0, 3]),
        other => panic!("unexpected metadata {other:?}"),
    }
    assert_eq!(result.of_type(PatternType::HighFrequency).count(), 0);
}

#[test]
fn detection_is_idempotent_over_the_same_snapshot() {
    let scenario = load_scenario("habit_apples");
    let detector = PatternDetector::default();
    let window = detector.window_ending(scenario.now);
    let token = CancellationToken::new();

    let first = detector.detect(&scenario.user_id, &scenario.events, window, &token).unwrap();
    let mut reversed = scenario.events.clone();
    reversed.reverse();
    let second = detector.detect(&scenario.user_id, &reversed, window, &token).unwrap();

    assert_eq!(first.patterns, second.patterns);
}

#[test]
fn malformed_batch_is_an_input_error() {
    let scenario = load_scenario("malformed_batch");
    let detector = PatternDetector::default();
    let err = detector
        .detect(
            &scenario.user_id,
            &scenario.events,
            detector.window_ending(scenario.now),
            &CancellationToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, BeliefError::InputError { .. }));
    assert_eq!(err.error_code(), "INPUT_ERROR");
}

#[test]
fn foreign_events_are_rejected() {
    let now = ts("2026-03-01T00:00:00Z");
    let events = spaced_events("someone-else", "eat", "apple", now - Duration::days(3), 3, 24, "x");
    let detector = PatternDetector::default();
    let err = detector
        .detect("u1", &events, detector.window_ending(now), &CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, BeliefError::InputError { .. }));
}

#[test]
fn empty_history_is_not_an_error() {
    let detector = PatternDetector::default();
    let now = ts("2026-03-01T00:00:00Z");
    let result = detector
        .detect("u1", &[], detector.window_ending(now), &CancellationToken::new())
        .unwrap();
    assert!(result.patterns.is_empty());
}

#[test]
fn cancelled_run_returns_cancelled() {
    let scenario = load_scenario("habit_apples");
    let detector = PatternDetector::default();
    let token = CancellationToken::new();
    token.cancel();
    let err = detector
        .detect(&scenario.user_id, &scenario.events, detector.window_ending(scenario.now), &token)
        .unwrap_err();
    assert!(matches!(err, BeliefError::Cancelled { .. }));
}

#[test]
fn several_families_can_fire_on_the_same_events() {
    let now = ts("2026-03-01T00:00:00Z");
    let detector = PatternDetector::default();
    let window = detector.window_ending(now);
    // 0.2/day during the baseline, daily inside the window.
    let mut events = spaced_events("u1", "buy", "coffee", window.start - Duration::days(29), 6, 120, "b");
    events.extend(spaced_events("u1", "buy", "coffee", window.start + Duration::hours(1), 30, 24, "w"));

    let result = detector.detect("u1", &events, window, &CancellationToken::new()).unwrap();

    assert_eq!(result.of_type(PatternType::HighFrequency).count(), 1);
    assert_eq!(result.of_type(PatternType::Anomaly).count(), 1);
    assert_eq!(result.events_analyzed, 30);
}

#[test]
fn snapshot_range_covers_baseline_and_window() {
    let detector = PatternDetector::default();
    let now = ts("2026-03-01T00:00:00Z");
    let window = detector.window_ending(now);
    let snapshot = detector.snapshot_range(&window);
    assert_eq!(snapshot, TimeRange::new(now - Duration::days(60), now));
}
