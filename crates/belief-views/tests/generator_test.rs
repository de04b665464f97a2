use belief_core::models::{DetectedPattern, PatternMetadata, PatternType, ViewStatus, ViewType};
use belief_core::traits::CancellationToken;
use belief_core::TimeRange;
use belief_patterns::PatternDetector;
use belief_views::{Reconfirmation, ViewGenerator, ViewGeneratorBuilder};
use chrono::{DateTime, Duration, Utc};
use test_fixtures::{load_scenario, ts};

fn habit_pattern(evidence: &[&str], first: DateTime<Utc>, last: DateTime<Utc>) -> DetectedPattern {
    DetectedPattern {
        id: DetectedPattern::derive_id("u1", PatternType::HighFrequency, "eat", "apple", "", &TimeRange::new(first, last)),
        pattern_type: PatternType::HighFrequency,
        user_id: "u1".into(),
        action: "eat".into(),
        target: "apple".into(),
        description: "Frequently eat apple".into(),
        evidence: evidence.iter().map(|s| s.to_string()).collect(),
        consistency: 0.9,
        first_seen: first,
        last_seen: last,
        metadata: PatternMetadata::HighFrequency { occurrences_per_day: 0.5 },
    }
}

#[test]
fn habit_scenario_produces_habit_view_with_formula_confidence() {
    let scenario = load_scenario("habit_apples");
    let detector = PatternDetector::default();
    let result = detector
        .detect(
            &scenario.user_id,
            &scenario.events,
            detector.window_ending(scenario.now),
            &CancellationToken::new(),
        )
        .unwrap();

    let generator = ViewGenerator::default();
    let views = generator.generate_views(&result.patterns, scenario.now);
    assert_eq!(views.len(), 1);
    let view = &views[0];

    let expected = 1.0 * (1.0 + 0.3 * 5f64.log10()) * (1.0 + 0.25 * (10.0f64 / 30.0).ln());
    assert_eq!(view.view_type, ViewType::Habit);
    assert_eq!(view.status, ViewStatus::Active);
    assert!((view.confidence.value() - expected).abs() < 1e-9);
    assert!((view.confidence.value() - 0.87744).abs() < 1e-4);
    assert_eq!(view.derived_from.len(), 5);
    assert_eq!(view.validated_count, 0);
    assert_eq!(view.time_span(), Duration::days(10));
    assert_eq!(view.hypothesis, "often 吃 苹果");
}

#[test]
fn low_confidence_patterns_are_dropped_not_errors() {
    let now = ts("2026-02-01T00:00:00Z");
    let pattern = habit_pattern(&["e1", "e2", "e3"], now - Duration::hours(3), now);
    // One-day span: timespan bonus bottoms out.
    let generator = ViewGenerator::default();
    assert!(generator.confidence_for(&pattern).value() < 0.5);
    assert!(generator.generate_view(&pattern, now).is_none());
    assert!(generator.generate_views(&[pattern], now).is_empty());
}

#[test]
fn filtered_generation_applies_the_stricter_floor() {
    let now = ts("2026-02-01T00:00:00Z");
    let pattern = habit_pattern(&["e1", "e2", "e3", "e4", "e5"], now - Duration::days(10), now);
    let generator = ViewGenerator::default();
    assert_eq!(generator.generate_views_filtered(&[pattern.clone()], now, 0.6).len(), 1);
    assert!(generator.generate_views_filtered(&[pattern], now, 0.95).is_empty());
}

#[test]
fn custom_expiration_is_clamped_into_lifetime_bounds() {
    let now = ts("2026-02-01T00:00:00Z");
    let pattern = habit_pattern(&["e1", "e2", "e3", "e4", "e5"], now - Duration::days(10), now);
    let generator = ViewGenerator::default();
    let view = generator
        .generate_view_with_expiration(&pattern, now, now + Duration::days(365))
        .unwrap();
    assert_eq!(view.expires_at, now + Duration::days(60));
}

#[test]
fn reconfirmation_appends_evidence_and_rescores() {
    let day0 = ts("2026-01-01T00:00:00Z");
    let generator = ViewGenerator::default();
    let mut view = generator
        .generate_view(
            &habit_pattern(&["e1", "e2", "e3", "e4", "e5"], day0, day0 + Duration::days(10)),
            day0 + Duration::days(10),
        )
        .unwrap();
    let original_expiry = view.expires_at;
    let before = view.confidence;

    let later = habit_pattern(
        &["e4", "e5", "e6", "e7", "e8", "e9", "e10"],
        day0 + Duration::days(6),
        day0 + Duration::days(20),
    );
    let outcome = generator.reconfirm(&mut view, &later, day0 + Duration::days(20));

    assert!(matches!(outcome, Reconfirmation::Reconfirmed { new_evidence: 5, .. }));
    assert_eq!(view.derived_from.len(), 10);
    assert_eq!(view.derived_from[0], "e1");
    assert_eq!(view.validated_count, 1);
    assert_eq!(view.time_span(), Duration::days(20));
    assert!(view.confidence > before);
    assert_eq!(view.expires_at, original_expiry);
    assert_eq!(view.last_validated_at, Some(day0 + Duration::days(20)));
}

#[test]
fn reconfirming_with_known_evidence_changes_nothing() {
    let day0 = ts("2026-01-01T00:00:00Z");
    let generator = ViewGenerator::default();
    let pattern = habit_pattern(&["e1", "e2", "e3", "e4", "e5"], day0, day0 + Duration::days(10));
    let mut view = generator.generate_view(&pattern, day0 + Duration::days(10)).unwrap();
    let snapshot = view.clone();

    assert_eq!(
        generator.reconfirm(&mut view, &pattern, day0 + Duration::days(11)),
        Reconfirmation::NoNewEvidence
    );
    assert_eq!(view, snapshot);
}

#[test]
fn reconfirm_ignores_other_hypotheses_and_terminal_views() {
    let day0 = ts("2026-01-01T00:00:00Z");
    let generator = ViewGenerator::default();
    let mut view = generator
        .generate_view(&habit_pattern(&["e1", "e2", "e3", "e4", "e5"], day0, day0 + Duration::days(10)), day0)
        .unwrap();

    let mut other = habit_pattern(&["x1", "x2", "x3"], day0, day0 + Duration::days(10));
    other.target = "pear".into();
    assert_eq!(generator.reconfirm(&mut view, &other, day0), Reconfirmation::NotApplicable);

    view.transition(ViewStatus::Expired, day0).unwrap();
    let same = habit_pattern(&["e9"], day0, day0 + Duration::days(12));
    assert_eq!(generator.reconfirm(&mut view, &same, day0), Reconfirmation::NotApplicable);
}

#[test]
fn builder_overrides_multipliers_and_floor() {
    let now = ts("2026-02-01T00:00:00Z");
    let generator = ViewGeneratorBuilder::new()
        .with_high_frequency_multiplier(0.5)
        .with_min_confidence(0.2)
        .with_expiration_days(20)
        .build();
    let pattern = habit_pattern(&["e1", "e2", "e3", "e4", "e5"], now - Duration::days(10), now);
    let view = generator.generate_view(&pattern, now).unwrap();
    assert!((view.confidence.value() - 0.877_44 / 2.0).abs() < 1e-4);
    assert_eq!(generator.config().default_expiration_days, 20);
    assert!(view.expires_at >= now + Duration::days(15));
}
