//! Contract tests run against both backends: event range queries, view
//! round trips, atomic version appends, deprecation and access tracking.

use belief_core::errors::{BeliefError, ErrorCode};
use belief_core::models::{
    DerivedView, EventQuery, StableConcept, TimeRange, ViewStatus, ViewType,
};
use belief_core::traits::{IConceptStorage, IEventSource, IViewStorage};
use belief_storage::{InMemoryStore, StorageEngine};
use chrono::{DateTime, Duration, Utc};
use test_fixtures::{ts, EventBuilder};

trait Backend: IEventSource + IViewStorage + IConceptStorage {
    fn seed(&self, events: Vec<belief_core::Event>);
}

impl Backend for StorageEngine {
    fn seed(&self, events: Vec<belief_core::Event>) {
        self.insert_events(&events).unwrap();
    }
}

impl Backend for InMemoryStore {
    fn seed(&self, events: Vec<belief_core::Event>) {
        self.insert_events(events).unwrap();
    }
}

fn backends() -> Vec<(&'static str, Box<dyn Backend>)> {
    vec![
        ("sqlite", Box::new(StorageEngine::open_in_memory().unwrap())),
        ("memory", Box::new(InMemoryStore::new())),
    ]
}

fn now() -> DateTime<Utc> {
    ts("2026-03-01T12:00:00Z")
}

fn promotable_view(user: &str, hypothesis: &str) -> DerivedView {
    DerivedView::new(user, hypothesis, ViewType::Habit, vec!["e1".into()], now())
        .with_subject("eat", "apple")
        .with_confidence(0.9)
}

#[test]
fn query_events_filters_by_user_range_and_subject() {
    for (name, store) in backends() {
        let base = ts("2026-01-01T08:00:00Z");
        store.seed(vec![
            EventBuilder::new("a", "u1", base).build(),
            EventBuilder::new("b", "u1", base + Duration::days(1)).target("pear").build(),
            EventBuilder::new("c", "u1", base + Duration::days(5)).build(),
            EventBuilder::new("d", "u2", base + Duration::days(1)).build(),
        ]);

        let range = TimeRange::new(base, base + Duration::days(2));
        let all: Vec<_> = store
            .query_events(&EventQuery::for_user("u1", range))
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(all, vec!["a", "b"], "{name}");

        let apples = store
            .query_events(&EventQuery::for_user("u1", range).with_target("apple"))
            .unwrap();
        assert_eq!(apples.len(), 1, "{name}");
        assert_eq!(apples[0].id, "a", "{name}");
    }
}

#[test]
fn query_events_orders_ties_by_id() {
    for (name, store) in backends() {
        let t = ts("2026-01-01T08:00:00Z");
        store.seed(vec![
            EventBuilder::new("z", "u1", t).build(),
            EventBuilder::new("m", "u1", t).build(),
        ]);
        let ids: Vec<_> = store
            .query_events(&EventQuery::for_user("u1", TimeRange::last_n_days(now(), 90)))
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["m", "z"], "{name}");
    }
}

#[test]
fn view_round_trip_and_status_filter() {
    for (name, store) in backends() {
        let mut view = promotable_view("u1", "often eat apple");
        store.insert_view(&view).unwrap();
        assert_eq!(store.get_view(&view.id).unwrap().as_ref(), Some(&view), "{name}");

        view.transition(ViewStatus::Rejected, now()).unwrap();
        store.update_view(&view).unwrap();

        assert!(store.views_for_user("u1", Some(ViewStatus::Active)).unwrap().is_empty());
        let rejected = store.views_for_user("u1", Some(ViewStatus::Rejected)).unwrap();
        assert_eq!(rejected.len(), 1, "{name}");
        assert_eq!(store.views_for_user("u1", None).unwrap().len(), 1, "{name}");
    }
}

#[test]
fn update_of_unknown_view_is_not_found() {
    for (name, store) in backends() {
        let view = promotable_view("u1", "often eat apple");
        let err = store.update_view(&view).unwrap_err();
        assert!(matches!(err, BeliefError::ViewNotFound { .. }), "{name}: {err}");
    }
}

#[test]
fn append_version_deprecates_the_superseded_row() {
    for (name, store) in backends() {
        let view = promotable_view("u1", "often eat apple");
        let v1 = StableConcept::first_version(&view, "habit:eat:apple", now());
        store.append_version(&v1, None, now()).unwrap();

        let v2 = v1.superseded_by_view(&view, now());
        store
            .append_version(&v2, Some(&v1.concept_id), now())
            .unwrap();

        let current = store.current_concept("u1", "habit:eat:apple").unwrap().unwrap();
        assert_eq!(current.concept_id, v2.concept_id, "{name}");

        let chain = store.concept_chain("u1", "habit:eat:apple").unwrap();
        assert_eq!(chain.iter().map(|c| c.version).collect::<Vec<_>>(), vec![1, 2]);
        assert!(chain[0].is_deprecated, "{name}");
        assert_eq!(chain[0].deprecated_at, Some(now()), "{name}");
        assert!(!chain[1].is_deprecated, "{name}");
    }
}

#[test]
fn stale_supersedes_is_a_concurrency_error_and_commits_nothing() {
    for (name, store) in backends() {
        let view = promotable_view("u1", "often eat apple");
        let v1 = StableConcept::first_version(&view, "habit:eat:apple", now());
        store.append_version(&v1, None, now()).unwrap();

        // A second writer that believes the chain is still empty.
        let rival = StableConcept::first_version(&view, "habit:eat:apple", now());
        let err = store.append_version(&rival, None, now()).unwrap_err();
        assert_eq!(err.error_code(), "CONCURRENCY_ERROR", "{name}");

        let chain = store.concept_chain("u1", "habit:eat:apple").unwrap();
        assert_eq!(chain.len(), 1, "{name}");
        assert!(!chain[0].is_deprecated, "{name}");
    }
}

#[test]
fn duplicate_version_number_is_rejected() {
    for (name, store) in backends() {
        let view = promotable_view("u1", "often eat apple");
        let v1 = StableConcept::first_version(&view, "habit:eat:apple", now());
        store.append_version(&v1, None, now()).unwrap();

        let mut clash = v1.superseded_by_view(&view, now());
        clash.version = 1;
        let err = store
            .append_version(&clash, Some(&v1.concept_id), now())
            .unwrap_err();
        assert!(matches!(err, BeliefError::ConcurrencyError(_)), "{name}: {err}");
        assert!(store.current_concept("u1", "habit:eat:apple").unwrap().is_some());
    }
}

#[test]
fn deprecate_twice_is_a_noop() {
    for (name, store) in backends() {
        let view = promotable_view("u1", "often eat apple");
        let v1 = StableConcept::first_version(&view, "habit:eat:apple", now());
        store.append_version(&v1, None, now()).unwrap();

        let first = store
            .deprecate_concept(&v1.concept_id, now(), Some("user retracted"))
            .unwrap();
        assert!(!first.was_noop(), "{name}");
        assert_eq!(
            first.concept().deprecation_reason.as_deref(),
            Some("user retracted")
        );

        let later = now() + Duration::days(1);
        let second = store.deprecate_concept(&v1.concept_id, later, None).unwrap();
        assert!(second.was_noop(), "{name}");
        assert_eq!(second.concept().deprecated_at, Some(now()), "{name}");
        assert!(store.current_concepts("u1").unwrap().is_empty(), "{name}");
    }
}

#[test]
fn deprecating_unknown_concept_is_not_found() {
    for (name, store) in backends() {
        let err = store.deprecate_concept("nope", now(), None).unwrap_err();
        assert!(matches!(err, BeliefError::ConceptNotFound { .. }), "{name}");
    }
}

#[test]
fn record_access_counts_reads() {
    for (name, store) in backends() {
        let view = promotable_view("u1", "often eat apple");
        let v1 = StableConcept::first_version(&view, "habit:eat:apple", now());
        store.append_version(&v1, None, now()).unwrap();
        store.record_access(&v1.concept_id, now()).unwrap();
        store.record_access(&v1.concept_id, now()).unwrap();

        let stored = store.get_concept(&v1.concept_id).unwrap().unwrap();
        assert_eq!(stored.access_count, 2, "{name}");
        assert_eq!(stored.last_accessed_at, Some(now()), "{name}");
    }
}

#[test]
fn current_concepts_are_scoped_per_user() {
    for (name, store) in backends() {
        let a = promotable_view("u1", "often eat apple");
        let b = promotable_view("u2", "often eat apple");
        store
            .append_version(&StableConcept::first_version(&a, "habit:eat:apple", now()), None, now())
            .unwrap();
        store
            .append_version(&StableConcept::first_version(&b, "habit:eat:apple", now()), None, now())
            .unwrap();
        assert_eq!(store.current_concepts("u1").unwrap().len(), 1, "{name}");
        assert_eq!(store.current_concepts("u2").unwrap().len(), 1, "{name}");
    }
}

#[test]
fn file_backed_engine_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("belief.db");
    let view = promotable_view("u1", "often eat apple");
    let v1 = StableConcept::first_version(&view, "habit:eat:apple", now());
    {
        let engine = StorageEngine::open(&path).unwrap();
        assert!(engine.is_wal().unwrap());
        engine.insert_view(&view).unwrap();
        engine.append_version(&v1, None, now()).unwrap();
    }
    let engine = StorageEngine::open(&path).unwrap();
    assert_eq!(engine.schema_version().unwrap(), belief_storage::migrations::LATEST_VERSION);
    assert_eq!(engine.get_view(&view.id).unwrap(), Some(view));
    assert_eq!(
        engine.current_concept("u1", "habit:eat:apple").unwrap().map(|c| c.concept_id),
        Some(v1.concept_id)
    );
}

#[test]
fn events_upsert_by_id() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let t = ts("2026-01-01T08:00:00Z");
    engine.insert_event(&EventBuilder::new("e1", "u1", t).build()).unwrap();
    engine
        .insert_event(&EventBuilder::new("e1", "u1", t).target("pear").build())
        .unwrap();
    assert_eq!(engine.count_events("u1").unwrap(), 1);
    let events = engine
        .query_events(&EventQuery::for_user("u1", TimeRange::last_n_days(now(), 90)))
        .unwrap();
    assert_eq!(events[0].target, "pear");
}
