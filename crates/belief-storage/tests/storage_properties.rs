//! Property: whatever sequence of appends and deprecations is attempted,
//! each chain has at most one current version and versions strictly increase.

use belief_core::models::{DerivedView, StableConcept, ViewType};
use belief_core::traits::IConceptStorage;
use belief_storage::{InMemoryStore, StorageEngine};
use proptest::prelude::*;
use test_fixtures::ts;

#[derive(Debug, Clone)]
enum Op {
    /// Promote into chain `n`, possibly with a stale `supersedes`.
    Append { chain: u8, stale: bool },
    /// Deprecate the current version of chain `n`, if any.
    Deprecate { chain: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..3, any::<bool>()).prop_map(|(chain, stale)| Op::Append { chain, stale }),
        (0u8..3).prop_map(|chain| Op::Deprecate { chain }),
    ]
}

fn apply(store: &dyn IConceptStorage, ops: &[Op]) {
    let now = ts("2026-03-01T00:00:00Z");
    for op in ops {
        match op {
            Op::Append { chain, stale } => {
                let name = format!("habit:c{chain}");
                let view = DerivedView::new("u", "h", ViewType::Habit, vec![], now)
                    .with_confidence(0.9);
                let history = store.concept_chain("u", &name).unwrap();
                let current = store.current_concept("u", &name).unwrap();
                let concept = match history.last() {
                    Some(latest) => latest.superseded_by_view(&view, now),
                    None => StableConcept::first_version(&view, &name, now),
                };
                let supersedes = if *stale {
                    None
                } else {
                    current.as_ref().map(|c| c.concept_id.as_str())
                };
                let _ = store.append_version(&concept, supersedes, now);
            }
            Op::Deprecate { chain } => {
                let name = format!("habit:c{chain}");
                if let Some(current) = store.current_concept("u", &name).unwrap() {
                    store.deprecate_concept(&current.concept_id, now, None).unwrap();
                }
            }
        }
    }
}

fn assert_chains(store: &dyn IConceptStorage) {
    for chain in 0u8..3 {
        let history = store.concept_chain("u", &format!("habit:c{chain}")).unwrap();
        let current = history.iter().filter(|c| !c.is_deprecated).count();
        assert!(current <= 1, "chain {chain} has {current} current versions");
        for pair in history.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }
}

proptest! {
    #[test]
    fn at_most_one_current_version_in_memory(ops in prop::collection::vec(op(), 0..30)) {
        let store = InMemoryStore::new();
        apply(&store, &ops);
        assert_chains(&store);
    }

    #[test]
    fn at_most_one_current_version_sqlite(ops in prop::collection::vec(op(), 0..20)) {
        let store = StorageEngine::open_in_memory().unwrap();
        apply(&store, &ops);
        assert_chains(&store);
    }
}
