//! Arena-backed store with the same contracts as the SQLite engine.
//!
//! Concepts live in an append-only `Vec`; lookups go through an id index.
//! A single `RwLock` makes every trait call atomic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use belief_core::errors::{BeliefError, BeliefResult, StorageError};
use belief_core::models::{
    DeprecationOutcome, DerivedView, Event, EventQuery, StableConcept, ViewStatus,
};
use belief_core::traits::{IConceptStorage, IEventSource, IViewStorage};

#[derive(Default)]
struct Inner {
    events: HashMap<String, Event>,
    views: HashMap<String, DerivedView>,
    concepts: Vec<StableConcept>,
    concept_index: HashMap<String, usize>,
}

impl Inner {
    fn chain(&self, user_id: &str, canonical_name: &str) -> impl Iterator<Item = &StableConcept> {
        let user_id = user_id.to_string();
        let canonical_name = canonical_name.to_string();
        self.concepts
            .iter()
            .filter(move |c| c.user_id == user_id && c.canonical_name == canonical_name)
    }

    fn current(&self, user_id: &str, canonical_name: &str) -> Option<&StableConcept> {
        self.chain(user_id, canonical_name).find(|c| !c.is_deprecated)
    }

    fn concept_mut(&mut self, concept_id: &str) -> BeliefResult<&mut StableConcept> {
        let idx = *self
            .concept_index
            .get(concept_id)
            .ok_or_else(|| BeliefError::ConceptNotFound {
                id: concept_id.to_string(),
            })?;
        self.concepts
            .get_mut(idx)
            .ok_or_else(|| BeliefError::ConceptNotFound {
                id: concept_id.to_string(),
            })
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace events by id.
    pub fn insert_events<I: IntoIterator<Item = Event>>(&self, events: I) -> BeliefResult<()> {
        let mut inner = self.write()?;
        for event in events {
            inner.events.insert(event.id.clone(), event);
        }
        Ok(())
    }

    pub fn insert_event(&self, event: Event) -> BeliefResult<()> {
        self.insert_events([event])
    }

    pub fn count_events(&self, user_id: &str) -> BeliefResult<usize> {
        Ok(self
            .read()?
            .events
            .values()
            .filter(|e| e.user_id == user_id)
            .count())
    }

    fn read(&self) -> BeliefResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> BeliefResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> BeliefError {
    BeliefError::StorageError(StorageError::Unavailable {
        reason: "in-memory store lock poisoned".to_string(),
    })
}

impl IEventSource for InMemoryStore {
    fn query_events(&self, query: &EventQuery) -> BeliefResult<Vec<Event>> {
        let inner = self.read()?;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }
}

impl IViewStorage for InMemoryStore {
    fn insert_view(&self, view: &DerivedView) -> BeliefResult<()> {
        let mut inner = self.write()?;
        if inner.views.contains_key(&view.id) {
            return Err(BeliefError::StorageError(StorageError::ConstraintViolation {
                details: format!("view {} already exists", view.id),
            }));
        }
        inner.views.insert(view.id.clone(), view.clone());
        Ok(())
    }

    fn update_view(&self, view: &DerivedView) -> BeliefResult<()> {
        let mut inner = self.write()?;
        match inner.views.get_mut(&view.id) {
            Some(slot) => {
                *slot = view.clone();
                Ok(())
            }
            None => Err(BeliefError::ViewNotFound {
                id: view.id.clone(),
            }),
        }
    }

    fn get_view(&self, id: &str) -> BeliefResult<Option<DerivedView>> {
        Ok(self.read()?.views.get(id).cloned())
    }

    fn views_for_user(
        &self,
        user_id: &str,
        status: Option<ViewStatus>,
    ) -> BeliefResult<Vec<DerivedView>> {
        let inner = self.read()?;
        let mut views: Vec<DerivedView> = inner
            .views
            .values()
            .filter(|v| v.user_id == user_id && status.map_or(true, |s| v.status == s))
            .cloned()
            .collect();
        views.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(views)
    }
}

impl IConceptStorage for InMemoryStore {
    fn append_version(
        &self,
        concept: &StableConcept,
        supersedes: Option<&str>,
        at: DateTime<Utc>,
    ) -> BeliefResult<()> {
        let mut inner = self.write()?;

        let current_id = inner
            .current(&concept.user_id, &concept.canonical_name)
            .map(|c| c.concept_id.clone());
        if current_id.as_deref() != supersedes {
            return Err(BeliefError::ConcurrencyError(format!(
                "chain {}/{} expected current {:?}, found {:?}",
                concept.user_id, concept.canonical_name, supersedes, current_id
            )));
        }
        let latest = inner
            .chain(&concept.user_id, &concept.canonical_name)
            .map(|c| c.version)
            .max()
            .unwrap_or(0);
        if concept.version <= latest {
            return Err(BeliefError::ConcurrencyError(format!(
                "chain {}/{} already has version {latest}, cannot append v{}",
                concept.user_id, concept.canonical_name, concept.version
            )));
        }
        if inner.concept_index.contains_key(&concept.concept_id) {
            return Err(BeliefError::StorageError(StorageError::ConstraintViolation {
                details: format!("concept {} already exists", concept.concept_id),
            }));
        }

        if let Some(id) = current_id {
            let previous = inner.concept_mut(&id)?;
            previous.is_deprecated = true;
            previous.deprecated_at = Some(at);
            previous.deprecation_reason = Some(format!("superseded by v{}", concept.version));
        }
        let idx = inner.concepts.len();
        inner.concepts.push(concept.clone());
        inner.concept_index.insert(concept.concept_id.clone(), idx);
        Ok(())
    }

    fn get_concept(&self, concept_id: &str) -> BeliefResult<Option<StableConcept>> {
        let inner = self.read()?;
        Ok(inner
            .concept_index
            .get(concept_id)
            .and_then(|idx| inner.concepts.get(*idx))
            .cloned())
    }

    fn current_concept(
        &self,
        user_id: &str,
        canonical_name: &str,
    ) -> BeliefResult<Option<StableConcept>> {
        Ok(self.read()?.current(user_id, canonical_name).cloned())
    }

    fn concept_chain(
        &self,
        user_id: &str,
        canonical_name: &str,
    ) -> BeliefResult<Vec<StableConcept>> {
        let inner = self.read()?;
        let mut chain: Vec<StableConcept> = inner.chain(user_id, canonical_name).cloned().collect();
        chain.sort_by_key(|c| c.version);
        Ok(chain)
    }

    fn current_concepts(&self, user_id: &str) -> BeliefResult<Vec<StableConcept>> {
        let inner = self.read()?;
        let mut current: Vec<StableConcept> = inner
            .concepts
            .iter()
            .filter(|c| c.user_id == user_id && !c.is_deprecated)
            .cloned()
            .collect();
        current.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        Ok(current)
    }

    fn deprecate_concept(
        &self,
        concept_id: &str,
        at: DateTime<Utc>,
        reason: Option<&str>,
    ) -> BeliefResult<DeprecationOutcome> {
        let mut inner = self.write()?;
        let concept = inner.concept_mut(concept_id)?;
        if concept.is_deprecated {
            return Ok(DeprecationOutcome::AlreadyDeprecated(concept.clone()));
        }
        concept.is_deprecated = true;
        concept.deprecated_at = Some(at);
        concept.deprecation_reason = reason.map(str::to_string);
        Ok(DeprecationOutcome::Deprecated(concept.clone()))
    }

    fn record_access(&self, concept_id: &str, at: DateTime<Utc>) -> BeliefResult<()> {
        let mut inner = self.write()?;
        let concept = inner.concept_mut(concept_id)?;
        concept.access_count += 1;
        concept.last_accessed_at = Some(at);
        Ok(())
    }
}
