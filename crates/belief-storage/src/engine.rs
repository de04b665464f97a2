//! StorageEngine: owns the write connection, runs migrations on open,
//! implements the three storage traits on SQLite.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use belief_core::config::StorageConfig;
use belief_core::errors::BeliefResult;
use belief_core::models::{
    DeprecationOutcome, DerivedView, Event, EventQuery, StableConcept, ViewStatus,
};
use belief_core::traits::{IConceptStorage, IEventSource, IViewStorage};

use crate::migrations;
use crate::pool::{pragmas, WriteConnection};
use crate::queries::{concept_ops, event_ops, view_ops};

pub struct StorageEngine {
    writer: WriteConnection,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> BeliefResult<Self> {
        Self::open_with(path, &StorageConfig::default())
    }

    pub fn open_with(path: &Path, config: &StorageConfig) -> BeliefResult<Self> {
        let engine = Self {
            writer: WriteConnection::open(path, config.busy_timeout_ms)?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine.
    pub fn open_in_memory() -> BeliefResult<Self> {
        let engine = Self {
            writer: WriteConnection::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// File-backed when `config.db_path` is set, in-memory otherwise.
    pub fn from_config(config: &StorageConfig) -> BeliefResult<Self> {
        match &config.db_path {
            Some(path) => Self::open_with(Path::new(path), config),
            None => Self::open_in_memory(),
        }
    }

    fn initialize(&self) -> BeliefResult<()> {
        self.writer.with_conn_sync(|conn| {
            let version = migrations::run_migrations(conn)?;
            debug!(schema_version = version, "storage initialized");
            Ok(())
        })
    }

    pub fn writer(&self) -> &WriteConnection {
        &self.writer
    }

    pub fn schema_version(&self) -> BeliefResult<u32> {
        self.writer.with_conn_sync(migrations::current_version)
    }

    pub fn is_wal(&self) -> BeliefResult<bool> {
        self.writer.with_conn_sync(pragmas::verify_wal_mode)
    }

    pub fn insert_event(&self, event: &Event) -> BeliefResult<()> {
        self.writer
            .with_conn_sync(|conn| event_ops::upsert_event(conn, event))
    }

    /// Insert a batch in one transaction.
    pub fn insert_events(&self, events: &[Event]) -> BeliefResult<()> {
        self.writer.with_conn_sync(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| crate::to_storage_err(format!("insert_events begin: {e}")))?;
            for event in events {
                event_ops::upsert_event(&tx, event)?;
            }
            tx.commit()
                .map_err(|e| crate::to_storage_err(format!("insert_events commit: {e}")))
        })
    }

    pub fn count_events(&self, user_id: &str) -> BeliefResult<usize> {
        self.writer
            .with_conn_sync(|conn| event_ops::count_events(conn, user_id))
    }
}

impl IEventSource for StorageEngine {
    fn query_events(&self, query: &EventQuery) -> BeliefResult<Vec<Event>> {
        self.writer
            .with_conn_sync(|conn| event_ops::query_events(conn, query))
    }
}

impl IViewStorage for StorageEngine {
    fn insert_view(&self, view: &DerivedView) -> BeliefResult<()> {
        self.writer.with_conn_sync(|conn| view_ops::insert_view(conn, view))
    }

    fn update_view(&self, view: &DerivedView) -> BeliefResult<()> {
        self.writer.with_conn_sync(|conn| view_ops::update_view(conn, view))
    }

    fn get_view(&self, id: &str) -> BeliefResult<Option<DerivedView>> {
        self.writer.with_conn_sync(|conn| view_ops::get_view(conn, id))
    }

    fn views_for_user(
        &self,
        user_id: &str,
        status: Option<ViewStatus>,
    ) -> BeliefResult<Vec<DerivedView>> {
        self.writer
            .with_conn_sync(|conn| view_ops::views_for_user(conn, user_id, status))
    }
}

impl IConceptStorage for StorageEngine {
    fn append_version(
        &self,
        concept: &StableConcept,
        supersedes: Option<&str>,
        at: DateTime<Utc>,
    ) -> BeliefResult<()> {
        self.writer
            .with_conn_sync(|conn| concept_ops::append_version(conn, concept, supersedes, at))
    }

    fn get_concept(&self, concept_id: &str) -> BeliefResult<Option<StableConcept>> {
        self.writer
            .with_conn_sync(|conn| concept_ops::get_concept(conn, concept_id))
    }

    fn current_concept(
        &self,
        user_id: &str,
        canonical_name: &str,
    ) -> BeliefResult<Option<StableConcept>> {
        self.writer
            .with_conn_sync(|conn| concept_ops::current_concept(conn, user_id, canonical_name))
    }

    fn concept_chain(
        &self,
        user_id: &str,
        canonical_name: &str,
    ) -> BeliefResult<Vec<StableConcept>> {
        self.writer
            .with_conn_sync(|conn| concept_ops::concept_chain(conn, user_id, canonical_name))
    }

    fn current_concepts(&self, user_id: &str) -> BeliefResult<Vec<StableConcept>> {
        self.writer
            .with_conn_sync(|conn| concept_ops::current_concepts(conn, user_id))
    }

    fn deprecate_concept(
        &self,
        concept_id: &str,
        at: DateTime<Utc>,
        reason: Option<&str>,
    ) -> BeliefResult<DeprecationOutcome> {
        self.writer
            .with_conn_sync(|conn| concept_ops::deprecate_concept(conn, concept_id, at, reason))
    }

    fn record_access(&self, concept_id: &str, at: DateTime<Utc>) -> BeliefResult<()> {
        self.writer
            .with_conn_sync(|conn| concept_ops::record_access(conn, concept_id, at))
    }
}
