use crate::errors::BeliefResult;
use crate::models::{Event, EventQuery};

/// Read-only view of the external event store.
pub trait IEventSource: Send + Sync {
    /// Events matching `query`, ordered by timestamp ascending. No side effects.
    fn query_events(&self, query: &EventQuery) -> BeliefResult<Vec<Event>>;
}
