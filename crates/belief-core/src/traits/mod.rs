pub mod cancellation;
pub mod concept_storage;
pub mod event_source;
pub mod view_storage;

pub use cancellation::{Cancellable, CancellationToken};
pub use concept_storage::IConceptStorage;
pub use event_source::IEventSource;
pub use view_storage::IViewStorage;
