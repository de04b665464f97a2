use crate::errors::BeliefResult;
use crate::models::{DerivedView, ViewStatus};

/// Persistence for derived views.
pub trait IViewStorage: Send + Sync {
    fn insert_view(&self, view: &DerivedView) -> BeliefResult<()>;
    /// Replace the stored row. Fails with `ViewNotFound` if it does not exist.
    fn update_view(&self, view: &DerivedView) -> BeliefResult<()>;
    fn get_view(&self, id: &str) -> BeliefResult<Option<DerivedView>>;
    /// All views of a user, optionally filtered by status, oldest first.
    fn views_for_user(
        &self,
        user_id: &str,
        status: Option<ViewStatus>,
    ) -> BeliefResult<Vec<DerivedView>>;
}
