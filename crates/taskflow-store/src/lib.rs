//! Remote task store contract and its implementations.

use std::sync::Arc;

use taskflow_core::{NewTask, Profile, Task, TaskChanges, TaskId, UserId};

/// Error types for store operations.
pub mod error;
/// In-memory reference store.
pub mod memory;
/// PostgREST-compatible HTTP store.
pub mod rest;

pub use error::{ErrorKind, StoreError};
pub use memory::MemoryStore;
pub use rest::{RestConfig, RestStore};

/// Row-based persistence for tasks, scoped per user.
///
/// Every call is a single request/response pair; implementations never
/// cache or push changes back.
#[allow(async_fn_in_trait)]
pub trait TaskStore: Send + Sync {
    /// Every task owned by `user`, newest first.
    ///
    /// # Errors
    /// Returns [`ErrorKind::ServiceUnavailable`] when the store cannot be reached.
    async fn list_tasks(&self, user: UserId) -> Result<Vec<Task>, StoreError>;

    /// Profile row of `user`.
    ///
    /// # Errors
    /// Returns [`ErrorKind::NotFound`] when the user has no profile.
    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError>;

    /// Insert a task owned by `user`; the store assigns id and timestamps.
    ///
    /// # Errors
    /// Returns [`ErrorKind::ValidationRejected`] when the row violates a constraint.
    async fn insert_task(&self, user: UserId, task: NewTask) -> Result<Task, StoreError>;

    /// Apply a partial update and return the stored row.
    ///
    /// # Errors
    /// Returns [`ErrorKind::NotFound`] when the task does not exist.
    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> Result<Task, StoreError>;

    /// Delete a task.
    ///
    /// # Errors
    /// Returns [`ErrorKind::NotFound`] when the task does not exist.
    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError>;
}

impl<T: TaskStore> TaskStore for Arc<T> {
    async fn list_tasks(&self, user: UserId) -> Result<Vec<Task>, StoreError> {
        (**self).list_tasks(user).await
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError> {
        (**self).get_profile(user).await
    }

    async fn insert_task(&self, user: UserId, task: NewTask) -> Result<Task, StoreError> {
        (**self).insert_task(user, task).await
    }

    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> Result<Task, StoreError> {
        (**self).update_task(id, changes).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        (**self).delete_task(id).await
    }
}
