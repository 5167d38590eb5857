use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use taskflow_core::validation::{DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
use taskflow_core::{NewTask, Profile, Task, TaskChanges, TaskId, UserId};
use time::OffsetDateTime;
use tracing::debug;

use crate::{StoreError, TaskStore};

/// Task store kept in process memory.
///
/// Mirrors the hosted schema: ids and timestamps are assigned on insert,
/// rows are isolated per owner, and the column constraints are enforced.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    // Newest first.
    tasks: Vec<Task>,
    profiles: HashMap<UserId, Profile>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile row.
    #[must_use]
    pub fn with_profile(self, profile: Profile) -> Self {
        self.guard().profiles.insert(profile.id, profile);
        self
    }

    /// Number of stored tasks across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().tasks.len()
    }

    /// Returns true when no task is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard().tasks.is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::Rejected("title must not be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(StoreError::Rejected(format!(
            "title exceeds {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn check_description(description: Option<&str>) -> Result<(), StoreError> {
    if description.is_some_and(|text| text.chars().count() > DESCRIPTION_MAX_CHARS) {
        return Err(StoreError::Rejected(format!(
            "description exceeds {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

impl TaskStore for MemoryStore {
    async fn list_tasks(&self, user: UserId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .guard()
            .tasks
            .iter()
            .filter(|task| task.user_id == user)
            .cloned()
            .collect())
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError> {
        self.guard()
            .profiles
            .get(&user)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("profile {user}")))
    }

    async fn insert_task(&self, user: UserId, task: NewTask) -> Result<Task, StoreError> {
        check_title(&task.title)?;
        check_description(task.description.as_deref())?;

        let row = task.into_insert(user);
        let now = OffsetDateTime::now_utc();
        let task = Task {
            id: TaskId::new(),
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            due_date: row.due_date,
            created_at: now,
            updated_at: now,
            user_id: row.user_id,
        };
        self.guard().tasks.insert(0, task.clone());
        debug!(task = %task.id, %user, "Inserted task");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> Result<Task, StoreError> {
        if let Some(title) = &changes.title {
            check_title(title)?;
        }
        if let Some(description) = &changes.description {
            check_description(description.as_deref())?;
        }

        let mut state = self.guard();
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        changes.apply_to(task);
        task.updated_at = OffsetDateTime::now_utc();
        let updated = task.clone();
        drop(state);
        debug!(task = %id, "Updated task");
        Ok(updated)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.guard();
        let Some(index) = state.tasks.iter().position(|task| task.id == id) else {
            return Err(StoreError::NotFound(format!("task {id}")));
        };
        state.tasks.remove(index);
        drop(state);
        debug!(task = %id, "Deleted task");
        Ok(())
    }
}
