//! Dashboard controller: the authoritative in-memory task collection of the
//! signed-in user.
//!
//! Every mutation waits for the store to confirm before the local collection
//! is patched; a failed call leaves local state exactly as it was.

use taskflow_core::{
    DEFAULT_DUE_SOON_WINDOW, DraftField, NewTask, PriorityFilter, Profile, StatusFilter, Task,
    TaskChanges, TaskFilter, TaskId, TaskStats, TaskStatus,
};
use taskflow_store::{StoreError, TaskStore};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info, warn};

use crate::editor::{EditorError, EditorMode, TaskEditor};
use crate::notify::{Notification, Notifier};
use crate::session::{AuthProvider, Session};
use crate::task_card::{StatusChangeGuard, TaskListView};

const TRY_AGAIN: &str = "Please try again later.";

/// Errors returned by controller operations invoked from the editor.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// No user is signed in.
    #[error("no user is signed in")]
    SignedOut,
    /// Update requested for a task that is not the current edit target.
    #[error("task {0} is not being edited")]
    NotEditing(TaskId),
    /// The editor refused the submission.
    #[error(transparent)]
    Editor(#[from] EditorError),
    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State container behind the dashboard screen.
pub struct DashboardController<S, N> {
    store: S,
    notifier: N,
    session: Session,
    tasks: Vec<Task>,
    profile: Option<Profile>,
    loading: bool,
    filter: TaskFilter,
    editor: TaskEditor,
    due_soon_window: Duration,
}

impl<S, N> DashboardController<S, N> {
    /// Create a controller for `session`. Nothing is fetched until [`Self::load`].
    #[must_use]
    pub fn new(store: S, notifier: N, session: Session) -> Self {
        Self {
            store,
            notifier,
            session,
            tasks: Vec::new(),
            profile: None,
            loading: false,
            filter: TaskFilter::default(),
            editor: TaskEditor::default(),
            due_soon_window: DEFAULT_DUE_SOON_WINDOW,
        }
    }

    /// Override the due-soon look-ahead used by [`Self::list_view`].
    #[must_use]
    pub const fn with_due_soon_window(mut self, window: Duration) -> Self {
        self.due_soon_window = window;
        self
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Tasks of the signed-in user, newest first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Task with `id`, if loaded.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Profile of the signed-in user, when it could be loaded.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Name shown in the header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match (&self.profile, self.session.user()) {
            (Some(profile), _) => profile.display_name(),
            (None, Some(user)) => user.email.as_deref().unwrap_or("User"),
            (None, None) => "User",
        }
    }

    /// Returns true while a load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current filter criteria.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Replace the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
    }

    /// Replace the status filter.
    pub const fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Replace the priority filter.
    pub const fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.filter.priority = priority;
    }

    /// Tasks passing the current filter, in collection order.
    #[must_use]
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    /// Counts over the unfiltered collection.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// List area view model as of `now`.
    #[must_use]
    pub fn list_view(&self, now: OffsetDateTime, guard: &StatusChangeGuard) -> TaskListView {
        if self.loading {
            return TaskListView::Loading;
        }
        TaskListView::build(
            self.tasks.len(),
            &self.filtered_tasks(),
            now,
            self.due_soon_window,
            guard,
        )
    }

    /// Editor dialog state.
    #[must_use]
    pub const fn editor(&self) -> &TaskEditor {
        &self.editor
    }

    /// Open the editor in create mode.
    pub fn open_create(&mut self) {
        self.editor.open_create();
    }

    /// Open the editor on the task with `id`. Returns false when it is not loaded.
    pub fn edit_task(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter().find(|task| task.id == id) else {
            return false;
        };
        self.editor.open_edit(task);
        true
    }

    /// Close the editor and clear the edit target.
    pub fn close_dialog(&mut self) {
        self.editor.close();
    }

    /// Change one editor field. Ignored while the editor is saving.
    pub fn edit_field(&mut self, field: DraftField, value: impl Into<String>) -> bool {
        self.editor.set_field(field, value)
    }

    fn clear_user_state(&mut self) {
        self.tasks.clear();
        self.profile = None;
        self.filter = TaskFilter::default();
        self.editor = TaskEditor::default();
    }
}

impl<S: TaskStore, N: Notifier> DashboardController<S, N> {
    /// Switch to `session` and load its data.
    ///
    /// State of a previous user is dropped before anything is fetched.
    pub async fn activate(&mut self, session: Session) {
        if self.session.user_id() != session.user_id() {
            self.clear_user_state();
        }
        self.session = session;
        self.load().await;
    }

    /// Fetch profile and tasks of the signed-in user.
    ///
    /// Failures are logged; a task fetch failure also notifies the user and
    /// leaves the collection empty.
    pub async fn load(&mut self) {
        let Some(user) = self.session.user_id() else {
            debug!("No signed-in user; skipping load");
            return;
        };

        self.loading = true;
        let (profile, tasks) = tokio::join!(
            self.store.get_profile(user),
            self.store.list_tasks(user)
        );
        self.loading = false;

        match profile {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => {
                warn!(%user, error = %err, "Failed to load profile");
                self.profile = None;
            }
        }

        match tasks {
            Ok(mut tasks) => {
                let fetched = tasks.len();
                tasks.retain(|task| task.user_id == user);
                if tasks.len() != fetched {
                    warn!(%user, dropped = fetched - tasks.len(), "Ignoring tasks of another user");
                }
                info!(%user, count = tasks.len(), "Loaded tasks");
                self.tasks = tasks;
            }
            Err(err) => {
                error!(%user, error = %err, "Failed to load tasks");
                self.tasks.clear();
                self.notifier.notify(Notification::destructive(
                    "Error loading tasks",
                    "Please try refreshing the page.",
                ));
            }
        }
    }

    /// Insert a task and prepend it to the collection.
    ///
    /// # Errors
    /// Returns [`DashboardError::SignedOut`] without calling the store when
    /// nobody is signed in, or the store error; local state is unchanged then.
    pub async fn create_task(&mut self, task: NewTask) -> Result<Task, DashboardError> {
        let Some(user) = self.session.user_id() else {
            return Err(DashboardError::SignedOut);
        };
        let created = self
            .store
            .insert_task(user, task)
            .await
            .inspect_err(|err| error!(%user, error = %err, "Failed to create task"))?;
        info!(task = %created.id, "Created task");
        self.tasks.insert(0, created.clone());
        Ok(created)
    }

    /// Apply `changes` to the task currently open in the editor.
    ///
    /// On success the entry is replaced in place and the edit target cleared.
    ///
    /// # Errors
    /// Returns [`DashboardError::NotEditing`] without calling the store when
    /// `id` is not the edit target, or the store error; local state is
    /// unchanged then.
    pub async fn update_task(
        &mut self,
        id: TaskId,
        changes: TaskChanges,
    ) -> Result<Task, DashboardError> {
        if self.editor.target().map(|task| task.id) != Some(id) {
            return Err(DashboardError::NotEditing(id));
        }
        let updated = self
            .store
            .update_task(id, &changes)
            .await
            .inspect_err(|err| error!(task = %id, error = %err, "Failed to update task"))?;
        info!(task = %id, "Updated task");
        self.replace(updated.clone());
        self.editor.close();
        Ok(updated)
    }

    /// Delete a task and notify the outcome. Never fails.
    pub async fn delete_task(&mut self, id: TaskId) {
        match self.store.delete_task(id).await {
            Ok(()) => {
                info!(task = %id, "Deleted task");
                self.tasks.retain(|task| task.id != id);
                self.notifier.notify(Notification::info(
                    "Task deleted",
                    "The task has been removed successfully.",
                ));
            }
            Err(err) => {
                error!(task = %id, error = %err, "Failed to delete task");
                self.notifier
                    .notify(Notification::destructive("Error deleting task", TRY_AGAIN));
            }
        }
    }

    /// Update only the status of a task and notify the outcome.
    ///
    /// Returns whether the store accepted the change. Concurrent calls for
    /// the same id are not deduplicated here; callers hold a
    /// [`StatusChangeGuard`].
    pub async fn change_status(&mut self, id: TaskId, status: TaskStatus) -> bool {
        match self.store.update_task(id, &TaskChanges::status(status)).await {
            Ok(updated) => {
                info!(task = %id, %status, "Changed task status");
                self.replace(updated);
                self.notifier.notify(Notification::info(
                    "Task updated",
                    format!("Task status changed to {}.", status.display_label()),
                ));
                true
            }
            Err(err) => {
                error!(task = %id, %status, error = %err, "Failed to change task status");
                self.notifier
                    .notify(Notification::destructive("Error updating task", TRY_AGAIN));
                false
            }
        }
    }

    /// Validate the editor and save through [`Self::create_task`] or
    /// [`Self::update_task`].
    ///
    /// Closes the editor on success. On a store failure the editor stays open
    /// with its input.
    ///
    /// # Errors
    /// Returns the editor rejection (invalid, busy or closed) or the save error.
    pub async fn submit_editor(&mut self) -> Result<Task, DashboardError> {
        let validated = self.editor.begin_submit()?;
        let result = match self.editor.mode().clone() {
            EditorMode::Create => self
                .create_task(validated.into_new_task())
                .await
                .map(|task| (task, "Task created!", "Your new task has been created successfully.")),
            EditorMode::Edit(target) => self
                .update_task(target.id, validated.into_changes())
                .await
                .map(|task| (task, "Task updated!", "Your task has been updated successfully.")),
        };

        match result {
            Ok((task, title, description)) => {
                self.editor.finish_submit(true);
                self.notifier.notify(Notification::info(title, description));
                Ok(task)
            }
            Err(err) => {
                self.editor.finish_submit(false);
                self.notifier
                    .notify(Notification::destructive("Something went wrong", TRY_AGAIN));
                Err(err)
            }
        }
    }

    /// End the session through `auth` and drop all user state.
    ///
    /// A failure is logged and leaves the session untouched. Returns whether
    /// the session ended.
    pub async fn sign_out<A: AuthProvider>(&mut self, auth: &A) -> bool {
        match auth.sign_out().await {
            Ok(()) => {
                info!("Signed out");
                self.clear_user_state();
                self.session = Session::SignedOut;
                self.notifier.notify(Notification::info(
                    "Signed out",
                    "You have been signed out successfully.",
                ));
                true
            }
            Err(err) => {
                error!(error = %err, "Failed to sign out");
                false
            }
        }
    }

    fn replace(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            *slot = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use taskflow_core::UserId;
    use taskflow_store::MemoryStore;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Notification>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) {
            guard(&self.seen).push(notification);
        }
    }

    fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ok<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[tokio::test]
    async fn signed_out_controller_does_not_fetch_or_create() {
        let recorder = Recorder::default();
        let mut dashboard =
            DashboardController::new(MemoryStore::new(), &recorder, Session::SignedOut);
        dashboard.load().await;
        assert!(dashboard.tasks().is_empty());

        let Err(err) = dashboard.create_task(NewTask::titled("nope")).await else {
            panic!("signed-out create must fail");
        };
        assert!(matches!(err, DashboardError::SignedOut));
        assert!(dashboard.store().is_empty());
        assert!(guard(&recorder.seen).is_empty());
    }

    #[tokio::test]
    async fn update_requires_matching_edit_target() {
        let recorder = Recorder::default();
        let user = UserId::new();
        let mut dashboard =
            DashboardController::new(MemoryStore::new(), &recorder, Session::signed_in(user));
        let first = ok(dashboard.create_task(NewTask::titled("a")).await, "create a");
        let second = ok(dashboard.create_task(NewTask::titled("b")).await, "create b");

        let Err(err) = dashboard.update_task(first.id, TaskChanges::title("X")).await else {
            panic!("update without target must fail");
        };
        assert!(matches!(err, DashboardError::NotEditing(id) if id == first.id));

        assert!(dashboard.edit_task(second.id));
        assert!(dashboard.update_task(first.id, TaskChanges::title("X")).await.is_err());
        assert_eq!(dashboard.task(first.id).map(|t| t.title.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn change_status_notifies_with_spaced_label() {
        let recorder = Recorder::default();
        let user = UserId::new();
        let mut dashboard =
            DashboardController::new(MemoryStore::new(), &recorder, Session::signed_in(user));
        let task = ok(dashboard.create_task(NewTask::titled("a")).await, "create");

        assert!(dashboard.change_status(task.id, TaskStatus::InProgress).await);
        let seen = guard(&recorder.seen).clone();
        assert_eq!(
            seen.last(),
            Some(&Notification::info("Task updated", "Task status changed to in progress."))
        );

        assert!(!dashboard.change_status(TaskId::new(), TaskStatus::Completed).await);
        let last = guard(&recorder.seen).last().cloned();
        assert_eq!(
            last.map(|n| (n.title, n.severity)),
            Some(("Error updating task".to_owned(), Severity::Destructive))
        );
    }

    #[tokio::test]
    async fn display_name_falls_back_to_session_email() {
        let recorder = Recorder::default();
        let mut dashboard = DashboardController::new(
            MemoryStore::new(),
            &recorder,
            Session::SignedIn(crate::session::User {
                id: UserId::new(),
                email: Some("me@example.invalid".into()),
            }),
        );
        dashboard.load().await;
        assert!(dashboard.profile().is_none());
        assert_eq!(dashboard.display_name(), "me@example.invalid");
        assert!(guard(&recorder.seen).is_empty());
    }
}
