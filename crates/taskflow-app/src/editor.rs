//! State machine behind the create/edit task dialog.
//!
//! The editor owns the raw form values and their validation messages. It
//! never talks to the store: the controller drives a submission through
//! [`TaskEditor::begin_submit`] and [`TaskEditor::finish_submit`].

use taskflow_core::{DraftField, Task, TaskDraft, ValidatedTask, ValidationErrors};
use thiserror::Error;

/// Reasons a submission does not reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The dialog is not open.
    #[error("task editor is not open")]
    Closed,
    /// A save is already in flight.
    #[error("task editor is already saving")]
    Busy,
    /// Field rules failed; messages are kept on the editor.
    #[error("invalid task: {0}")]
    Invalid(ValidationErrors),
}

/// Which operation a submission performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// Insert a new task.
    Create,
    /// Update the contained task.
    Edit(Task),
}

/// Dialog state: open flag, target, draft, field errors, busy flag.
#[derive(Debug, Clone)]
pub struct TaskEditor {
    open: bool,
    mode: EditorMode,
    draft: TaskDraft,
    errors: ValidationErrors,
    busy: bool,
}

impl Default for TaskEditor {
    fn default() -> Self {
        Self {
            open: false,
            mode: EditorMode::Create,
            draft: TaskDraft::default(),
            errors: ValidationErrors::default(),
            busy: false,
        }
    }
}

impl TaskEditor {
    /// Open in create mode with default values.
    pub fn open_create(&mut self) {
        self.open_with(EditorMode::Create, TaskDraft::default());
    }

    /// Open in edit mode, pre-populated from `task`.
    pub fn open_edit(&mut self, task: &Task) {
        self.open_with(EditorMode::Edit(task.clone()), TaskDraft::from_task(task));
    }

    fn open_with(&mut self, mode: EditorMode, draft: TaskDraft) {
        self.open = true;
        self.mode = mode;
        self.draft = draft;
        self.errors = ValidationErrors::default();
        self.busy = false;
    }

    /// Close the dialog and forget the edit target.
    pub fn close(&mut self) {
        self.open = false;
        self.mode = EditorMode::Create;
        self.busy = false;
    }

    /// Returns true while the dialog is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true while a save is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Task being edited, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&Task> {
        match &self.mode {
            EditorMode::Edit(task) => Some(task),
            EditorMode::Create => None,
        }
    }

    /// Current form values.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Current field messages.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Dialog heading.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Create New Task",
            EditorMode::Edit(_) => "Edit Task",
        }
    }

    /// Submit button text.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.busy {
            return "Saving...";
        }
        match self.mode {
            EditorMode::Create => "Create Task",
            EditorMode::Edit(_) => "Update Task",
        }
    }

    /// Replace a field value and clear its message. Ignored while busy.
    ///
    /// Returns whether the value was accepted.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) -> bool {
        if self.busy {
            return false;
        }
        *self.draft.field_mut(field) = value.into();
        self.errors.clear(field);
        true
    }

    /// Validate the draft and, when valid, mark the editor busy.
    ///
    /// # Errors
    /// Returns [`EditorError::Invalid`] with the field messages (also kept on
    /// the editor), or [`EditorError::Busy`] / [`EditorError::Closed`] when no
    /// submission can start.
    pub fn begin_submit(&mut self) -> Result<ValidatedTask, EditorError> {
        if !self.open {
            return Err(EditorError::Closed);
        }
        if self.busy {
            return Err(EditorError::Busy);
        }
        match self.draft.validate() {
            Ok(task) => {
                self.errors = ValidationErrors::default();
                self.busy = true;
                Ok(task)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(EditorError::Invalid(errors))
            }
        }
    }

    /// Clear the busy flag; close on success, keep input on failure.
    pub fn finish_submit(&mut self, saved: bool) {
        self.busy = false;
        if saved {
            self.close();
        }
    }
}
