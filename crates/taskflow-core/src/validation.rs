//! Validation of the raw values held by the task editor form.
//!
//! The validator is pure: it never touches the store and reports at most one
//! message per field.

use std::collections::BTreeMap;
use std::fmt;

use time::Date;

use crate::date::parse_date;
use crate::task::{NewTask, Task, TaskChanges, TaskPriority, TaskStatus};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Form field identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    /// Title input.
    Title,
    /// Description textarea.
    Description,
    /// Status select.
    Status,
    /// Priority select.
    Priority,
    /// Due date input.
    DueDate,
}

impl DraftField {
    /// Field name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated form values. Optional fields are empty strings when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title input.
    pub title: String,
    /// Description textarea.
    pub description: String,
    /// Status select value.
    pub status: String,
    /// Priority select value.
    pub priority: String,
    /// Due date input (`YYYY-MM-DD`).
    pub due_date: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending.as_str().to_owned(),
            priority: TaskPriority::Medium.as_str().to_owned(),
            due_date: String::new(),
        }
    }
}

impl TaskDraft {
    /// Pre-populate the form from an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.as_str().to_owned(),
            priority: task.priority.as_str().to_owned(),
            due_date: task.due_date.map(|date| date.to_string()).unwrap_or_default(),
        }
    }

    /// Mutable access to the raw value of `field`.
    pub const fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Description => &mut self.description,
            DraftField::Status => &mut self.status,
            DraftField::Priority => &mut self.priority,
            DraftField::DueDate => &mut self.due_date,
        }
    }

    /// Run every field rule.
    ///
    /// # Errors
    /// Returns the per-field messages when any rule fails.
    pub fn validate(&self) -> Result<ValidatedTask, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title_chars = self.title.chars().count();
        if title_chars == 0 {
            errors.insert(DraftField::Title, "Title is required");
        } else if title_chars > TITLE_MAX_CHARS {
            errors.insert(DraftField::Title, "Title must be less than 100 characters");
        }

        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.insert(
                DraftField::Description,
                "Description must be less than 500 characters",
            );
        }

        let status = TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == self.status);
        if status.is_none() {
            errors.insert(
                DraftField::Status,
                "Status must be one of: pending, in-progress, completed",
            );
        }

        let priority = TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == self.priority);
        if priority.is_none() {
            errors.insert(
                DraftField::Priority,
                "Priority must be one of: low, medium, high",
            );
        }

        let due_date = if self.due_date.trim().is_empty() {
            None
        } else {
            let parsed = parse_date(&self.due_date);
            if parsed.is_none() {
                errors.insert(DraftField::DueDate, "Due date must be a valid date");
            }
            parsed
        };

        match (status, priority) {
            (Some(status), Some(priority)) if errors.is_empty() => Ok(ValidatedTask {
                title: self.title.clone(),
                description: Some(self.description.clone()).filter(|text| !text.is_empty()),
                status,
                priority,
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

/// Field messages produced by a failed validation. One message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: BTreeMap<DraftField, String>,
}

impl ValidationErrors {
    /// Record `message` unless the field already has one.
    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.messages.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.messages.get(&field).map(String::as_str)
    }

    /// Drop the message for `field`.
    pub fn clear(&mut self, field: DraftField) {
        self.messages.remove(&field);
    }

    /// Returns true when no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of fields with a message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Iterate over `(field, message)` in form order.
    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.messages
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Typed payload produced by a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTask {
    /// Title.
    pub title: String,
    /// Description; empty input becomes `None`.
    pub description: Option<String>,
    /// Status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Due date; empty input becomes `None`.
    pub due_date: Option<Date>,
}

impl ValidatedTask {
    /// Payload for creating a task.
    #[must_use]
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            status: Some(self.status),
            priority: Some(self.priority),
            due_date: self.due_date,
        }
    }

    /// Payload for updating a task; every editable field is sent.
    #[must_use]
    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            title: Some(self.title),
            description: Some(self.description),
            status: Some(self.status),
            priority: Some(self.priority),
            due_date: Some(self.due_date),
        }
    }
}
