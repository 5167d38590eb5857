//! Task rows, profiles, and the insert/update payloads exchanged with the store.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::date;
use crate::id::{TaskId, UserId};

/// Error returned when a user-facing token does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Every status in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Lower-case label with the separator replaced by a space (`in progress`).
    #[must_use]
    pub fn display_label(self) -> String {
        self.as_str().replace('-', " ")
    }

    /// Title-cased label used for select options and statistics headings.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownValue {
                kind: "status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal priority.
    #[default]
    Medium,
    /// Urgent.
    High,
}

impl TaskPriority {
    /// Every priority from highest to lowest, matching the filter menu order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Title-cased label used for select options.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownValue {
                kind: "priority",
                value: s.to_owned(),
            }),
        }
    }
}

/// A persisted task row owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional calendar due date.
    #[serde(default, with = "date::option")]
    pub due_date: Option<Date>,
    /// Server-assigned creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Server-maintained modification timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Owner of the row.
    pub user_id: UserId,
}

/// Profile row of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same value as the user id.
    pub id: UserId,
    /// Optional display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Profile {
    /// Name shown in the dashboard header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.full_name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .unwrap_or("User")
    }
}

/// Fields supplied when creating a task. Omitted status/priority fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status, defaults to [`TaskStatus::Pending`].
    pub status: Option<TaskStatus>,
    /// Priority, defaults to [`TaskPriority::Medium`].
    pub priority: Option<TaskPriority>,
    /// Optional due date.
    pub due_date: Option<Date>,
}

impl NewTask {
    /// Create a draft with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Resolve defaults and attach the owner, producing the row to insert.
    #[must_use]
    pub fn into_insert(self, owner: UserId) -> TaskInsert {
        TaskInsert {
            title: self.title,
            description: self.description,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            user_id: owner,
        }
    }
}

/// Fully resolved row submitted on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInsert {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: TaskPriority,
    /// Optional due date.
    #[serde(with = "date::option")]
    pub due_date: Option<Date>,
    /// Owner of the new row.
    pub user_id: UserId,
}

/// Partial update: `None` leaves a field untouched.
///
/// `description` and `due_date` use a nested option so that `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New title.
    pub title: Option<String>,
    /// New or cleared description.
    pub description: Option<Option<String>>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New or cleared due date.
    pub due_date: Option<Option<Date>>,
}

impl TaskChanges {
    /// Change only the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Change only the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Apply the present fields to `task`. Timestamps are left to the caller.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

impl Serialize for TaskChanges {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(title) = &self.title {
            map.serialize_entry("title", title)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        if let Some(status) = &self.status {
            map.serialize_entry("status", status)?;
        }
        if let Some(priority) = &self.priority {
            map.serialize_entry("priority", priority)?;
        }
        if let Some(due_date) = &self.due_date {
            map.serialize_entry("due_date", &due_date.map(|date| date.to_string()))?;
        }
        map.end()
    }
}
