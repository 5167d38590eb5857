//! Domain types and pure derivations for the TaskFlow dashboard.

/// Badge styling for priorities, statuses and due flags.
pub mod badge;
/// Calendar-date parsing and serde adapters.
pub mod date;
/// Overdue and due-soon flags.
pub mod due;
/// Filter criteria and the filtered view.
pub mod filter;
/// Identifier types.
pub mod id;
/// Aggregate counts.
pub mod stats;
/// Task rows and payloads.
pub mod task;
/// Search term matching.
pub mod text_matcher;
/// Editor form validation.
pub mod validation;

pub use badge::BadgeVariant;
pub use due::{DEFAULT_DUE_SOON_WINDOW, DueBadge, DueFlags};
pub use filter::{FilterParseError, PriorityFilter, StatusFilter, TaskFilter};
pub use id::{TaskId, UserId};
pub use stats::TaskStats;
pub use task::{
    NewTask, Profile, Task, TaskChanges, TaskInsert, TaskPriority, TaskStatus, UnknownValue,
};
pub use validation::{DraftField, TaskDraft, ValidatedTask, ValidationErrors};
