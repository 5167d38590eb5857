//! Dashboard filter criteria and the derived filtered view.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::task::{Task, TaskPriority, TaskStatus};
use crate::text_matcher::TextMatcher;

/// Error raised when a filter token is neither `all` nor a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    /// Unknown status token.
    #[error("invalid status filter: {token} (expected all, pending, in-progress or completed)")]
    InvalidStatus {
        /// Rejected input.
        token: String,
    },
    /// Unknown priority token.
    #[error("invalid priority filter: {token} (expected all, low, medium or high)")]
    InvalidPriority {
        /// Rejected input.
        token: String,
    },
}

/// Status predicate: everything or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No restriction.
    #[default]
    All,
    /// Only tasks in this status.
    Only(TaskStatus),
}

impl StatusFilter {
    /// Returns true when `status` passes the filter.
    #[must_use]
    pub fn accepts(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only).map_err(|_| FilterParseError::InvalidStatus {
            token: s.to_owned(),
        })
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Priority predicate: everything or a single priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    /// No restriction.
    #[default]
    All,
    /// Only tasks with this priority.
    Only(TaskPriority),
}

impl PriorityFilter {
    /// Returns true when `priority` passes the filter.
    #[must_use]
    pub fn accepts(self, priority: TaskPriority) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only).map_err(|_| FilterParseError::InvalidPriority {
            token: s.to_owned(),
        })
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => fmt::Display::fmt(priority, f),
        }
    }
}

/// Conjunction of the search, status, and priority predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Raw search box contents.
    pub search: String,
    /// Status predicate.
    pub status: StatusFilter,
    /// Priority predicate.
    pub priority: PriorityFilter,
}

impl TaskFilter {
    /// Start from the unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Restrict to one status.
    #[must_use]
    pub const fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Restrict to one priority.
    #[must_use]
    pub const fn priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    /// Returns true when the filter accepts every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
    }

    /// Evaluate the filter against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let matches_search =
            TextMatcher::new(&self.search).is_none_or(|matcher| matcher.matches(task));
        matches_search && self.status.accepts(task.status) && self.priority.accepts(task.priority)
    }

    /// Derive the filtered view, preserving collection order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let matcher = TextMatcher::new(&self.search);
        tasks
            .iter()
            .filter(|task| {
                matcher.as_ref().is_none_or(|matcher| matcher.matches(task))
                    && self.status.accepts(task.status)
                    && self.priority.accepts(task.priority)
            })
            .collect()
    }
}
