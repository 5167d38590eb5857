//! View model for the task list: one card per task plus empty states.

use std::collections::HashSet;

use taskflow_core::{BadgeVariant, DueBadge, DueFlags, Task, TaskId, TaskPriority, TaskStatus};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

const DUE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

/// One-click status transition offered on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    /// Move to completed.
    MarkComplete,
    /// Move pending work to in-progress.
    StartTask,
    /// Move completed work back to pending.
    Reopen,
}

impl QuickAction {
    /// Actions offered for `status`.
    ///
    /// Completed tasks can only be reopened to pending, never moved back to
    /// in-progress; in-progress tasks cannot return to pending from here.
    #[must_use]
    pub const fn available(status: TaskStatus) -> &'static [Self] {
        match status {
            TaskStatus::Pending => &[Self::MarkComplete, Self::StartTask],
            TaskStatus::InProgress => &[Self::MarkComplete],
            TaskStatus::Completed => &[Self::Reopen],
        }
    }

    /// Button text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarkComplete => "Mark Complete",
            Self::StartTask => "Start Task",
            Self::Reopen => "Reopen",
        }
    }

    /// Status the action moves the task to.
    #[must_use]
    pub const fn target(self) -> TaskStatus {
        match self {
            Self::MarkComplete => TaskStatus::Completed,
            Self::StartTask => TaskStatus::InProgress,
            Self::Reopen => TaskStatus::Pending,
        }
    }

    /// Button style.
    #[must_use]
    pub const fn variant(self) -> BadgeVariant {
        match self {
            Self::MarkComplete => BadgeVariant::Success,
            Self::StartTask => BadgeVariant::Secondary,
            Self::Reopen => BadgeVariant::Outline,
        }
    }
}

/// Tracks cards whose status change is in flight.
#[derive(Debug, Default, Clone)]
pub struct StatusChangeGuard {
    changing: HashSet<TaskId>,
}

impl StatusChangeGuard {
    /// Mark `id` as changing. Returns false when a change is already running.
    pub fn try_begin(&mut self, id: TaskId) -> bool {
        self.changing.insert(id)
    }

    /// Release `id`.
    pub fn finish(&mut self, id: TaskId) {
        self.changing.remove(&id);
    }

    /// Returns true while a change for `id` is in flight.
    #[must_use]
    pub fn is_changing(&self, id: TaskId) -> bool {
        self.changing.contains(&id)
    }
}

/// `Due: Mar 14, 2025`.
#[must_use]
pub fn due_label(date: Date) -> Option<String> {
    date.format(DUE_FORMAT)
        .ok()
        .map(|formatted| format!("Due: {formatted}"))
}

/// Everything needed to render a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    /// Task id, used by edit and delete actions.
    pub id: TaskId,
    /// Heading.
    pub title: String,
    /// Body text; omitted when empty.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Status text with separators replaced by spaces.
    pub status_label: String,
    /// Status chip style.
    pub status_badge: BadgeVariant,
    /// Current priority.
    pub priority: TaskPriority,
    /// Priority chip style.
    pub priority_badge: BadgeVariant,
    /// Formatted due date.
    pub due_label: Option<String>,
    /// Overdue wins over due-soon.
    pub due_badge: Option<DueBadge>,
    /// Rendered struck through.
    pub completed: bool,
    /// Quick status actions.
    pub actions: &'static [QuickAction],
    /// Actions are disabled while true.
    pub changing: bool,
}

impl TaskCard {
    /// Build the card for `task` as of `now`.
    #[must_use]
    pub fn new(task: &Task, now: OffsetDateTime, due_soon_window: Duration) -> Self {
        let flags = DueFlags::evaluate(task, now, due_soon_window);
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone().filter(|text| !text.is_empty()),
            status: task.status,
            status_label: task.status.display_label(),
            status_badge: task.status.badge(),
            priority: task.priority,
            priority_badge: task.priority.badge(),
            due_label: task.due_date.and_then(due_label),
            due_badge: flags.badge(),
            completed: task.status == TaskStatus::Completed,
            actions: QuickAction::available(task.status),
            changing: false,
        }
    }
}

/// Placeholder shown instead of cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    /// Main line.
    pub heading: &'static str,
    /// Secondary line.
    pub hint: &'static str,
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    /// Initial load in flight.
    Loading,
    /// The user has no tasks at all.
    Empty,
    /// Tasks exist but none pass the filters.
    NoMatches,
    /// Cards in collection order.
    Cards(Vec<TaskCard>),
}

impl TaskListView {
    /// Build the view from the full collection size and the filtered tasks.
    #[must_use]
    pub fn build(
        total: usize,
        filtered: &[&Task],
        now: OffsetDateTime,
        due_soon_window: Duration,
        guard: &StatusChangeGuard,
    ) -> Self {
        if total == 0 {
            return Self::Empty;
        }
        if filtered.is_empty() {
            return Self::NoMatches;
        }
        Self::Cards(
            filtered
                .iter()
                .map(|task| {
                    let mut card = TaskCard::new(task, now, due_soon_window);
                    card.changing = guard.is_changing(task.id);
                    card
                })
                .collect(),
        )
    }

    /// Placeholder for the empty variants.
    #[must_use]
    pub const fn empty_state(&self) -> Option<EmptyState> {
        match self {
            Self::Empty => Some(EmptyState {
                heading: "No tasks yet",
                hint: "Create your first task to get started!",
            }),
            Self::NoMatches => Some(EmptyState {
                heading: "No tasks match your filters",
                hint: "Try adjusting your search or filter criteria.",
            }),
            Self::Loading | Self::Cards(_) => None,
        }
    }
}
