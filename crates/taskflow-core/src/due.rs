//! Overdue / due-soon classification used by task cards.

use time::{Duration, OffsetDateTime};

use crate::badge::BadgeVariant;
use crate::task::{Task, TaskStatus};

/// Default look-ahead for the due-soon flag.
pub const DEFAULT_DUE_SOON_WINDOW: Duration = Duration::days(3);

/// Presentation flags derived from a task's due date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueFlags {
    /// Due date is in the past and the task is not completed.
    pub overdue: bool,
    /// Due date falls before `now + window` and the task is not completed.
    pub due_soon: bool,
}

impl DueFlags {
    /// Classify `task` relative to `now`.
    ///
    /// A due date is treated as the start of that day in UTC.
    #[must_use]
    pub fn evaluate(task: &Task, now: OffsetDateTime, window: Duration) -> Self {
        let Some(due) = task.due_date else {
            return Self::default();
        };
        if task.status == TaskStatus::Completed {
            return Self::default();
        }
        let due_start = due.midnight().assume_utc();
        Self {
            overdue: due_start < now,
            due_soon: due_start < now + window,
        }
    }

    /// The single badge to display; overdue wins over due-soon.
    #[must_use]
    pub const fn badge(self) -> Option<DueBadge> {
        if self.overdue {
            Some(DueBadge::Overdue)
        } else if self.due_soon {
            Some(DueBadge::DueSoon)
        } else {
            None
        }
    }
}

/// Due-date badge shown on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBadge {
    /// Past due.
    Overdue,
    /// Due within the look-ahead window.
    DueSoon,
}

impl DueBadge {
    /// Badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::DueSoon => "Due Soon",
        }
    }

    /// Badge styling.
    #[must_use]
    pub const fn variant(self) -> BadgeVariant {
        match self {
            Self::Overdue => BadgeVariant::Destructive,
            Self::DueSoon => BadgeVariant::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{TaskId, UserId};
    use crate::task::TaskPriority;
    use time::Date;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-15 14:30 UTC);

    fn task(due_date: Option<Date>, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(),
            title: "t".into(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            user_id: UserId::default(),
        }
    }

    fn days_from_now(days: i64) -> Option<Date> {
        Some((NOW + Duration::days(days)).date())
    }

    #[test]
    fn yesterday_pending_is_overdue_only_badge() {
        let flags = DueFlags::evaluate(
            &task(days_from_now(-1), TaskStatus::Pending),
            NOW,
            DEFAULT_DUE_SOON_WINDOW,
        );
        assert!(flags.overdue);
        assert_eq!(flags.badge(), Some(DueBadge::Overdue));
    }

    #[test]
    fn two_days_out_pending_is_due_soon() {
        let flags = DueFlags::evaluate(
            &task(days_from_now(2), TaskStatus::Pending),
            NOW,
            DEFAULT_DUE_SOON_WINDOW,
        );
        assert!(!flags.overdue);
        assert!(flags.due_soon);
        assert_eq!(flags.badge(), Some(DueBadge::DueSoon));
    }

    #[test]
    fn completed_tasks_have_no_flags() {
        let flags = DueFlags::evaluate(
            &task(days_from_now(2), TaskStatus::Completed),
            NOW,
            DEFAULT_DUE_SOON_WINDOW,
        );
        assert_eq!(flags, DueFlags::default());
        let flags = DueFlags::evaluate(
            &task(days_from_now(-5), TaskStatus::Completed),
            NOW,
            DEFAULT_DUE_SOON_WINDOW,
        );
        assert_eq!(flags.badge(), None);
    }

    #[test]
    fn far_future_and_missing_dates_are_unflagged() {
        let far = DueFlags::evaluate(
            &task(days_from_now(10), TaskStatus::InProgress),
            NOW,
            DEFAULT_DUE_SOON_WINDOW,
        );
        assert_eq!(far, DueFlags::default());
        let none = DueFlags::evaluate(&task(None, TaskStatus::Pending), NOW, DEFAULT_DUE_SOON_WINDOW);
        assert_eq!(none, DueFlags::default());
    }

    #[test]
    fn window_is_configurable() {
        let flags = DueFlags::evaluate(
            &task(days_from_now(5), TaskStatus::Pending),
            NOW,
            Duration::days(7),
        );
        assert!(flags.due_soon);
    }
}
