use serde::Serialize;

use crate::task::{Task, TaskStatus};

/// Aggregate counts over the full, unfiltered task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Tasks in [`TaskStatus::Pending`].
    pub pending: usize,
    /// Tasks in [`TaskStatus::InProgress`].
    pub in_progress: usize,
    /// Tasks in [`TaskStatus::Completed`].
    pub completed: usize,
}

impl TaskStats {
    /// Count tasks per status.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            stats
        })
    }

    /// Count for a single status bucket.
    #[must_use]
    pub const fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{TaskId, UserId};
    use crate::task::TaskPriority;
    use time::OffsetDateTime;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(),
            title: "t".into(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            user_id: UserId::default(),
        }
    }

    #[test]
    fn counts_each_status_bucket() {
        let tasks = vec![
            task(TaskStatus::Pending),
            task(TaskStatus::Completed),
            task(TaskStatus::Pending),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(
            stats,
            TaskStats {
                total: 3,
                pending: 2,
                in_progress: 0,
                completed: 1,
            }
        );
        assert_eq!(stats.count(TaskStatus::Pending), 2);
    }

    #[test]
    fn empty_collection_has_zero_counts() {
        assert_eq!(TaskStats::from_tasks(&[]), TaskStats::default());
    }
}
