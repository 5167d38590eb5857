//! Plain-text rendering of dashboard view models.

use std::fmt::Write as _;

use taskflow_app::{Notification, QuickAction, TaskCard, TaskListView};
use taskflow_core::{TaskStats, TaskStatus};

/// One line per notification: `Task deleted: The task has been removed successfully.`
pub fn notification(notification: &Notification) -> String {
    let title = notification.title.as_str();
    if title.ends_with(['!', '.', '?']) {
        format!("{title} {}", notification.description)
    } else {
        format!("{title}: {}", notification.description)
    }
}

pub fn header(display_name: &str) -> String {
    format!("Tasks of {display_name}")
}

/// `Total: 3 | Pending: 1 | In Progress: 1 | Completed: 1`
pub fn stats(stats: &TaskStats) -> String {
    let mut line = format!("Total: {}", stats.total);
    for status in TaskStatus::ALL {
        let _ = write!(line, " | {}: {}", status.title(), stats.count(status));
    }
    line
}

pub fn list_view(view: &TaskListView) -> String {
    match view {
        TaskListView::Loading => "Loading...\n".to_owned(),
        TaskListView::Cards(cards) => cards.iter().map(card).collect(),
        TaskListView::Empty | TaskListView::NoMatches => view
            .empty_state()
            .map(|state| format!("{}\n{}\n", state.heading, state.hint))
            .unwrap_or_default(),
    }
}

fn card(card: &TaskCard) -> String {
    let marker = if card.completed { "x" } else { " " };
    let mut out = format!(
        "[{marker}] {}  ({}, {})\n    id: {}\n",
        card.title, card.status_label, card.priority, card.id
    );
    if let Some(description) = &card.description {
        let _ = writeln!(out, "    {description}");
    }
    if let Some(due) = &card.due_label {
        match card.due_badge {
            Some(badge) => {
                let _ = writeln!(out, "    {due} [{}]", badge.label());
            }
            None => {
                let _ = writeln!(out, "    {due}");
            }
        }
    }
    if !card.actions.is_empty() {
        let labels: Vec<&str> = card.actions.iter().copied().map(QuickAction::label).collect();
        let _ = writeln!(out, "    actions: {}", labels.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_app::StatusChangeGuard;
    use taskflow_core::{DEFAULT_DUE_SOON_WINDOW, Task, TaskId, TaskPriority, UserId};
    use time::OffsetDateTime;
    use time::macros::{date, datetime};

    const NOW: OffsetDateTime = datetime!(2025-03-10 12:00 UTC);

    fn task(title: &str, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(),
            title: title.into(),
            description: Some("From the corner shop".into()),
            status,
            priority: TaskPriority::High,
            due_date: Some(date!(2025 - 03 - 04)),
            created_at: NOW,
            updated_at: NOW,
            user_id: UserId::new(),
        }
    }

    #[test]
    fn notification_joins_title_and_description() {
        assert_eq!(
            notification(&Notification::info(
                "Task created!",
                "Your new task has been created successfully."
            )),
            "Task created! Your new task has been created successfully."
        );
        assert_eq!(
            notification(&Notification::destructive(
                "Error deleting task",
                "Please try again later."
            )),
            "Error deleting task: Please try again later."
        );
    }

    #[test]
    fn stats_line_lists_every_status() {
        let tasks = [
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::Completed),
        ];
        assert_eq!(
            stats(&TaskStats::from_tasks(&tasks)),
            "Total: 3 | Pending: 1 | In Progress: 0 | Completed: 2"
        );
    }

    #[test]
    fn card_shows_due_badge_and_actions() {
        let subject = task("Buy milk", TaskStatus::Pending);
        let view = TaskListView::build(
            1,
            &[&subject],
            NOW,
            DEFAULT_DUE_SOON_WINDOW,
            &StatusChangeGuard::default(),
        );
        let text = list_view(&view);
        assert!(text.starts_with("[ ] Buy milk  (pending, high)\n"));
        assert!(text.contains("    From the corner shop\n"));
        assert!(text.contains("    Due: Mar 04, 2025 [Overdue]\n"));
        assert!(text.contains("    actions: Mark Complete, Start Task\n"));
    }

    #[test]
    fn empty_views_print_heading_and_hint() {
        assert_eq!(
            list_view(&TaskListView::Empty),
            "No tasks yet\nCreate your first task to get started!\n"
        );
        assert_eq!(
            list_view(&TaskListView::NoMatches),
            "No tasks match your filters\nTry adjusting your search or filter criteria.\n"
        );
    }
}
