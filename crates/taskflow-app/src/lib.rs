//! Application layer of the TaskFlow dashboard.
//!
//! This crate hosts the dashboard controller, the editor dialog state
//! machine, the task list view model, and the collaborators they talk to
//! (notifications, sessions, configuration).

pub mod config;
pub mod dashboard;
pub mod editor;
pub mod notify;
pub mod session;
pub mod task_card;

// Re-exports for convenience
pub use config::{AppConfig, DashboardConfig, RemoteConfig, SessionConfig, default_config_path};
pub use dashboard::{DashboardController, DashboardError};
pub use editor::{EditorError, EditorMode, TaskEditor};
pub use notify::{Notification, Notifier, Severity};
pub use session::{AuthProvider, Session, User};
pub use task_card::{EmptyState, QuickAction, StatusChangeGuard, TaskCard, TaskListView, due_label};
