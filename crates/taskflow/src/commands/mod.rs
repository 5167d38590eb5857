//! Subcommand handlers driving the dashboard controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, anyhow, bail};
use taskflow_app::{
    AppConfig, DashboardController, DashboardError, EditorError, Notification, Notifier,
    QuickAction, Session, Severity, StatusChangeGuard, default_config_path,
};
use taskflow_core::{DraftField, PriorityFilter, StatusFilter, Task, TaskId, TaskPriority, TaskStatus};
use taskflow_store::RestStore;
use time::OffsetDateTime;
use tracing::debug;

use crate::{Command, ListFormat};

mod render;

type Dashboard = DashboardController<RestStore, Arc<ConsoleNotifier>>;

/// Prints notifications and counts the failures among them.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    failures: AtomicUsize,
}

impl ConsoleNotifier {
    fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = render::notification(&notification);
        match notification.severity {
            Severity::Info => println!("{line}"),
            Severity::Destructive => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                eprintln!("{line}");
            }
        }
    }
}

/// Raw field values given on the command line. `None` leaves a field untouched.
#[derive(Debug, Default)]
struct FieldArgs {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due: Option<String>,
}

impl FieldArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due.is_none()
    }

    /// Pairs of draft field and value, with status and priority spelled the wire way.
    fn into_edits(self) -> Vec<(DraftField, String)> {
        [
            (DraftField::Title, self.title),
            (DraftField::Description, self.description),
            (DraftField::Status, self.status.map(normalize_status)),
            (DraftField::Priority, self.priority.map(normalize_priority)),
            (DraftField::DueDate, self.due),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

/// Execute `command` against the configured store.
///
/// # Errors
/// Returns an error when the configuration is unusable, no user is signed in,
/// or the requested operation did not take effect.
pub async fn run(command: Command, config_path: Option<PathBuf>) -> Result<()> {
    let config_path = config_path.or_else(default_config_path);
    let mut config = AppConfig::load(config_path.as_deref())?;
    let session = config.session()?;
    if session == Session::SignedOut {
        bail!(
            "not signed in: set [session] user_id in {}",
            describe(config_path.as_deref())
        );
    }

    let store = RestStore::new(config.rest_config()?);
    let notifier = Arc::new(ConsoleNotifier::default());
    let mut dashboard = DashboardController::new(store, Arc::clone(&notifier), Session::SignedOut)
        .with_due_soon_window(config.due_soon_window());

    // Logout only talks to the auth endpoint.
    if !matches!(command, Command::Logout) {
        dashboard.activate(session).await;
        if notifier.failures() > 0 {
            bail!("could not load tasks from {}", describe_remote(&config));
        }
        debug!(count = dashboard.tasks().len(), "Dashboard ready");
    }

    dispatch(&mut dashboard, command, &mut config, config_path.as_deref()).await
}

async fn dispatch(
    dashboard: &mut Dashboard,
    command: Command,
    config: &mut AppConfig,
    config_path: Option<&Path>,
) -> Result<()> {
    match command {
        Command::List {
            search,
            status,
            priority,
            format,
        } => list(dashboard, search, status, priority, format),
        Command::Stats => {
            println!("{}", render::stats(&dashboard.stats()));
            Ok(())
        }
        Command::Add {
            title,
            description,
            status,
            priority,
            due,
        } => {
            add(
                dashboard,
                FieldArgs {
                    title: Some(title),
                    description,
                    status: Some(status),
                    priority: Some(priority),
                    due,
                },
            )
            .await
        }
        Command::Edit {
            task,
            title,
            description,
            status,
            priority,
            due,
        } => {
            edit(
                dashboard,
                &task,
                FieldArgs {
                    title,
                    description,
                    status,
                    priority,
                    due,
                },
            )
            .await
        }
        Command::Delete { task } => delete(dashboard, &task).await,
        Command::Start { task } => quick_action(dashboard, &task, QuickAction::StartTask).await,
        Command::Complete { task } => {
            quick_action(dashboard, &task, QuickAction::MarkComplete).await
        }
        Command::Reopen { task } => quick_action(dashboard, &task, QuickAction::Reopen).await,
        Command::Logout => logout(dashboard, config, config_path).await,
    }
}

fn list(
    dashboard: &mut Dashboard,
    search: Option<String>,
    status: StatusFilter,
    priority: PriorityFilter,
    format: ListFormat,
) -> Result<()> {
    if let Some(term) = search {
        dashboard.set_search(term);
    }
    dashboard.set_status_filter(status);
    dashboard.set_priority_filter(priority);

    match format {
        ListFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dashboard.filtered_tasks())?);
        }
        ListFormat::Cards => {
            println!("{}", render::header(dashboard.display_name()));
            println!("{}\n", render::stats(&dashboard.stats()));
            let view = dashboard.list_view(OffsetDateTime::now_utc(), &StatusChangeGuard::default());
            print!("{}", render::list_view(&view));
        }
    }
    Ok(())
}

async fn add(dashboard: &mut Dashboard, fields: FieldArgs) -> Result<()> {
    dashboard.open_create();
    for (field, value) in fields.into_edits() {
        dashboard.edit_field(field, value);
    }
    let task = submit(dashboard).await?;
    println!("{}", task.id);
    Ok(())
}

async fn edit(dashboard: &mut Dashboard, query: &str, fields: FieldArgs) -> Result<()> {
    if fields.is_empty() {
        bail!("nothing to change: pass at least one of --title, --description, --status, --priority or --due");
    }
    let id = resolve_task(dashboard.tasks(), query)?;
    if !dashboard.edit_task(id) {
        bail!("task {id} is not loaded");
    }
    for (field, value) in fields.into_edits() {
        dashboard.edit_field(field, value);
    }
    submit(dashboard).await.map(drop)
}

async fn submit(dashboard: &mut Dashboard) -> Result<Task> {
    match dashboard.submit_editor().await {
        Ok(task) => Ok(task),
        Err(DashboardError::Editor(EditorError::Invalid(errors))) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            bail!("task was not saved: {} invalid field(s)", errors.len())
        }
        Err(err) => Err(anyhow!(err).context("task was not saved")),
    }
}

async fn delete(dashboard: &mut Dashboard, query: &str) -> Result<()> {
    let id = resolve_task(dashboard.tasks(), query)?;
    dashboard.delete_task(id).await;
    if dashboard.task(id).is_some() {
        bail!("task {id} was not deleted");
    }
    Ok(())
}

async fn quick_action(dashboard: &mut Dashboard, query: &str, action: QuickAction) -> Result<()> {
    let id = resolve_task(dashboard.tasks(), query)?;
    let status = dashboard
        .task(id)
        .map(|task| task.status)
        .with_context(|| format!("task {id} is not loaded"))?;
    if !QuickAction::available(status).contains(&action) {
        bail!(
            "{} is not available for {} tasks",
            action.label(),
            status.display_label()
        );
    }
    if !dashboard.change_status(id, action.target()).await {
        bail!("status of task {id} was not changed");
    }
    Ok(())
}

async fn logout(dashboard: &mut Dashboard, config: &mut AppConfig, path: Option<&Path>) -> Result<()> {
    let auth = dashboard.store().clone();
    if !dashboard.sign_out(&auth).await {
        bail!("failed to sign out; the stored session was kept");
    }
    config.clear_session();
    let path = path.context("no configuration file to update")?;
    config.save(path)
}

/// Find the loaded task whose id is `query` or starts with it.
fn resolve_task(tasks: &[Task], query: &str) -> Result<TaskId> {
    let query = query.trim().to_ascii_lowercase();
    if query.is_empty() {
        bail!("task id must not be empty");
    }
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&query));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (None, _) => bail!("no task matches {query:?}"),
        (Some(_), Some(_)) => bail!("task id prefix {query:?} is ambiguous"),
    }
}

fn normalize_status(raw: String) -> String {
    raw.parse::<TaskStatus>()
        .map_or(raw, |status| status.as_str().to_owned())
}

fn normalize_priority(raw: String) -> String {
    raw.parse::<TaskPriority>()
        .map_or(raw, |priority| priority.as_str().to_owned())
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(
        || "the configuration file".to_owned(),
        |path| path.display().to_string(),
    )
}

fn describe_remote(config: &AppConfig) -> &str {
    config.remote.url.as_deref().unwrap_or("the task store")
}
