//! CLI entry point for taskflow.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use taskflow_core::{PriorityFilter, StatusFilter};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Personal task dashboard on top of a hosted task store.
#[derive(Parser, Debug)]
#[command(
    name = "taskflow",
    version,
    about = "taskflow: manage your tasks in a PostgREST-backed dashboard"
)]
struct Cli {
    /// Configuration file (defaults to ~/.config/taskflow/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks, newest first.
    #[command(alias = "ls")]
    List {
        /// Case-insensitive substring of title or description.
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        #[arg(long, default_value_t = PriorityFilter::All)]
        priority: PriorityFilter,
        #[arg(long, value_enum, default_value_t = ListFormat::Cards)]
        format: ListFormat,
    },

    /// Show task counts per status.
    Stats,

    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "pending")]
        status: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: Option<String>,
    },

    /// Edit an existing task. Pass an empty string to clear an optional field.
    Edit {
        /// Task id or a unique prefix of it.
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task.
    #[command(alias = "rm")]
    Delete {
        /// Task id or a unique prefix of it.
        task: String,
    },

    /// Move a pending task to in progress.
    Start {
        /// Task id or a unique prefix of it.
        task: String,
    },

    /// Mark a task completed.
    Complete {
        /// Task id or a unique prefix of it.
        task: String,
    },

    /// Move a completed task back to pending.
    Reopen {
        /// Task id or a unique prefix of it.
        task: String,
    },

    /// End the session and forget the stored credentials.
    Logout,
}

/// Output format for `list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Cards,
    Json,
}

fn main() -> Result<()> {
    install_tracing();
    let Cli { config, cmd } = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(commands::run(cmd, config))
}

fn install_tracing() {
    // RUST_LOG overrides; INFO by default.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_command_with_filters() {
        let cli = Cli::parse_from([
            "taskflow",
            "--config",
            "/tmp/taskflow.toml",
            "list",
            "--search",
            "milk",
            "--status",
            "in_progress",
            "--priority",
            "high",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/taskflow.toml")));
        match cli.cmd {
            Command::List {
                search,
                status,
                priority,
                format,
            } => {
                assert_eq!(search.as_deref(), Some("milk"));
                assert_eq!(status.to_string(), "in-progress");
                assert_eq!(priority.to_string(), "high");
                assert_eq!(format, ListFormat::Cards);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn list_filters_default_to_all() {
        let cli = Cli::parse_from(["taskflow", "ls"]);
        match cli.cmd {
            Command::List {
                search,
                status,
                priority,
                ..
            } => {
                assert!(search.is_none());
                assert_eq!(status, StatusFilter::All);
                assert_eq!(priority, PriorityFilter::All);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn unknown_status_filter_is_rejected() {
        let result = Cli::try_parse_from(["taskflow", "list", "--status", "done"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_add_command_defaults() {
        let cli = Cli::parse_from(["taskflow", "add", "--title", "Buy milk"]);
        match cli.cmd {
            Command::Add {
                title,
                description,
                status,
                priority,
                due,
            } => {
                assert_eq!(title, "Buy milk");
                assert!(description.is_none());
                assert_eq!(status, "pending");
                assert_eq!(priority, "medium");
                assert!(due.is_none());
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_edit_command_with_global_config_after_subcommand() {
        let cli = Cli::parse_from([
            "taskflow",
            "edit",
            "0190",
            "--due",
            "",
            "--config",
            "cfg.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
        match cli.cmd {
            Command::Edit {
                task, title, due, ..
            } => {
                assert_eq!(task, "0190");
                assert_eq!(due.as_deref(), Some(""));
                assert!(title.is_none());
            }
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn parse_quick_status_commands() {
        let cases: [(&str, fn(&Command) -> bool); 4] = [
            ("start", |cmd| matches!(cmd, Command::Start { .. })),
            ("complete", |cmd| matches!(cmd, Command::Complete { .. })),
            ("reopen", |cmd| matches!(cmd, Command::Reopen { .. })),
            ("rm", |cmd| matches!(cmd, Command::Delete { .. })),
        ];
        for (name, check) in cases {
            let cli = Cli::parse_from(["taskflow", name, "abc"]);
            assert!(check(&cli.cmd), "{name} parsed into {:?}", cli.cmd);
        }
    }
}
