#![allow(missing_docs)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use assert_cmd::cargo::CommandCargoExt;
use tempfile::TempDir;

const USER_ID: &str = "0b0a6a1e-1c52-4d5b-9a43-9d6f6c1b2a10";

fn taskflow(config: &Path, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::cargo_bin("taskflow")?;
    cmd.arg("--config").arg(config).args(args);
    cmd.env("RUST_LOG", "off");
    Ok(cmd.output()?)
}

fn write_config(dir: &TempDir, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn help_lists_dashboard_commands() -> Result<()> {
    let output = Command::cargo_bin("taskflow")?.arg("--help").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    for command in ["list", "stats", "add", "edit", "delete", "start", "complete", "reopen", "logout"] {
        assert!(stdout.contains(command), "missing {command} in help:\n{stdout}");
    }
    Ok(())
}

#[test]
fn commands_require_a_session() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(
        &dir,
        "[remote]\nurl = \"http://127.0.0.1:9\"\napi_key = \"anon\"\n",
    )?;

    let output = taskflow(&config, &["list"])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("not signed in"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn invalid_configuration_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(&dir, "[dashboard]\ndue_soon_days = 0\n")?;

    let output = taskflow(&config, &["stats"])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("due_soon_days"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn unreachable_store_fails_the_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = write_config(
        &dir,
        &format!(
            "[remote]\nurl = \"http://127.0.0.1:9\"\napi_key = \"anon\"\n\n[session]\nuser_id = \"{USER_ID}\"\n"
        ),
    )?;

    let output = taskflow(&config, &["list"])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Error loading tasks"), "stderr: {stderr}");
    assert!(stderr.contains("could not load tasks"), "stderr: {stderr}");
    Ok(())
}
