use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use taskflow_core::UserId;
use taskflow_store::RestConfig;
use time::Duration;

use crate::session::{Session, User};

const CONFIG_DIR: &str = "taskflow";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DUE_SOON_DAYS: u32 = 3;
const MAX_DUE_SOON_DAYS: u32 = 365;

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/taskflow/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Store connection.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Signed-in user.
    #[serde(default)]
    pub session: SessionConfig,
    /// Presentation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// `[remote]`: where the task store lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Project URL.
    pub url: Option<String>,
    /// Public API key.
    pub api_key: Option<String>,
}

/// `[session]`: the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// User id (UUID).
    pub user_id: Option<String>,
    /// Session bearer token.
    pub access_token: Option<String>,
    /// Login email.
    pub email: Option<String>,
}

/// `[dashboard]`: presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Look-ahead of the due-soon badge, in days.
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
        }
    }
}

const fn default_due_soon_days() -> u32 {
    DEFAULT_DUE_SOON_DAYS
}

impl AppConfig {
    /// Load from `path`, or from [`default_config_path`] when `None`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error when serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.remote.url
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            bail!("remote.url must be an http(s) URL, got {url:?}");
        }
        if let Some(user_id) = &self.session.user_id {
            user_id
                .parse::<UserId>()
                .with_context(|| format!("session.user_id is not a UUID: {user_id:?}"))?;
        }
        if !(1..=MAX_DUE_SOON_DAYS).contains(&self.dashboard.due_soon_days) {
            bail!(
                "dashboard.due_soon_days must be between 1 and {MAX_DUE_SOON_DAYS}, got {}",
                self.dashboard.due_soon_days
            );
        }
        Ok(())
    }

    /// Session described by `[session]`.
    ///
    /// # Errors
    /// Returns an error when `user_id` is not a UUID.
    pub fn session(&self) -> Result<Session> {
        let Some(raw) = &self.session.user_id else {
            return Ok(Session::SignedOut);
        };
        let id = raw
            .parse::<UserId>()
            .with_context(|| format!("session.user_id is not a UUID: {raw:?}"))?;
        Ok(Session::SignedIn(User {
            id,
            email: self.session.email.clone(),
        }))
    }

    /// Drop the stored session.
    pub fn clear_session(&mut self) {
        self.session = SessionConfig::default();
    }

    /// Connection settings for the HTTP store.
    ///
    /// # Errors
    /// Returns an error when `remote.url` or `remote.api_key` is missing.
    pub fn rest_config(&self) -> Result<RestConfig> {
        let base_url = self
            .remote
            .url
            .clone()
            .context("remote.url is not configured")?;
        let api_key = self
            .remote
            .api_key
            .clone()
            .context("remote.api_key is not configured")?;
        Ok(RestConfig {
            base_url,
            api_key,
            access_token: self.session.access_token.clone(),
        })
    }

    /// Due-soon look-ahead.
    #[must_use]
    pub fn due_soon_window(&self) -> Duration {
        Duration::days(i64::from(self.dashboard.due_soon_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = AppConfig::load(Some(&dir.path().join(CONFIG_FILE)))?;
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.due_soon_window(), Duration::days(3));
        assert_eq!(cfg.session()?, Session::SignedOut);
        Ok(())
    }

    #[test]
    fn load_full_config() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        let mut file = fs::File::create(&path)?;
        writeln!(
            file,
            "[remote]\nurl = \"https://demo.example.invalid\"\napi_key = \"anon\"\n\n[session]\nuser_id = \"0b0a6a1e-1c52-4d5b-9a43-9d6f6c1b2a10\"\naccess_token = \"jwt\"\nemail = \"me@example.invalid\"\n\n[dashboard]\ndue_soon_days = 7"
        )?;

        let cfg = AppConfig::load(Some(&path))?;
        assert_eq!(cfg.due_soon_window(), Duration::days(7));
        let rest = cfg.rest_config()?;
        assert_eq!(rest.base_url, "https://demo.example.invalid");
        assert_eq!(rest.access_token.as_deref(), Some("jwt"));
        let session = cfg.session()?;
        assert_eq!(
            session.user().and_then(|user| user.email.as_deref()),
            Some("me@example.invalid")
        );
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[session]\nuser_id = \"not-a-uuid\"\n")?;
        let Err(err) = AppConfig::load(Some(&path)) else {
            panic!("bad user id should error");
        };
        assert!(format!("{err:#}").contains("session.user_id is not a UUID"));

        fs::write(&path, "[dashboard]\ndue_soon_days = 0\n")?;
        assert!(AppConfig::load(Some(&path)).is_err());

        fs::write(&path, "[remote]\nurl = \"ftp://nope\"\n")?;
        assert!(AppConfig::load(Some(&path)).is_err());
        Ok(())
    }

    #[test]
    fn missing_remote_settings_are_reported() {
        let Err(err) = AppConfig::default().rest_config() else {
            panic!("remote must be required");
        };
        assert!(err.to_string().contains("remote.url"));
    }

    #[test]
    fn save_round_trips_and_clears_session() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut cfg = AppConfig::default();
        cfg.session.user_id = Some(UserId::new().to_string());
        cfg.save(&path)?;
        assert_eq!(AppConfig::load(Some(&path))?, cfg);

        cfg.clear_session();
        cfg.save(&path)?;
        assert_eq!(AppConfig::load(Some(&path))?.session()?, Session::SignedOut);
        Ok(())
    }
}
