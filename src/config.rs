//! Monitoring configuration.
//!
//! Every field has a default, so a missing or partial `config.toml` is valid.
//! Values are resolved in order: defaults, TOML file, `JOBWATCH_*` environment
//! variables, then command-line flags applied by the caller.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::DEFAULT_MAX_HISTORY_ENTRIES;
use crate::store::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_HEARTBEAT_CHECK_SECS: f64 = 10.0;
pub const DEFAULT_INTER_PING_DELAY_SECS: f64 = 30.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 30.0;
pub const DEFAULT_NAMESPACE: &str = "jobwatch";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "JOBWATCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Global switch; `false` runs every job unmonitored.
    pub monitoring_enabled: bool,
    /// Skip monitoring for this one invocation.
    pub disable_for_this_invocation: bool,
    /// Test environments never contact the store.
    pub test_mode: bool,
    /// How long to wait for the job to finish before emitting a heartbeat.
    pub heartbeat_check_interval_seconds: f64,
    /// Minimum spacing between consecutive RUNNING writes.
    pub inter_ping_delay_seconds: f64,
    pub store_namespace: String,
    pub max_history_entries: usize,
    /// Base URL of the document store, e.g. `https://my-app.firebaseio.com`.
    pub store_url: Option<String>,
    pub auth_token: Option<String>,
    pub request_timeout_seconds: f64,
    pub store_max_attempts: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            monitoring_enabled: true,
            disable_for_this_invocation: false,
            test_mode: false,
            heartbeat_check_interval_seconds: DEFAULT_HEARTBEAT_CHECK_SECS,
            inter_ping_delay_seconds: DEFAULT_INTER_PING_DELAY_SECS,
            store_namespace: DEFAULT_NAMESPACE.to_string(),
            max_history_entries: DEFAULT_MAX_HISTORY_ENTRIES,
            store_url: None,
            auth_token: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            store_max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl MonitorConfig {
    /// Load from `path`, or from the default location when `path` is `None`,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MonitorConfig = toml::from_str(content).context("Invalid monitor config")?;
        Ok(config)
    }

    /// Apply `JOBWATCH_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("JOBWATCH_MONITORING_ENABLED") {
            self.monitoring_enabled = parse_bool("JOBWATCH_MONITORING_ENABLED", &value)?;
        }
        if let Some(value) = lookup("JOBWATCH_TEST_MODE") {
            self.test_mode = parse_bool("JOBWATCH_TEST_MODE", &value)?;
        }
        if let Some(value) = lookup("JOBWATCH_NAMESPACE") {
            self.store_namespace = value;
        }
        if let Some(value) = lookup("JOBWATCH_STORE_URL") {
            self.store_url = Some(value);
        }
        if let Some(value) = lookup("JOBWATCH_AUTH_TOKEN") {
            self.auth_token = Some(value);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            (
                "heartbeat_check_interval_seconds",
                self.heartbeat_check_interval_seconds,
            ),
            ("inter_ping_delay_seconds", self.inter_ping_delay_seconds),
            ("request_timeout_seconds", self.request_timeout_seconds),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                bail!("{name} must be a positive number of seconds, got {secs}");
            }
        }
        if self.max_history_entries == 0 {
            bail!("max_history_entries must be at least 1");
        }
        if self.store_max_attempts == 0 {
            bail!("store_max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Why monitoring is off for this invocation, if it is.
    pub fn disabled_reason(&self) -> Option<&'static str> {
        if self.disable_for_this_invocation {
            Some("disabled for this invocation")
        } else if self.test_mode {
            Some("test mode")
        } else if !self.monitoring_enabled {
            Some("monitoring disabled globally")
        } else {
            None
        }
    }

    pub fn heartbeat_interval(&self) -> Duration {
        seconds(
            self.heartbeat_check_interval_seconds,
            DEFAULT_HEARTBEAT_CHECK_SECS,
        )
    }

    pub fn inter_ping_delay(&self) -> Duration {
        seconds(self.inter_ping_delay_seconds, DEFAULT_INTER_PING_DELAY_SECS)
    }

    pub fn request_timeout(&self) -> Duration {
        seconds(self.request_timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

/// `--config`, then `$JOBWATCH_CONFIG`, then `<config dir>/jobwatch/config.toml` if present.
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("jobwatch").join("config.toml"))
        .filter(|path| path.exists())
}

fn seconds(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_else(|_| Duration::from_secs_f64(fallback))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{name} must be a boolean, got '{other}'"),
    }
}
