//! `jobwatch run`: execute an external command as a monitored job.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::warn;

use crate::config::MonitorConfig;
use crate::monitor::{JobError, MonitoredExecution};
use crate::store::{LogStore, MemoryStore};

use super::common::open_store;

/// The child process exited unsuccessfully.
#[derive(Debug, Error)]
#[error("command exited with status {code}")]
pub struct CommandFailed {
    pub code: i32,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Logical job name; defaults to the program's file name.
    pub name: Option<String>,
    pub program: String,
    pub args: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub no_monitor: bool,
    pub heartbeat_secs: Option<f64>,
    pub ping_delay_secs: Option<f64>,
}

pub fn execute(options: RunOptions) -> Result<()> {
    let mut config = MonitorConfig::load(options.config_path.as_deref())?;
    apply_flags(&mut config, &options)?;

    let store: Box<dyn LogStore> = match open_store(&config) {
        Ok(Some(store)) => Box::new(store),
        Ok(None) => {
            if config.disabled_reason().is_none() {
                warn!("No store_url configured, running without monitoring");
            }
            config.disable_for_this_invocation = true;
            Box::new(MemoryStore::new())
        }
        Err(e) => {
            warn!("Log store unavailable, running without monitoring: {e:#}");
            config.disable_for_this_invocation = true;
            Box::new(MemoryStore::new())
        }
    };

    let name = options
        .name
        .clone()
        .unwrap_or_else(|| job_name_from_program(&options.program));
    let execution = MonitoredExecution::new(config, store)?;
    let job = command_job(options.program, options.args.clone());

    match execution.run(&name, &options.args, job) {
        Ok(()) => Ok(()),
        Err(JobError::Failed(e)) => Err(e),
        Err(e @ JobError::Panicked(_)) => Err(e.into()),
    }
}

/// CLI flags take precedence over file and environment settings.
pub fn apply_flags(config: &mut MonitorConfig, options: &RunOptions) -> Result<()> {
    if options.no_monitor {
        config.disable_for_this_invocation = true;
    }
    if let Some(secs) = options.heartbeat_secs {
        config.heartbeat_check_interval_seconds = secs;
    }
    if let Some(secs) = options.ping_delay_secs {
        config.inter_ping_delay_seconds = secs;
    }
    config.validate()
}

/// Job body that runs `program` with inherited stdio.
pub fn command_job(program: String, args: Vec<String>) -> impl FnOnce() -> Result<()> + Send + 'static {
    move || {
        let status = Command::new(&program)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to start '{program}'"))?;

        if status.success() {
            Ok(())
        } else {
            // Killed by a signal: no exit code, report a generic failure.
            Err(CommandFailed {
                code: status.code().unwrap_or(1),
            }
            .into())
        }
    }
}

pub fn job_name_from_program(program: &str) -> String {
    Path::new(program)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| program.to_string())
}
