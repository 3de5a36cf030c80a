//! Entry point for running a job under monitoring.

use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::models::{describe_params, JobIdentity, StatusRecord};
use crate::store::{LogStore, ResilientStore};

use super::outcome::{JobError, JobOutcome};
use super::recovery::begin_run;
use super::supervisor::Supervisor;

/// Runs jobs with lifecycle reporting to a log store.
///
/// A job's failure is recorded as FAILED and then returned to the caller as
/// `Err(JobError)`, so an embedding CLI can exit non-zero. A panicking job
/// becomes `JobError::Panicked` whether or not the run is monitored. Store
/// failures are never returned.
pub struct MonitoredExecution<S> {
    config: MonitorConfig,
    store: ResilientStore<S>,
}

impl<S: LogStore> MonitoredExecution<S> {
    pub fn new(config: MonitorConfig, store: S) -> Result<Self> {
        config.validate().context("Invalid monitor config")?;
        let store = ResilientStore::with_max_attempts(store, config.store_max_attempts);
        Ok(Self { config, store })
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Run `job` as `name` invoked with `args` and return its own result.
    pub fn run<T, F, A>(&self, name: &str, args: &[A], job: F) -> Result<T, JobError>
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
        A: AsRef<str>,
    {
        self.run_supervised(name, args, job).into_result()
    }

    /// Like [`run`](Self::run), but exposes the final status record when the
    /// run was monitored.
    pub fn run_supervised<T, F, A>(&self, name: &str, args: &[A], job: F) -> Supervised<T>
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
        A: AsRef<str>,
    {
        if let Some(reason) = self.config.disabled_reason() {
            debug!(job = name, reason, "Monitoring off, running job directly");
            let result = match panic::catch_unwind(AssertUnwindSafe(job)) {
                Ok(result) => result.map_err(JobError::Failed),
                Err(payload) => Err(JobError::from_panic(payload)),
            };
            return Supervised::Unmonitored(result);
        }

        let id = JobIdentity::derive(name, args);
        info!("Monitoring command: {id}");

        let record = StatusRecord::started(id, name, describe_params(args));
        begin_run(&self.store, &record, self.config.max_history_entries);

        let supervisor = Supervisor::new(
            &self.store,
            self.config.heartbeat_interval(),
            self.config.inter_ping_delay(),
            self.config.max_history_entries,
        );
        Supervised::Monitored(supervisor.run(record, job))
    }
}

/// Result of [`MonitoredExecution::run_supervised`].
#[derive(Debug)]
pub enum Supervised<T> {
    Monitored(JobOutcome<T>),
    Unmonitored(Result<T, JobError>),
}

impl<T> Supervised<T> {
    pub fn into_result(self) -> Result<T, JobError> {
        match self {
            Supervised::Monitored(outcome) => outcome.into_result(),
            Supervised::Unmonitored(result) => result,
        }
    }
}
