//! Heartbeat supervisor.
//!
//! The job body runs on a worker thread and reports back once through a
//! one-shot channel. The calling thread owns the status record: it waits on
//! the channel for up to the heartbeat interval, writes a RUNNING update when
//! the job is still going, then throttles for the inter-ping delay before
//! checking again. Store writes therefore never overlap.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::StatusRecord;
use crate::store::{LogStore, ResilientStore};

use super::outcome::{JobError, JobOutcome};

/// Which timed wait the heartbeat loop is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting up to the heartbeat interval for the job to finish.
    AwaitCompletion,
    /// Spacing out RUNNING writes; completion still ends the wait early.
    Throttle,
}

pub struct Supervisor<'a, S> {
    store: &'a ResilientStore<S>,
    heartbeat_interval: Duration,
    inter_ping_delay: Duration,
    max_entries: usize,
}

impl<'a, S: LogStore> Supervisor<'a, S> {
    pub fn new(
        store: &'a ResilientStore<S>,
        heartbeat_interval: Duration,
        inter_ping_delay: Duration,
        max_entries: usize,
    ) -> Self {
        Self {
            store,
            heartbeat_interval,
            inter_ping_delay,
            max_entries,
        }
    }

    /// Run `job` to completion, reporting heartbeats for `record`.
    ///
    /// `record` must already be persisted as STARTED. The job's error (or
    /// panic) is recorded as FAILED and handed back in the outcome; it is never
    /// raised from here.
    pub fn run<T, F>(&self, mut record: StatusRecord, job: F) -> JobOutcome<T>
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = mpsc::sync_channel::<anyhow::Result<T>>(1);
        let worker = thread::spawn(move || {
            let _ = done_tx.send(job());
        });

        let reported = self.watch(&mut record, &done_rx);

        let joined = worker.join();
        let result = match (reported, joined) {
            (Some(result), _) => result.map_err(JobError::Failed),
            (None, Err(payload)) => Err(JobError::from_panic(payload)),
            (None, Ok(())) => Err(JobError::Panicked(
                "job thread exited without reporting a result".to_string(),
            )),
        };

        match &result {
            Ok(_) => {
                record.mark_finished();
                info!(job_id = %record.id, "Job finished");
            }
            Err(e) => {
                record.mark_failed(e.to_string(), e.detail());
                warn!(job_id = %record.id, error = %e, "Job failed");
            }
        }
        self.persist(&record);

        JobOutcome { result, record }
    }

    /// Heartbeat loop. Returns the job's result, or `None` if the worker went
    /// away without sending one.
    fn watch<T>(
        &self,
        record: &mut StatusRecord,
        done_rx: &Receiver<anyhow::Result<T>>,
    ) -> Option<anyhow::Result<T>> {
        let mut phase = Phase::AwaitCompletion;
        loop {
            let wait = match phase {
                Phase::AwaitCompletion => self.heartbeat_interval,
                Phase::Throttle => self.inter_ping_delay,
            };
            match done_rx.recv_timeout(wait) {
                Ok(result) => return Some(result),
                Err(RecvTimeoutError::Disconnected) => return None,
                Err(RecvTimeoutError::Timeout) => match phase {
                    Phase::AwaitCompletion => {
                        record.mark_running();
                        debug!(job_id = %record.id, latest = %record.latest, "Job still running");
                        self.persist(record);
                        phase = Phase::Throttle;
                    }
                    Phase::Throttle => phase = Phase::AwaitCompletion,
                },
            }
        }
    }

    /// Read-modify-write the current state of `record` into its history.
    ///
    /// Skipped when the history cannot be read, so retained runs survive an
    /// outage. A later heartbeat or the terminal write catches up.
    fn persist(&self, record: &StatusRecord) -> bool {
        let Some(mut history) = self.store.read(&record.id) else {
            warn!(job_id = %record.id, status = %record.status, "Could not read history, skipping status update");
            return false;
        };
        if history.is_empty() {
            debug!(job_id = %record.id, "No stored history, starting a new one");
        }
        history.upsert_run(record.clone(), self.max_entries);
        self.store.write(&record.id, &history)
    }
}
