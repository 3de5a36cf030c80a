use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::utc_now;

use super::identity::JobIdentity;

pub const MESSAGE_STARTED: &str = "Command started";
pub const MESSAGE_RUNNING: &str = "Command running";
pub const MESSAGE_FINISHED: &str = "Command finished";

/// Lifecycle state of a single job run.
///
/// State machine transitions:
/// - `Started` -> `Running` | `Finished` | `Failed` | `SystemKill`
/// - `Running` -> `Running` | `Finished` | `Failed` | `SystemKill`
/// - `Finished`, `Failed` and `SystemKill` are terminal
///
/// `SystemKill` is only assigned retroactively, by crash recovery on the next
/// launch of the same job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Started,
    Running,
    Finished,
    Failed,
    SystemKill,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Finished | JobStatus::Failed | JobStatus::SystemKill
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Started => "STARTED",
            JobStatus::Running => "RUNNING",
            JobStatus::Finished => "FINISHED",
            JobStatus::Failed => "FAILED",
            JobStatus::SystemKill => "SYSTEM_KILL",
        };
        f.pad(label)
    }
}

/// One entry in a job's history, as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusRecord {
    pub id: JobIdentity,
    pub name: String,
    pub status: JobStatus,
    pub started: String,
    pub latest: String,
    #[serde(default)]
    pub finished: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_detail: Option<String>,
    #[serde(default)]
    pub params: String,
}

impl StatusRecord {
    /// A fresh record for a run that is about to launch.
    pub fn started(id: JobIdentity, name: &str, params: String) -> Self {
        let now = utc_now();
        Self {
            id,
            name: name.to_string(),
            status: JobStatus::Started,
            started: now.clone(),
            latest: now,
            finished: None,
            message: MESSAGE_STARTED.to_string(),
            error_detail: None,
            params,
        }
    }

    /// Whether `other` is the stored copy of this same run.
    pub fn is_same_run(&self, other: &StatusRecord) -> bool {
        self.id == other.id && self.started == other.started
    }

    /// Heartbeat update.
    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.latest = utc_now();
        self.message = MESSAGE_RUNNING.to_string();
    }

    pub fn mark_finished(&mut self) {
        let now = utc_now();
        self.status = JobStatus::Finished;
        self.latest = now.clone();
        self.finished = Some(now);
        self.message = MESSAGE_FINISHED.to_string();
    }

    pub fn mark_failed(&mut self, message: String, detail: String) {
        let now = utc_now();
        self.status = JobStatus::Failed;
        self.latest = now.clone();
        self.finished = Some(now);
        self.message = message;
        self.error_detail = Some(detail);
    }

    /// Close out a run that never reached a terminal state.
    ///
    /// Only `status` and `finished` change; `latest` keeps the last time the
    /// run was seen alive.
    pub fn mark_system_kill(&mut self) {
        self.status = JobStatus::SystemKill;
        self.finished = Some(utc_now());
    }
}
