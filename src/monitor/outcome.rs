use std::any::Any;
use thiserror::Error;

use crate::models::StatusRecord;

/// Failure of the supervised job body itself.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Failed(anyhow::Error),

    #[error("job panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Full diagnostic text stored in `error_detail`, including the cause chain.
    pub fn detail(&self) -> String {
        match self {
            JobError::Failed(e) => format!("{e:?}"),
            JobError::Panicked(message) => format!("panic: {message}"),
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        JobError::Panicked(message)
    }
}

/// What the supervisor observed: the job's own result plus the final record.
#[derive(Debug)]
pub struct JobOutcome<T> {
    pub result: Result<T, JobError>,
    pub record: StatusRecord,
}

impl<T> JobOutcome<T> {
    pub fn failed(&self) -> bool {
        self.result.is_err()
    }

    pub fn into_result(self) -> Result<T, JobError> {
        self.result
    }
}
