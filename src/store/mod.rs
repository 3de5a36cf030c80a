//! Remote log store access.
//!
//! The supervision engine talks to the store only through [`LogStore`]:
//! read the whole history of a job, or replace it wholesale. [`ResilientStore`]
//! wraps any backend with bounded retries and never lets a store failure
//! reach the job being monitored.

mod firebase;
mod memory;
mod resilient;

pub use firebase::{parse_log_body, FirebaseStore};
pub use memory::MemoryStore;
pub use resilient::{ResilientStore, DEFAULT_MAX_ATTEMPTS};

use thiserror::Error;

use crate::models::{History, JobIdentity};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed history payload: {0}")]
    Malformed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Malformed payloads are deterministic; retrying them cannot help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StoreError::Malformed(_))
    }
}

/// Read-whole / replace-whole access to per-job histories.
pub trait LogStore: Send + Sync {
    /// Fetch the stored history. `Ok(None)` when nothing is stored yet.
    fn read(&self, id: &JobIdentity) -> Result<Option<History>, StoreError>;

    /// Replace the stored history with `history`.
    fn write(&self, id: &JobIdentity, history: &History) -> Result<(), StoreError>;
}

impl<T: LogStore + ?Sized> LogStore for Box<T> {
    fn read(&self, id: &JobIdentity) -> Result<Option<History>, StoreError> {
        (**self).read(id)
    }

    fn write(&self, id: &JobIdentity, history: &History) -> Result<(), StoreError> {
        (**self).write(id, history)
    }
}

/// Path of the job document that receives full-replace writes.
pub fn record_path(namespace: &str, id: &JobIdentity) -> String {
    let namespace = namespace.trim_matches('/');
    if namespace.is_empty() {
        format!("commands/{id}")
    } else {
        format!("{namespace}/commands/{id}")
    }
}

/// Path of the history list inside the job document.
pub fn log_path(namespace: &str, id: &JobIdentity) -> String {
    format!("{}/log", record_path(namespace, id))
}
