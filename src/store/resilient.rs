//! Bounded-retry wrapper that turns store failures into graceful degradation.

use tracing::{debug, warn};

use crate::models::{History, JobIdentity};

use super::{LogStore, StoreError};

/// Attempts per store operation before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

pub struct ResilientStore<S> {
    inner: S,
    max_attempts: usize,
}

impl<S: LogStore> ResilientStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_max_attempts(inner, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(inner: S, max_attempts: usize) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Read the stored history.
    ///
    /// A missing document or a malformed payload yields an empty history.
    /// `None` means the store could not be reached within the attempt budget,
    /// and the caller must not overwrite what is stored.
    pub fn read(&self, id: &JobIdentity) -> Option<History> {
        match self.attempt("read", id, || self.inner.read(id)) {
            Ok(Some(history)) => Some(history),
            Ok(None) => Some(History::new()),
            Err(StoreError::Malformed(reason)) => {
                warn!(job_id = %id, %reason, "Stored history is malformed, treating it as empty");
                Some(History::new())
            }
            Err(e) => {
                warn!(job_id = %id, error = %e, "Giving up reading history");
                None
            }
        }
    }

    /// Replace the stored history. Returns whether the write landed.
    pub fn write(&self, id: &JobIdentity, history: &History) -> bool {
        match self.attempt("write", id, || self.inner.write(id, history)) {
            Ok(()) => true,
            Err(e) => {
                warn!(job_id = %id, error = %e, "Giving up writing history");
                false
            }
        }
    }

    fn attempt<T, F>(&self, operation: &str, id: &JobIdentity, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Result<T, StoreError>,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    debug!(job_id = %id, operation, attempt, error = %e, "Store operation failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
