//! In-process store used for dry runs and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{History, JobIdentity};

use super::{LogStore, StoreError};

/// Shared, clonable in-memory store.
///
/// Every successful write is also appended to a write log, so callers can
/// observe each intermediate state a run went through. Failures can be
/// injected for the next N reads or writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: HashMap<JobIdentity, History>,
    malformed: Vec<JobIdentity>,
    write_log: Vec<(JobIdentity, History)>,
    read_calls: usize,
    write_calls: usize,
    failing_reads: usize,
    failing_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a stored history without counting it as a write.
    pub fn insert(&self, id: JobIdentity, history: History) {
        self.lock().documents.insert(id, history);
    }

    /// Make reads of `id` fail as if the stored payload were corrupt.
    pub fn mark_malformed(&self, id: JobIdentity) {
        self.lock().malformed.push(id);
    }

    pub fn history(&self, id: &JobIdentity) -> Option<History> {
        self.lock().documents.get(id).cloned()
    }

    /// Every history successfully written for `id`, in write order.
    pub fn writes_for(&self, id: &JobIdentity) -> Vec<History> {
        self.lock()
            .write_log
            .iter()
            .filter(|(written, _)| written == id)
            .map(|(_, history)| history.clone())
            .collect()
    }

    pub fn fail_next_reads(&self, count: usize) {
        self.lock().failing_reads = count;
    }

    pub fn fail_next_writes(&self, count: usize) {
        self.lock().failing_writes = count;
    }

    /// Total read attempts, including failed ones.
    pub fn read_calls(&self) -> usize {
        self.lock().read_calls
    }

    /// Total write attempts, including failed ones.
    pub fn write_calls(&self) -> usize {
        self.lock().write_calls
    }
}

impl LogStore for MemoryStore {
    fn read(&self, id: &JobIdentity) -> Result<Option<History>, StoreError> {
        let mut state = self.lock();
        state.read_calls += 1;
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        if state.malformed.contains(id) {
            return Err(StoreError::Malformed(format!("corrupt history for {id}")));
        }
        Ok(state.documents.get(id).cloned())
    }

    fn write(&self, id: &JobIdentity, history: &History) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.write_calls += 1;
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        state.malformed.retain(|m| m != id);
        state.documents.insert(id.clone(), history.clone());
        state.write_log.push((id.clone(), history.clone()));
        Ok(())
    }
}
