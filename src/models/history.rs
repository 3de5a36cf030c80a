use serde::{Deserialize, Serialize};

use super::record::StatusRecord;

/// Default number of records kept per job identity.
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 100;

/// Ordered status records for one job identity, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<StatusRecord>,
}

/// Wire payload for a full-replace write: `{"log": [...]}`.
#[derive(Debug, Serialize)]
pub struct LogDocument<'a> {
    pub log: &'a History,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StatusRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StatusRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&StatusRecord> {
        self.records.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut StatusRecord> {
        self.records.last_mut()
    }

    /// Append `record`, evicting the oldest entries so the result holds at most `cap`.
    pub fn push_capped(&mut self, record: StatusRecord, cap: usize) {
        let cap = cap.max(1);
        if self.records.len() >= cap {
            let excess = self.records.len() + 1 - cap;
            self.records.drain(..excess);
        }
        self.records.push(record);
    }

    /// Store the latest state of an in-flight run.
    ///
    /// Replaces the last entry when it is the same run, otherwise appends.
    pub fn upsert_run(&mut self, record: StatusRecord, cap: usize) {
        match self.records.last_mut() {
            Some(last) if last.is_same_run(&record) => *last = record,
            _ => self.push_capped(record, cap),
        }
    }
}
