//! Crash recovery at job launch.
//!
//! A run whose process was killed never writes a terminal record, so its
//! entry is left STARTED or RUNNING. The next launch of the same job closes
//! it out as SYSTEM_KILL before appending its own STARTED record.
//!
//! Only the most recent entry is inspected. A dangling entry that is no longer
//! last (another process appended after it) is never revisited.

use tracing::{info, warn};

use crate::models::{History, StatusRecord};
use crate::store::{LogStore, ResilientStore};

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryReport {
    /// The previous run that was closed out, as rewritten.
    pub killed: Option<StatusRecord>,
    /// Whether the updated history reached the store.
    pub persisted: bool,
    pub history_len: usize,
}

/// Mark the last entry SYSTEM_KILL if it never reached a terminal state.
///
/// Returns the rewritten entry.
pub fn close_dangling_run(history: &mut History) -> Option<StatusRecord> {
    let last = history.last_mut()?;
    if last.status.is_terminal() {
        return None;
    }
    last.mark_system_kill();
    Some(last.clone())
}

/// Resolve a crashed predecessor and persist `record` as the newest entry.
///
/// Nothing is written when the stored history cannot be read.
pub fn begin_run<S: LogStore>(
    store: &ResilientStore<S>,
    record: &StatusRecord,
    max_entries: usize,
) -> RecoveryReport {
    let Some(mut history) = store.read(&record.id) else {
        warn!(job_id = %record.id, "Could not read history, job start not recorded");
        return RecoveryReport {
            killed: None,
            persisted: false,
            history_len: 0,
        };
    };

    let killed = close_dangling_run(&mut history);
    if let Some(killed) = &killed {
        info!(
            job_id = %record.id,
            started = %killed.started,
            "Previous run never finished, marking it SYSTEM_KILL"
        );
    }

    history.push_capped(record.clone(), max_entries);
    let persisted = store.write(&record.id, &history);
    if !persisted {
        warn!(job_id = %record.id, "Could not record job start, continuing unmonitored until next write");
    }

    RecoveryReport {
        killed,
        persisted,
        history_len: history.len(),
    }
}
