//! Shared test helpers for supervision integration tests

use std::time::Duration;

use jobwatch::models::{History, JobIdentity, JobStatus, StatusRecord};
use jobwatch::store::MemoryStore;
use jobwatch::{MonitorConfig, MonitoredExecution};

/// Config with short intervals so heartbeats happen within a test.
pub fn fast_config() -> MonitorConfig {
    MonitorConfig {
        heartbeat_check_interval_seconds: 0.05,
        inter_ping_delay_seconds: 0.05,
        store_namespace: "test".to_string(),
        ..Default::default()
    }
}

pub fn execution(config: MonitorConfig) -> MonitoredExecution<MemoryStore> {
    MonitoredExecution::new(config, MemoryStore::new()).unwrap()
}

/// Status of the newest entry after each successful write.
pub fn written_statuses(store: &MemoryStore, id: &JobIdentity) -> Vec<JobStatus> {
    store
        .writes_for(id)
        .iter()
        .filter_map(|history| history.last().map(|record| record.status))
        .collect()
}

/// A finished historical run for `id`, started at `started`.
pub fn past_run(id: &JobIdentity, name: &str, status: JobStatus, started: &str) -> StatusRecord {
    let mut record = StatusRecord::started(id.clone(), name, String::new());
    record.status = status;
    record.started = started.to_string();
    record.latest = started.to_string();
    if status.is_terminal() {
        record.finished = Some(started.to_string());
    }
    record
}

/// `count` finished runs with increasing start times.
pub fn finished_runs(id: &JobIdentity, name: &str, count: usize) -> History {
    History::from_records(
        (0..count)
            .map(|n| {
                past_run(
                    id,
                    name,
                    JobStatus::Finished,
                    &format!("2024-01-01T00:{:02}:{:02}.000000Z", n / 60, n % 60),
                )
            })
            .collect(),
    )
}

pub fn sleep_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
