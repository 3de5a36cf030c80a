//! History retention cap

use jobwatch::models::{JobIdentity, JobStatus};
use jobwatch::MonitorConfig;

use super::helpers::{execution, fast_config, finished_runs};

#[test]
fn test_full_history_evicts_oldest() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    let seeded = finished_runs(&id, "sync_data", 100);
    execution.store().insert(id.clone(), seeded.clone());

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 100);
    assert_eq!(history.records()[0], seeded.records()[1]);
    assert_eq!(history.records()[98], seeded.records()[99]);
    assert_eq!(history.last().unwrap().status, JobStatus::Finished);
}

#[test]
fn test_oversized_history_is_trimmed_to_cap() {
    let execution = execution(MonitorConfig {
        max_history_entries: 10,
        ..fast_config()
    });
    let id = JobIdentity::derive("sync_data", &["--full"]);
    let seeded = finished_runs(&id, "sync_data", 25);
    execution.store().insert(id.clone(), seeded.clone());

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 10);
    assert_eq!(history.records()[..9], seeded.records()[16..]);
}

#[test]
fn test_cap_holds_across_many_runs() {
    let execution = execution(MonitorConfig {
        max_history_entries: 5,
        ..fast_config()
    });
    let id = JobIdentity::derive("cleanup", &["--old"]);

    for _ in 0..12 {
        execution.run("cleanup", &["--old"], || Ok(())).unwrap();
        let len = execution.store().history(&id).unwrap().len();
        assert!(len <= 5, "history grew to {len}");
    }

    let history = execution.store().history(&id).unwrap();
    let starts: Vec<_> = history.records().iter().map(|r| r.started.clone()).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted, "kept runs stay in order");
}
