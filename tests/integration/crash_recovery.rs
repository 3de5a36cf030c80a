//! Launching a job whose previous run never finished

use jobwatch::models::{History, JobIdentity, JobStatus};

use super::helpers::{execution, fast_config, past_run};

#[test]
fn test_dangling_running_entry_becomes_system_kill() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    let stale = past_run(&id, "sync_data", JobStatus::Running, "2024-01-01T00:00:00.000000Z");
    assert!(stale.finished.is_none());
    execution
        .store()
        .insert(id.clone(), History::from_records(vec![stale.clone()]));

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 2);

    let killed = &history.records()[0];
    assert_eq!(killed.status, JobStatus::SystemKill);
    assert!(killed.finished.is_some());
    assert_eq!(killed.started, stale.started);
    assert_eq!(killed.latest, stale.latest);

    assert_eq!(history.records()[1].status, JobStatus::Finished);
}

#[test]
fn test_new_started_entry_follows_killed_one() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    execution.store().insert(
        id.clone(),
        History::from_records(vec![past_run(
            &id,
            "sync_data",
            JobStatus::Started,
            "2024-01-01T00:00:00.000000Z",
        )]),
    );

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let first_write = execution.store().writes_for(&id).remove(0);
    let statuses: Vec<_> = first_write.records().iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![JobStatus::SystemKill, JobStatus::Started]);
}

#[test]
fn test_only_newest_dangling_entry_is_resolved() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    execution.store().insert(
        id.clone(),
        History::from_records(vec![
            past_run(&id, "sync_data", JobStatus::Running, "2024-01-01T00:00:00.000000Z"),
            past_run(&id, "sync_data", JobStatus::Running, "2024-01-02T00:00:00.000000Z"),
        ]),
    );

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let history = execution.store().history(&id).unwrap();
    let statuses: Vec<_> = history.records().iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![JobStatus::Running, JobStatus::SystemKill, JobStatus::Finished]
    );
}

#[test]
fn test_terminal_history_is_left_alone() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    let failed = past_run(&id, "sync_data", JobStatus::Failed, "2024-01-01T00:00:00.000000Z");
    execution
        .store()
        .insert(id.clone(), History::from_records(vec![failed.clone()]));

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.records()[0], failed);
}

#[test]
fn test_malformed_history_is_reinitialized() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    execution.store().mark_malformed(id.clone());

    let result = execution.run("sync_data", &["--full"], || Ok(5));
    assert_eq!(result.unwrap(), 5);

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.last().unwrap().status, JobStatus::Finished);
}
