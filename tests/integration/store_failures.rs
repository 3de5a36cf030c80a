//! Store outages never change the job's result

use jobwatch::models::{JobIdentity, JobStatus};

use super::helpers::{execution, fast_config, sleep_ms};

#[test]
fn test_two_failures_then_success_is_transparent() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    execution.store().fail_next_reads(2);
    execution.store().fail_next_writes(2);

    let result = execution.run("sync_data", &["--full"], || Ok("ok"));

    assert_eq!(result.unwrap(), "ok");
    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.last().unwrap().status, JobStatus::Finished);
    // The STARTED write landed on its third attempt.
    assert_eq!(
        execution.store().writes_for(&id)[0].last().unwrap().status,
        JobStatus::Started
    );
}

#[test]
fn test_store_down_for_whole_run() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    execution.store().fail_next_reads(usize::MAX);
    execution.store().fail_next_writes(usize::MAX);

    let result = execution.run("sync_data", &["--full"], || {
        sleep_ms(150);
        Ok(99)
    });

    assert_eq!(result.unwrap(), 99);
    assert!(execution.store().history(&id).is_none());
    assert!(execution.store().read_calls() >= 3);
    assert_eq!(execution.store().write_calls(), 0);
}

#[test]
fn test_start_write_exhausted_but_later_writes_recover() {
    let execution = execution(fast_config());
    let id = JobIdentity::derive("sync_data", &["--full"]);
    execution.store().fail_next_writes(3);

    execution.run("sync_data", &["--full"], || Ok(())).unwrap();

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.last().unwrap().status, JobStatus::Finished);
}
