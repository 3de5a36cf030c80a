//! Lifecycle records written for normal, failing, and unmonitored runs

use anyhow::{bail, Context};
use jobwatch::models::{JobIdentity, JobStatus};
use jobwatch::{JobError, MonitorConfig};

use super::helpers::{execution, fast_config, sleep_ms, written_statuses};

#[test]
fn test_sync_data_scenario() {
    let config = MonitorConfig {
        heartbeat_check_interval_seconds: 1.0,
        inter_ping_delay_seconds: 1.0,
        ..fast_config()
    };
    let execution = execution(config);

    let result = execution.run("sync_data", &["--full"], || {
        sleep_ms(3000);
        Ok("ok")
    });

    assert_eq!(result.unwrap(), "ok");

    let id = JobIdentity::derive("sync_data", &["--full"]);
    assert_eq!(id.as_str(), "sync_data__full");

    let seen = written_statuses(execution.store(), &id);
    assert_eq!(seen.first(), Some(&JobStatus::Started));
    assert!(seen.contains(&JobStatus::Running), "{seen:?}");
    assert_eq!(seen.last(), Some(&JobStatus::Finished));

    let history = execution.store().history(&id).unwrap();
    assert_eq!(history.len(), 1);
    let record = history.last().unwrap();
    assert_eq!(record.status, JobStatus::Finished);
    assert_eq!(record.message, "Command finished");
    assert_eq!(record.params, "full");
    assert_eq!(record.name, "sync_data");
    assert!(record.finished.is_some());
    assert!(record.latest >= record.started);
}

#[test]
fn test_disk_full_scenario() {
    let execution = execution(fast_config());

    let result = execution.run("export", &["--target=/mnt/backup"], || -> anyhow::Result<()> {
        sleep_ms(120);
        bail!("disk full")
    });

    // Job failures are propagated to the caller after being recorded.
    match result {
        Err(JobError::Failed(e)) => assert_eq!(e.to_string(), "disk full"),
        other => panic!("expected job failure, got {other:?}"),
    }

    let id = JobIdentity::derive("export", &["--target=/mnt/backup"]);
    let history = execution.store().history(&id).unwrap();
    let record = history.last().unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.message, "disk full");
    assert!(record.error_detail.as_deref().unwrap().contains("disk full"));
    assert!(record.finished.is_some());
}

#[test]
fn test_failure_detail_keeps_cause_chain() {
    let execution = execution(fast_config());

    let result = execution.run("export", &["--daily"], || -> anyhow::Result<()> {
        Err(std::io::Error::other("disk full")).context("writing archive")
    });
    assert!(result.is_err());

    let id = JobIdentity::derive("export", &["--daily"]);
    let record = execution.store().history(&id).unwrap().last().cloned().unwrap();
    assert_eq!(record.message, "writing archive");
    let detail = record.error_detail.unwrap();
    assert!(detail.contains("writing archive"));
    assert!(detail.contains("disk full"));
}

#[test]
fn test_exactly_one_terminal_write_per_run() {
    let execution = execution(fast_config());
    execution
        .run("reindex", &["--all"], || {
            sleep_ms(250);
            Ok(())
        })
        .unwrap();

    let id = JobIdentity::derive("reindex", &["--all"]);
    let seen = written_statuses(execution.store(), &id);
    let terminal_at = seen.iter().position(|s| s.is_terminal()).unwrap();
    assert_eq!(terminal_at, seen.len() - 1, "nothing written after terminal: {seen:?}");
    assert_eq!(seen.iter().filter(|s| s.is_terminal()).count(), 1);
}

#[test]
fn test_reruns_append_to_same_history() {
    let execution = execution(fast_config());
    for _ in 0..3 {
        execution.run("sync_data", &["--full"], || Ok(())).unwrap();
    }
    execution.run("sync_data", &["--partial"], || Ok(())).unwrap();

    let full = execution
        .store()
        .history(&JobIdentity::derive("sync_data", &["--full"]))
        .unwrap();
    assert_eq!(full.len(), 3);
    assert!(full
        .records()
        .iter()
        .all(|r| r.status == JobStatus::Finished));

    let partial = execution
        .store()
        .history(&JobIdentity::derive("sync_data", &["--partial"]))
        .unwrap();
    assert_eq!(partial.len(), 1);
}

#[test]
fn test_disabled_runs_skip_the_store() {
    let opt_outs = [
        MonitorConfig {
            disable_for_this_invocation: true,
            ..fast_config()
        },
        MonitorConfig {
            test_mode: true,
            ..fast_config()
        },
        MonitorConfig {
            monitoring_enabled: false,
            ..fast_config()
        },
    ];

    for config in opt_outs {
        let execution = execution(config);
        let result = execution.run("sync_data", &["--full"], || {
            sleep_ms(120);
            Ok(vec![1, 2, 3])
        });
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        assert_eq!(execution.store().read_calls(), 0);
        assert_eq!(execution.store().write_calls(), 0);
    }
}
