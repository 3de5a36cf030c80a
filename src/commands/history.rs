//! `jobwatch history`: show the stored status log of a job.

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use std::path::Path;

use crate::config::MonitorConfig;
use crate::models::{History, JobIdentity, JobStatus, StatusRecord};
use crate::store::LogStore;

use super::common::open_store;

pub fn execute(config_path: Option<&Path>, name: &str, args: &[String], limit: Option<usize>) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    let store = open_store(&config)?
        .context("No store_url configured; set it in config.toml or JOBWATCH_STORE_URL")?;

    let id = JobIdentity::derive(name, args);
    let history = store
        .read(&id)
        .with_context(|| format!("Failed to read history for '{id}'"))?
        .unwrap_or_default();

    println!("History for {}", id.to_string().bold());
    println!("─────────────────────────────────────────────────────────");
    if history.is_empty() {
        println!("(no runs recorded)");
        return Ok(());
    }
    for line in render_history(&history, limit) {
        println!("{line}");
    }
    Ok(())
}

/// One line per run, newest first.
pub fn render_history(history: &History, limit: Option<usize>) -> Vec<String> {
    history
        .records()
        .iter()
        .rev()
        .take(limit.unwrap_or(usize::MAX))
        .map(render_record)
        .collect()
}

fn render_record(record: &StatusRecord) -> String {
    let finished = record.finished.as_deref().unwrap_or("-");
    let mut line = format!(
        "{} started {}  latest {}  finished {}  {}",
        status_label(record.status),
        record.started,
        record.latest,
        finished,
        record.message
    );
    if let Some(detail) = &record.error_detail {
        let first_line = detail.lines().next().unwrap_or_default();
        if first_line != record.message {
            line.push_str(&format!("\n             {}", first_line.dimmed()));
        }
    }
    line
}

fn status_label(status: JobStatus) -> ColoredString {
    let label = format!("{status:<12}");
    match status {
        JobStatus::Started => label.cyan(),
        JobStatus::Running => label.yellow(),
        JobStatus::Finished => label.green(),
        JobStatus::Failed => label.red(),
        JobStatus::SystemKill => label.magenta().bold(),
    }
}
