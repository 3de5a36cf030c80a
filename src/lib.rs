//! Supervise a long-running job and report its lifecycle to a remote log store.
//!
//! A run is recorded as STARTED, refreshed as RUNNING on every heartbeat, and
//! closed as FINISHED or FAILED. A run killed before it could close is marked
//! SYSTEM_KILL the next time the same job starts.

pub mod clock;
pub mod commands;
pub mod config;
pub mod models;
pub mod monitor;
pub mod store;

pub use config::MonitorConfig;
pub use monitor::{JobError, MonitoredExecution};
