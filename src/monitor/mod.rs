//! Job supervision: crash recovery at launch, heartbeats while the job runs,
//! and a terminal record when it ends.

mod facade;
mod outcome;
pub mod recovery;
mod supervisor;


pub use facade::{MonitoredExecution, Supervised};
pub use outcome::{JobError, JobOutcome};
pub use recovery::{begin_run, close_dangling_run, RecoveryReport};
pub use supervisor::Supervisor;
