pub mod history;
pub mod identity;
pub mod record;

pub use history::{History, LogDocument, DEFAULT_MAX_HISTORY_ENTRIES};
pub use identity::{describe_params, normalize_args, JobIdentity};
pub use record::{JobStatus, StatusRecord};
