use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the job name and each normalized argument.
pub const IDENTITY_SEPARATOR: &str = "__";

/// Characters that cannot appear in a store path segment.
const RESERVED_PATH_CHARS: [char; 6] = ['.', '$', '#', '[', ']', '/'];

/// Stable key for a job's history in the log store.
///
/// Derived from the job name and its normalized arguments, so repeated
/// invocations with the same arguments append to the same history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobIdentity(String);

impl JobIdentity {
    /// Build the identity for `name` invoked with `args`.
    ///
    /// The name is always followed by the separator, even without arguments,
    /// so `sync_data` with no arguments maps to `sync_data__`.
    pub fn derive<S: AsRef<str>>(name: &str, args: &[S]) -> Self {
        let normalized = normalize_args(args);
        Self(format!(
            "{}{}{}",
            sanitize(name),
            IDENTITY_SEPARATOR,
            normalized.join(IDENTITY_SEPARATOR)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a single argument: leading dashes are stripped and `=` becomes `_`.
pub fn normalize_arg(arg: &str) -> String {
    sanitize(arg.trim_start_matches('-')).replace('=', "_")
}

pub fn normalize_args<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter().map(|a| normalize_arg(a.as_ref())).collect()
}

/// Human-readable rendering of the normalized arguments for the `params` field.
pub fn describe_params<S: AsRef<str>>(args: &[S]) -> String {
    normalize_args(args).join(", ")
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if RESERVED_PATH_CHARS.contains(&c) || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
