//! HTTP client for a realtime-database style document store.
//!
//! `GET {base}/{path}.json` returns the JSON value at `path` (or `null`),
//! `PATCH {base}/{path}.json` merges the given object into it.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use crate::models::{History, JobIdentity, LogDocument, StatusRecord};

use super::{log_path, record_path, LogStore, StoreError};

pub(crate) const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct FirebaseStore {
    client: Client,
    base_url: Url,
    namespace: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    pub fn new(
        base_url: &str,
        namespace: &str,
        auth_token: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(request_timeout)
            .user_agent(concat!("jobwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client for log store")?;

        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid store_url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("store_url '{base_url}' cannot hold document paths");
        }

        Ok(Self {
            client,
            base_url,
            namespace: namespace.to_string(),
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// `{base}/{path}.json`, each path segment percent-encoded.
    fn url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(last) = segments.last_mut() {
            last.push_str(".json");
        }
        if let Ok(mut path_segments) = url.path_segments_mut() {
            path_segments.pop_if_empty().extend(&segments);
        }
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token.trim());
        }
        url
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(StoreError::Status {
            code: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }
}

impl LogStore for FirebaseStore {
    fn read(&self, id: &JobIdentity) -> Result<Option<History>, StoreError> {
        let url = self.url(&log_path(&self.namespace, id));
        let response = self.send(self.client.get(url))?;
        let body = response.text()?;
        parse_log_body(&body)
    }

    fn write(&self, id: &JobIdentity, history: &History) -> Result<(), StoreError> {
        let url = self.url(&record_path(&self.namespace, id));
        self.send(self.client.patch(url).json(&LogDocument { log: history }))?;
        Ok(())
    }
}

/// Decode the body of a history read.
///
/// The store answers `null` for a missing path. A list written with gaps may
/// come back as an object keyed by index; those entries are reordered by key.
pub fn parse_log_body(body: &str) -> Result<Option<History>, StoreError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| StoreError::Malformed(e.to_string()))?;

    let records = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(decode_record)
            .collect::<Result<Vec<_>, _>>()?,
        Value::Object(map) => {
            let mut indexed = map
                .into_iter()
                .map(|(key, item)| {
                    key.parse::<usize>()
                        .map(|index| (index, item))
                        .map_err(|_| StoreError::Malformed(format!("unexpected history key '{key}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            indexed.sort_by_key(|(index, _)| *index);
            indexed
                .into_iter()
                .map(|(_, item)| decode_record(item))
                .collect::<Result<Vec<_>, _>>()?
        }
        other => {
            return Err(StoreError::Malformed(format!(
                "expected a list of records, got {other}"
            )))
        }
    };

    Ok(Some(History::from_records(records)))
}

fn decode_record(item: Value) -> Result<StatusRecord, StoreError> {
    serde_json::from_value(item).map_err(|e| StoreError::Malformed(e.to_string()))
}
