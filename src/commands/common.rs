use anyhow::Result;

use crate::config::MonitorConfig;
use crate::store::FirebaseStore;

/// Build the HTTP store client for `config`, or `None` when no store is configured.
pub fn open_store(config: &MonitorConfig) -> Result<Option<FirebaseStore>> {
    let Some(url) = config
        .store_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        return Ok(None);
    };

    let store = FirebaseStore::new(
        url,
        &config.store_namespace,
        config.auth_token.clone(),
        config.request_timeout(),
    )?;
    Ok(Some(store))
}
