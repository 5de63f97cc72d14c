use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};

const MAX_TIMEOUT_SECS: u64 = 120;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. Every request asks intermediaries to revalidate,
/// so polling always sees fresh scores. The client-wide timeout is only a
/// ceiling; `ApiClient` sets its own on every request.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        Client::builder()
            .timeout(Duration::from_secs(MAX_TIMEOUT_SECS))
            .user_agent(concat!("goals_terminal/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("failed to build http client")
    })
}
