use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::detail::{self, MatchDetail};
use crate::error::ApiError;
use crate::http_client::http_client;
use crate::model::{DateResp, LiveResp, UpcomingResp};

/// Backend operations the views depend on.
pub trait FixtureApi: Send + Sync {
    fn fixtures_on(&self, date: NaiveDate) -> Result<DateResp, ApiError>;
    fn fixtures_today(&self) -> Result<DateResp, ApiError>;
    fn fixtures_tomorrow(&self) -> Result<DateResp, ApiError>;
    fn upcoming(&self, days: u32) -> Result<UpcomingResp, ApiError>;
    fn live(&self) -> Result<LiveResp, ApiError>;
    /// `Ok(None)` when the backend answered but had no usable fixture.
    fn match_detail(&self, id: u64) -> Result<Option<MatchDetail>, ApiError>;
}

pub struct ApiClient {
    base: String,
    client: &'static Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = http_client().map_err(|err| ApiError::Client(format!("{err:#}")))?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET `base + path` and decode the JSON body. Non-2xx responses are
    /// errors carrying the status and URL; nothing is retried.
    pub fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.fetch_text(path)?;
        decode_json(&self.url_for(path), &body)
    }

    fn fetch_text(&self, path: &str) -> Result<String, ApiError> {
        let url = self.url_for(path);
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            warn!("GET {url} -> {status}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }
        resp.text()
            .map_err(|source| ApiError::Transport { url, source })
    }
}

impl FixtureApi for ApiClient {
    fn fixtures_on(&self, date: NaiveDate) -> Result<DateResp, ApiError> {
        self.fetch_json(&format!("/api/fixtures/date/{}", date.format("%Y-%m-%d")))
    }

    fn fixtures_today(&self) -> Result<DateResp, ApiError> {
        self.fetch_json("/api/fixtures/today")
    }

    fn fixtures_tomorrow(&self) -> Result<DateResp, ApiError> {
        self.fetch_json("/api/fixtures/tomorrow")
    }

    fn upcoming(&self, days: u32) -> Result<UpcomingResp, ApiError> {
        self.fetch_json(&format!("/api/fixtures/upcoming?days={days}"))
    }

    fn live(&self) -> Result<LiveResp, ApiError> {
        self.fetch_json("/api/live")
    }

    fn match_detail(&self, id: u64) -> Result<Option<MatchDetail>, ApiError> {
        let path = format!("/api/matches/{id}");
        let body = self.fetch_text(&path)?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        let root: serde_json::Value = decode_json(&self.url_for(&path), trimmed)?;
        Ok(detail::match_detail_from_value(root))
    }
}

/// Decodes a response body; an empty body counts as `null`.
pub fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    let trimmed = body.trim();
    let raw = if trimmed.is_empty() { "null" } else { trimmed };
    serde_json::from_str(raw).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
