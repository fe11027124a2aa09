//! reqwest-backed [`EventSource`] for the sodaxscan indexing API.
//!
//! - `GET {base}/messages?limit=N` → `{ "data": [summary, ...], "meta": ... }`
//! - `GET {base}/messages/{id}`    → `{ "data": [detail] }` (empty → not found)

use serde::Deserialize;

use crate::{EventSource, EventSummary, FeedError, RawEvent};

pub const DEFAULT_BASE_URL: &str = "https://sodaxscan.com/api";

#[derive(Debug, Clone)]
pub struct SodaxScanSource {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SodaxScanSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SodaxScanSource {
    pub fn new() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn new_with_base_url(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }

    async fn get_json<T>(&self, req: reqwest::RequestBuilder) -> Result<T, FeedError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let resp = req
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl EventSource for SodaxScanSource {
    fn name(&self) -> &'static str {
        "sodaxscan"
    }

    async fn fetch_latest(&self, limit: usize) -> Result<Vec<EventSummary>, FeedError> {
        let req = self
            .http
            .get(self.messages_url())
            .query(&[("limit", limit.to_string())]);
        let body: ListResponse = self.get_json(req).await?;
        Ok(body.data)
    }

    async fn fetch_detail(&self, id: i64) -> Result<Option<RawEvent>, FeedError> {
        let req = self.http.get(format!("{}/{}", self.messages_url(), id));
        let body: DetailResponse = self.get_json(req).await?;
        Ok(body.data.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<EventSummary>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    data: Vec<RawEvent>,
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
