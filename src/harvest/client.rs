//! HTTP client for listing and detail fetches.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Fetch, HarvestError};

/// Browser-like user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Thin wrapper around a configured [`reqwest::Client`].
///
/// Requests are issued one at a time by the harvester; the timeout bounds
/// each individual fetch.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(USER_AGENT))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn get_text(&self, url: &str) -> Result<String, HarvestError> {
        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }
}
