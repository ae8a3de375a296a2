//! HTTP fetching with a shared `reqwest` client.

use super::Fetcher;
use crate::error::{MenuError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build a fetcher that sends `user_agent` and, when given, gives up on a
    /// request after `timeout`.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MenuError::Unexpected(format!("building HTTP client: {e}")))?;
        Ok(ReqwestFetcher { client })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MenuError::fetch(url, e))?;

        let body = response.bytes().await.map_err(|e| MenuError::fetch(url, e))?;
        debug!(bytes = body.len(), "Downloaded body");
        Ok(body.to_vec())
    }
}
