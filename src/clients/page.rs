//! Plain text page fetching

#[cfg(test)]
use mockall::automock;

use tracing::{debug, warn};

use crate::clients::USER_AGENT;
use crate::clients::error::ApiError;

/// Trait for fetching a page body as text
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the body when the server answered with a success status
    async fn fetch_text(&self, url: &str) -> Result<String, ApiError>;
}

/// Fetch a page, folding any failure into `None`
///
/// Source pages being unreachable is an expected condition; it shows up as an
/// unknown version rather than aborting the cycle.
pub async fn fetch_optional(fetcher: &dyn PageFetcher, url: &str) -> Option<String> {
    match fetcher.fetch_text(url).await {
        Ok(body) => {
            debug!("Fetched {} bytes from {}", body.len(), url);
            Some(body)
        }
        Err(e) => {
            warn!("Failed to fetch {}: {}", url, e);
            None
        }
    }
}

/// reqwest-backed page fetcher
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                endpoint: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}
