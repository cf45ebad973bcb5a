//! NCSC feed adapter

use async_trait::async_trait;
use reqwest::Client;

use super::{parse_feed, FeedAdapter, FeedError, REQUEST_TIMEOUT};
use crate::model::article::Article;

const SOURCE_NAME: &str = "NCSC";
const FEED_URL: &str = "https://www.ncsc.gov.uk/api/1/services/v1/all-rss-feed.xml";

/// Adapter for the NCSC all-items RSS feed
pub struct NcscFeed {
    client: Client,
    url: String,
}

impl NcscFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl Default for NcscFeed {
    fn default() -> Self {
        Self::new(FEED_URL)
    }
}

#[async_trait]
impl FeedAdapter for NcscFeed {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self) -> Result<Vec<Article>, FeedError> {
        tracing::debug!(url = %self.url, "Fetching NCSC feed");

        let response = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::ParseError(format!(
                "HTTP {}: {}",
                response.status(),
                self.url
            )));
        }

        let body = response.text().await?;
        parse_feed(&body, SOURCE_NAME)
    }
}
