//! The Hacker News feed adapter

use async_trait::async_trait;
use reqwest::Client;

use super::{parse_feed, FeedAdapter, FeedError, REQUEST_TIMEOUT};
use crate::model::article::Article;

const SOURCE_NAME: &str = "The Hacker News";
const FEED_URL: &str = "https://feeds.feedburner.com/TheHackersNews";

/// Adapter for The Hacker News RSS feed
pub struct HackerNewsFeed {
    client: Client,
    url: String,
}

impl HackerNewsFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HackerNewsFeed {
    fn default() -> Self {
        Self::new(FEED_URL)
    }
}

#[async_trait]
impl FeedAdapter for HackerNewsFeed {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self) -> Result<Vec<Article>, FeedError> {
        tracing::debug!(url = %self.url, "Fetching The Hacker News feed");

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
