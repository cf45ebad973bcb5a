//! RSS feed adapters for threat sources
//!
//! One adapter per external source, sharing a single RSS parse path. Only
//! entries mentioning at least one CVE survive; everything else is not a
//! trackable threat for this system.

mod hacker_news;
mod ncsc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Deserialize;

use crate::model::article::Article;
use crate::service::classify::initial_threat_level;
use crate::service::extract::extract_cve_ids;

pub use hacker_news::HackerNewsFeed;
pub use ncsc::NcscFeed;

/// Outbound request timeout shared by the adapters.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse feed: {0}")]
    ParseError(String),
}

/// Trait for threat feed adapters
#[async_trait]
pub trait FeedAdapter: Send + Sync {
    /// Human-readable source name attached to every article.
    fn source_name(&self) -> &'static str;

    /// Fetch and parse the feed into CVE-bearing articles.
    async fn fetch(&self) -> Result<Vec<Article>, FeedError>;
}

/// RSS 2.0 document, as much of it as the adapters read.
#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
}

/// Parse an RSS document into articles for `source`.
///
/// Entries without any extracted CVE are discarded; the scrape-time threat
/// level comes from title keywords.
pub(crate) fn parse_feed(xml: &str, source: &'static str) -> Result<Vec<Article>, FeedError> {
    let document: RssDocument = quick_xml::de::from_str(xml)
        .map_err(|e| FeedError::ParseError(format!("invalid RSS: {}", e)))?;

    let mut articles = Vec::new();

    for item in document.channel.items {
        let cve_ids = extract_cve_ids(&format!("{} {}", item.title, item.description));
        if cve_ids.is_empty() {
            continue;
        }

        let threat_level = initial_threat_level(&item.title);

        tracing::debug!(
            source = source,
            title = %item.title,
            cves = cve_ids.len(),
            level = %threat_level,
            "Accepted feed entry"
        );

        articles.push(Article {
            title: item.title,
            description: item.description,
            link: item.link,
            source: source.to_string(),
            published: parse_pub_date(item.pub_date.as_deref()),
            threat_level,
            cve_ids,
            cves: Vec::new(),
        });
    }

    Ok(articles)
}

/// Parse an entry timestamp: RFC 2822 (the RSS norm), then RFC 3339. A
/// malformed date keeps the fetch time rather than poisoning trend buckets.
fn parse_pub_date(raw: Option<&str>) -> DateTime<Utc> {
    let raw = match raw {
        Some(r) => r.trim(),
        None => return Utc::now(),
    };

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            tracing::debug!(pub_date = raw, "Unparseable pubDate, using fetch time");
            Utc::now()
        })
}

/// Fetch every feed concurrently. A failed source logs a warning and
/// contributes an empty list; it never cancels or blocks the others.
pub async fn fetch_all(adapters: &[Box<dyn FeedAdapter>]) -> Vec<Article> {
    let results = join_all(adapters.iter().map(|a| a.fetch())).await;

    let mut articles = Vec::new();
    for (adapter, result) in adapters.iter().zip(results) {
        match result {
            Ok(mut found) => {
                tracing::info!(
                    source = adapter.source_name(),
                    articles = found.len(),
                    "Feed fetched"
                );
                articles.append(&mut found);
            }
            Err(e) => {
                tracing::warn!(source = adapter.source_name(), error = %e, "Feed fetch failed");
            }
        }
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::severity::Severity;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sample Security Feed</title>
    <item>
      <title>Critical RCE Vulnerability in Example Server (CVE-2024-12345)</title>
      <description>Attackers exploit CVE-2024-12345 to run arbitrary code.</description>
      <link>https://example.com/rce</link>
      <pubDate>Mon, 07 Apr 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Vendor ships quarterly update</title>
      <description>Routine maintenance release with no security content.</description>
      <link>https://example.com/update</link>
      <pubDate>Tue, 08 Apr 2025 09:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Minor flaw patched</title>
      <description>Tracked as cve 2023 44487 with limited impact.</description>
      <link>https://example.com/minor</link>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn keeps_only_cve_bearing_entries() {
        let articles = parse_feed(SAMPLE_RSS, "Sample").unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].cve_ids, vec!["CVE-2024-12345"]);
        assert_eq!(articles[1].cve_ids, vec!["CVE-2023-44487"]);
    }

    #[test]
    fn tags_scrape_time_threat_level() {
        let articles = parse_feed(SAMPLE_RSS, "Sample").unwrap();
        assert_eq!(articles[0].threat_level, Severity::Critical);
        assert_eq!(articles[1].threat_level, Severity::Low);
    }

    #[test]
    fn parses_rfc2822_dates() {
        let articles = parse_feed(SAMPLE_RSS, "Sample").unwrap();
        assert_eq!(
            articles[0].published.to_rfc3339(),
            "2025-04-07T10:00:00+00:00"
        );
    }

    #[test]
    fn malformed_date_falls_back_to_fetch_time() {
        let before = Utc::now();
        let articles = parse_feed(SAMPLE_RSS, "Sample").unwrap();
        assert!(articles[1].published >= before);
    }

    #[test]
    fn invalid_xml_is_an_error() {
        assert!(parse_feed("this is not xml", "Sample").is_err());
    }

    #[test]
    fn source_is_attached_to_every_article() {
        let articles = parse_feed(SAMPLE_RSS, "Sample").unwrap();
        assert!(articles.iter().all(|a| a.source == "Sample"));
    }
}
