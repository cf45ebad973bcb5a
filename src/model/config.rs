use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "THREAT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_DATA_DIR: &str = "THREAT_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

const ENV_EXPORT_INTERVAL: &str = "THREAT_EXPORT_INTERVAL_SECS";

/// Default snapshot cache TTL: 5 minutes.
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

const HACKER_NEWS_FEED_URL: &str = "https://feeds.feedburner.com/TheHackersNews";
const NCSC_FEED_URL: &str = "https://www.ncsc.gov.uk/api/1/services/v1/all-rss-feed.xml";

/// One RSS feed source.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub feeds: Vec<FeedConfig>,
    pub cache_ttl: Duration,
    pub port: u16,
    pub host: String,
    /// Base directory for saved plans and snapshot exports.
    pub data_dir: PathBuf,
    /// When set, a background job writes the threat report to disk on this interval.
    pub export_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            port: 8080,
            host: "127.0.0.1".to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            export_interval: None,
        }
    }
}

fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig {
            name: "The Hacker News".to_string(),
            url: HACKER_NEWS_FEED_URL.to_string(),
        },
        FeedConfig {
            name: "NCSC".to_string(),
            url: NCSC_FEED_URL.to_string(),
        },
    ]
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let data_dir = std::env::var(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let export_interval = std::env::var(ENV_EXPORT_INTERVAL)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config_file = Self::load_config_file(&config_path).unwrap_or_default();

        let feeds = if config_file.feeds.is_empty() {
            default_feeds()
        } else {
            config_file.feeds
        };

        let cache_ttl =
            Duration::from_secs(config_file.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS));

        Self {
            feeds,
            cache_ttl,
            port,
            host,
            data_dir,
            export_interval,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sources_are_present() {
        let config = Config::default();
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].name, "The Hacker News");
        assert_eq!(config.feeds[1].name, "NCSC");
    }

    #[test]
    fn parses_feed_overrides() {
        let yaml = r#"
feeds:
  - name: Local Fixture
    url: http://127.0.0.1:9999/rss.xml
cache_ttl_secs: 60
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.feeds.len(), 1);
        assert_eq!(file.feeds[0].name, "Local Fixture");
        assert_eq!(file.cache_ttl_secs, Some(60));
    }
}
