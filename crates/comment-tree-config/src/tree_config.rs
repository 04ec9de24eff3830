//! Comment tree configuration
//!
//! Configuration loaded from `.comment-tree.toml`.

use reddit_comment_client::CacheMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Comment tree configuration loaded from `.comment-tree.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TreeConfig {
    /// Seconds before a children or parent fetch is abandoned
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Freshly loaded comments scoring below this start collapsed
    #[serde(default = "default_collapse_below_score")]
    pub collapse_below_score: Option<i64>,

    /// How fetched responses interact with the response cache
    #[serde(default)]
    pub cache_mode: CacheMode,

    /// Seconds a cached response stays fresh
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_collapse_below_score() -> Option<i64> {
    Some(-4)
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            collapse_below_score: default_collapse_below_score(),
            cache_mode: CacheMode::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl TreeConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded comment tree config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default comment tree config");
        Self::default()
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Fetch timeout as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Cache TTL as a `Duration`
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TreeConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.collapse_below_score, Some(-4));
        assert_eq!(config.cache_mode, CacheMode::ReadWrite);
        assert_eq!(config.cache_ttl_secs, 300);
    }

    #[test]
    fn test_config_deserialize() {
        let config = TreeConfig::parse(
            r#"
            fetch_timeout_secs = 5
            cache_mode = "write_only"
        "#,
        )
        .unwrap();
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.cache_mode, CacheMode::WriteOnly);
        // Other fields fall back to defaults
        assert_eq!(config.collapse_below_score, Some(-4));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(TreeConfig::parse("").unwrap(), TreeConfig::default());
    }

    #[test]
    fn test_invalid_cache_mode_is_rejected() {
        assert!(TreeConfig::parse(r#"cache_mode = "sometimes""#).is_err());
    }
}
