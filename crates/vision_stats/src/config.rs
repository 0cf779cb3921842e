use std::env;
use std::time::Duration;

use bon::Builder;
use vision_reddit::posts::DEFAULT_LIMIT;
use vision_reddit::{DEFAULT_SUBREDDIT, Timeframe, valid_subreddit};
use vision_steam::{DEFAULT_APP_ID, valid_app_id};
use vision_upstream::config::{checked_var, parse_var, secs_var, var};
use vision_upstream::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

pub use vision_upstream::ConfigError;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct StatsConfig {
    /// Origin serving the `/api/...` proxy routes.
    #[builder(default = DEFAULT_BASE_URL.to_string())]
    pub api_base: String,
    #[builder(default = DEFAULT_SUBREDDIT.to_string())]
    pub subreddit: String,
    #[builder(default = DEFAULT_APP_ID.to_string())]
    pub app_id: String,
    #[builder(default)]
    pub posts_timeframe: Timeframe,
    #[builder(default = DEFAULT_LIMIT)]
    pub posts_limit: u32,
    #[builder(default = DEFAULT_REFRESH_INTERVAL)]
    pub refresh_interval: Duration,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StatsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self::builder()
            .maybe_api_base(var(&lookup, "VISION_API_BASE"))
            .maybe_subreddit(checked_var(&lookup, "VISION_SUBREDDIT", valid_subreddit)?)
            .maybe_app_id(checked_var(&lookup, "VISION_STEAM_APP_ID", valid_app_id)?)
            .maybe_posts_timeframe(parse_var(&lookup, "VISION_POSTS_TIMEFRAME")?)
            .maybe_posts_limit(parse_var(&lookup, "VISION_POSTS_LIMIT")?)
            .maybe_refresh_interval(secs_var(&lookup, "VISION_REFRESH_SECS")?)
            .maybe_request_timeout(secs_var(&lookup, "VISION_TIMEOUT_SECS")?)
            .maybe_user_agent(var(&lookup, "VISION_USER_AGENT"))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = StatsConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_base, DEFAULT_BASE_URL);
        assert_eq!(config.subreddit, "osengine");
        assert_eq!(config.app_id, "3984710");
        assert_eq!(config.posts_timeframe, Timeframe::All);
        assert_eq!(config.posts_limit, 100);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn reads_overrides() {
        let config = StatsConfig::from_lookup(lookup(&[
            ("VISION_API_BASE", "https://visionalgorithms.example"),
            ("VISION_SUBREDDIT", "RustLang"),
            ("VISION_POSTS_TIMEFRAME", "week"),
            ("VISION_POSTS_LIMIT", "25"),
            ("VISION_REFRESH_SECS", "60"),
            ("VISION_TIMEOUT_SECS", " 3 "),
        ]))
        .unwrap();

        assert_eq!(config.api_base, "https://visionalgorithms.example");
        assert_eq!(config.subreddit, "rustlang");
        assert_eq!(config.posts_timeframe, Timeframe::Week);
        assert_eq!(config.posts_limit, 25);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = StatsConfig::from_lookup(lookup(&[("VISION_SUBREDDIT", "  ")])).unwrap();
        assert_eq!(config.subreddit, DEFAULT_SUBREDDIT);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = StatsConfig::from_lookup(lookup(&[("VISION_POSTS_LIMIT", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "VISION_POSTS_LIMIT", .. }));

        let err = StatsConfig::from_lookup(lookup(&[("VISION_REFRESH_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "VISION_REFRESH_SECS", .. }));

        let err =
            StatsConfig::from_lookup(lookup(&[("VISION_POSTS_TIMEFRAME", "decade")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "VISION_POSTS_TIMEFRAME", .. }));
    }

    #[test]
    fn rejects_identifiers_that_would_alter_the_request() {
        let err = StatsConfig::from_lookup(lookup(&[("VISION_SUBREDDIT", "osengine?limit=1#")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "VISION_SUBREDDIT", .. }));

        let err = StatsConfig::from_lookup(lookup(&[("VISION_STEAM_APP_ID", "730&cc=us")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "VISION_STEAM_APP_ID", .. }));
    }
}
