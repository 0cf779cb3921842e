use bon::Builder;
use vision_reddit::{DEFAULT_SUBREDDIT, REDDIT_BASE_URL};
use vision_steam::{DEFAULT_APP_ID, STEAMSPY_BASE_URL, STORE_BASE_URL};
use vision_upstream::UpstreamClient;

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Where the real upstream APIs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamHosts {
    pub reddit: String,
    pub store: String,
    pub steamspy: String,
}

impl Default for UpstreamHosts {
    fn default() -> Self {
        Self {
            reddit: REDDIT_BASE_URL.to_string(),
            store: STORE_BASE_URL.to_string(),
            steamspy: STEAMSPY_BASE_URL.to_string(),
        }
    }
}

impl UpstreamHosts {
    /// Every upstream served from one origin, as a test fake does.
    pub fn single(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            reddit: origin.clone(),
            store: origin.clone(),
            steamspy: origin,
        }
    }
}

#[derive(Builder)]
#[builder(on(String, into))]
pub struct ProxyState {
    pub upstream: UpstreamClient,
    #[builder(default)]
    pub hosts: UpstreamHosts,
    #[builder(default = DEFAULT_SUBREDDIT.to_string())]
    pub default_subreddit: String,
    #[builder(default = DEFAULT_APP_ID.to_string())]
    pub default_app_id: String,
}

impl ProxyState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let upstream = UpstreamClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::builder()
            .upstream(upstream)
            .default_subreddit(config.default_subreddit.clone())
            .default_app_id(config.default_app_id.clone())
            .build())
    }
}
