use std::env;
use std::time::Duration;

use bon::Builder;
use vision_reddit::{DEFAULT_SUBREDDIT, valid_subreddit};
use vision_steam::{DEFAULT_APP_ID, valid_app_id};
use vision_upstream::config::{checked_var, parse_var, secs_var, var};
use vision_upstream::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use crate::error::ProxyError;

pub const DEFAULT_PORT: u16 = 3002;

#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct ProxyConfig {
    #[builder(default = DEFAULT_PORT)]
    pub port: u16,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
    /// Used when a request names no valid subreddit.
    #[builder(default = DEFAULT_SUBREDDIT.to_string())]
    pub default_subreddit: String,
    /// Used when a request names no valid app id.
    #[builder(default = DEFAULT_APP_ID.to_string())]
    pub default_app_id: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ProxyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProxyError> {
        Ok(Self::builder()
            .maybe_port(parse_var(&lookup, "PORT")?)
            .maybe_request_timeout(secs_var(&lookup, "VISION_TIMEOUT_SECS")?)
            .maybe_user_agent(var(&lookup, "VISION_USER_AGENT"))
            .maybe_default_subreddit(checked_var(&lookup, "VISION_SUBREDDIT", valid_subreddit)?)
            .maybe_default_app_id(checked_var(&lookup, "VISION_STEAM_APP_ID", valid_app_id)?)
            .build())
    }
}
