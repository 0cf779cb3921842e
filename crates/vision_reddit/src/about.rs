use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use vision_upstream::envelope::is_fallback;
use vision_upstream::{NoQuery, NormalizeError, Route, UpstreamFailure};

pub const DEFAULT_MEMBERS: u64 = 50;

#[derive(Serialize, Deserialize, Debug)]
pub struct AboutResponse {
    pub data: AboutData,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AboutData {
    pub subscribers: Option<u64>,
    pub active_user_count: Option<u64>,
    pub created_utc: Option<f64>,
    pub public_description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RedditStat {
    pub members: u64,
    pub active_users: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for RedditStat {
    fn default() -> Self {
        Self {
            members: DEFAULT_MEMBERS,
            active_users: 0,
            created_at: None,
            description: None,
        }
    }
}

impl RedditStat {
    pub fn from_about(body: Value) -> Result<Self, NormalizeError> {
        let about: AboutResponse = serde_json::from_value(body)?;
        let data = about.data;

        // Zero counts are treated as missing.
        let members = data
            .subscribers
            .filter(|n| *n > 0)
            .or(data.active_user_count.filter(|n| *n > 0))
            .unwrap_or(DEFAULT_MEMBERS);

        Ok(Self {
            members,
            active_users: data.active_user_count.unwrap_or(0),
            created_at: data
                .created_utc
                .and_then(|secs| DateTime::from_timestamp(secs as i64, 0)),
            description: data.public_description,
        })
    }

    /// Counts carried in a proxy fallback envelope: `subscribers` or the
    /// constant, `active_user_count` or zero.
    pub fn from_envelope(body: &Value) -> Self {
        let data = body
            .get("fallback")
            .cloned()
            .and_then(|fallback| serde_json::from_value::<AboutResponse>(fallback).ok())
            .map(|about| about.data)
            .unwrap_or_default();

        Self {
            members: data.subscribers.filter(|n| *n > 0).unwrap_or(DEFAULT_MEMBERS),
            active_users: data.active_user_count.unwrap_or(0),
            created_at: None,
            description: None,
        }
    }
}

/// Total. A fallback envelope is read for its own counts; a transport or
/// payload failure yields `cached`, or the defaults when nothing is cached.
pub fn normalize_subreddit(
    outcome: Result<Value, UpstreamFailure>,
    cached: Option<&RedditStat>,
) -> RedditStat {
    let parsed = outcome.map_err(NormalizeError::from).and_then(|body| {
        if is_fallback(&body) {
            warn!(
                error = body.get("error").and_then(serde_json::Value::as_str).unwrap_or_default(),
                "Proxy returned Reddit fallback data"
            );
            return Ok(RedditStat::from_envelope(&body));
        }
        RedditStat::from_about(body)
    });

    match parsed {
        Ok(stat) => stat,
        Err(err) => {
            warn!(error = %err, "Failed to fetch Reddit stats, using cached value");
            cached.cloned().unwrap_or_default()
        }
    }
}

/// Reddit's own `about.json`, fetched by the proxy.
pub struct AboutJson;

impl Route for AboutJson {
    type Params = String;
    type Query = NoQuery;

    fn segments(subreddit: &String) -> Vec<String> {
        vec!["r".to_string(), subreddit.clone(), "about.json".to_string()]
    }

    fn query(_: &String) -> NoQuery {
        NoQuery {}
    }
}

/// The proxy's subreddit route, fetched by the stats aggregator.
pub struct SubredditAbout;

impl Route for SubredditAbout {
    type Params = String;
    type Query = NoQuery;

    fn segments(subreddit: &String) -> Vec<String> {
        ["api", "reddit", "subreddit", subreddit.as_str()]
            .map(String::from)
            .to_vec()
    }

    fn query(_: &String) -> NoQuery {
        NoQuery {}
    }
}
