#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde::Serialize;
use serde_json::{Value, json};
use vision_stats::StatsConfig;
use vision_upstream::{FetchJson, UpstreamFailure, Url};

pub const BASE: &str = "http://fake";
pub const ABOUT: &str = "http://fake/api/reddit/subreddit/osengine";
pub const POSTS: &str = "http://fake/api/reddit/posts/osengine?limit=100&timeframe=all";
pub const APP: &str = "http://fake/api/steam/appdetails/3984710";
pub const SPY: &str = "http://fake/api/steamspy/appdetails/3984710";

/// In-memory upstream keyed by full URL, query pairs in key order. Unknown URLs fail like a refused
/// connection.
#[derive(Default)]
pub struct FakeUpstream {
    responses: Mutex<HashMap<String, Result<Value, UpstreamFailure>>>,
    calls: Mutex<Vec<String>>,
    panic_on: Mutex<Option<String>>,
}

impl FakeUpstream {
    pub fn live() -> Self {
        let fake = Self::default();
        fake.respond(ABOUT, about_body(1234, 17));
        fake.respond(POSTS, posts_body(&[(100, 10), (50, 5)]));
        fake.respond(APP, app_body(true));
        fake.respond(SPY, json!({ "appid": 3984710, "owners": "0 .. 20,000" }));
        fake
    }

    pub fn respond(&self, url: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body));
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            Err(UpstreamFailure::Status {
                status,
                message: format!("status {status}"),
            }),
        );
    }

    pub fn fail_all(&self) {
        for url in [ABOUT, POSTS, APP, SPY] {
            self.fail(url, 503);
        }
    }

    pub fn panic_on(&self, url: &str) {
        *self.panic_on.lock().unwrap() = Some(url.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn request_key<Q: Serialize + ?Sized>(mut url: Url, query: &Q) -> String {
    let pairs: BTreeMap<String, String> = match serde_json::to_value(query).unwrap() {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| match v {
                Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect(),
        _ => BTreeMap::new(),
    };

    if !pairs.is_empty() {
        let mut serializer = url.query_pairs_mut();
        for (k, v) in &pairs {
            serializer.append_pair(k, v);
        }
    }

    url.to_string()
}

impl FetchJson for FakeUpstream {
    async fn fetch_json<Q>(&self, url: Url, query: &Q) -> Result<Value, UpstreamFailure>
    where
        Q: Serialize + Sync + ?Sized,
    {
        let url = request_key(url, query);
        self.calls.lock().unwrap().push(url.clone());

        if self.panic_on.lock().unwrap().as_deref() == Some(url.as_str()) {
            panic!("upstream fake asked to panic on {url}");
        }

        self.responses
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Err(UpstreamFailure::Transport("connection refused".to_string())))
    }
}

pub fn config() -> StatsConfig {
    StatsConfig::builder().api_base(BASE).build()
}

pub fn about_body(subscribers: u64, active: u64) -> Value {
    json!({
        "kind": "t5",
        "data": {
            "subscribers": subscribers,
            "active_user_count": active,
            "created_utc": 1700000000.0,
            "public_description": "OS Engine community"
        }
    })
}

pub fn posts_body(posts: &[(i64, i64)]) -> Value {
    let children: Vec<Value> = posts
        .iter()
        .map(|(ups, comments)| json!({ "kind": "t3", "data": { "ups": ups, "num_comments": comments } }))
        .collect();
    json!({ "kind": "Listing", "data": { "children": children } })
}

pub fn app_body(success: bool) -> Value {
    if success {
        json!({
            "3984710": {
                "success": true,
                "data": {
                    "name": "OS Engine",
                    "type": "game",
                    "platforms": { "windows": true, "mac": false, "linux": false }
                }
            }
        })
    } else {
        json!({ "3984710": { "success": false } })
    }
}
