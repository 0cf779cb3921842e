//! Resolving which subreddit or app a proxy request is about.
//!
//! Sources are tried in a fixed order: the request path, the query string,
//! then the `x-forwarded-uri`, `x-forwarded-path` and `referer` headers, and
//! finally the configured default. A candidate that is not a valid identifier
//! for its kind is skipped.

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::http::{HeaderMap, Uri};
use regex::Regex;
use vision_reddit::valid_subreddit;
use vision_steam::valid_app_id;

static SUBREDDIT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/subreddit/([^/?&#]+)").expect("valid subreddit pattern"));
static POSTS_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/posts/([^/?&#]+)").expect("valid posts pattern"));
static APPDETAILS_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/appdetails/([^/?&#]+)").expect("valid appdetails pattern"));

const FORWARDED_HEADERS: [&str; 3] = ["x-forwarded-uri", "x-forwarded-path", "referer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// `/subreddit/{name}` or `?subreddit=`.
    Subreddit,
    /// `/posts/{name}` or `?subreddit=`.
    PostsSubreddit,
    /// `/appdetails/{appid}` or `?appid=`.
    AppId,
}

impl Param {
    fn segment(self) -> &'static Regex {
        match self {
            Param::Subreddit => &SUBREDDIT_SEGMENT,
            Param::PostsSubreddit => &POSTS_SEGMENT,
            Param::AppId => &APPDETAILS_SEGMENT,
        }
    }

    fn query_key(self) -> &'static str {
        match self {
            Param::Subreddit | Param::PostsSubreddit => "subreddit",
            Param::AppId => "appid",
        }
    }

    /// Normalized identifier, or `None` if `candidate` is not one.
    pub fn accept(self, candidate: &str) -> Option<String> {
        match self {
            Param::Subreddit | Param::PostsSubreddit => valid_subreddit(candidate),
            Param::AppId => valid_app_id(candidate),
        }
    }

    fn find_in(self, text: &str) -> Option<String> {
        self.segment()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| self.accept(m.as_str()))
    }

    pub fn resolve(
        self,
        uri: &Uri,
        query: &HashMap<String, String>,
        headers: &HeaderMap,
        default: &str,
    ) -> String {
        self.find_in(uri.path())
            .or_else(|| query.get(self.query_key()).and_then(|v| self.accept(v)))
            .or_else(|| {
                FORWARDED_HEADERS.iter().find_map(|name| {
                    headers
                        .get(*name)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| self.find_in(v))
                })
            })
            .unwrap_or_else(|| default.to_string())
    }
}
