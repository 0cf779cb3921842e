use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use vision_upstream::envelope::live_body;
use vision_upstream::{NormalizeError, Route, UpstreamFailure};

pub const DEFAULT_LIMIT: u32 = 100;
pub const DEFAULT_VIEWS_THOUSANDS: u64 = 178;

/// Rough engagement weights: one upvote stands for ~15 views, one comment for ~5.
pub const VIEWS_PER_UPVOTE: u64 = 15;
pub const VIEWS_PER_COMMENT: u64 = 5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Hour => write!(f, "hour"),
            Timeframe::Day => write!(f, "day"),
            Timeframe::Week => write!(f, "week"),
            Timeframe::Month => write!(f, "month"),
            Timeframe::Year => write!(f, "year"),
            Timeframe::All => write!(f, "all"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timeframe: {0}")]
pub struct UnknownTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Timeframe::Hour),
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            "all" => Ok(Timeframe::All),
            other => Err(UnknownTimeframe(other.to_string())),
        }
    }
}

/// Serializes to Reddit's own `top.json` query; the subreddit goes in the path.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Builder)]
#[builder(on(String, into))]
pub struct TopPostsParams {
    #[serde(skip)]
    pub subreddit: String,
    #[builder(default)]
    #[serde(rename = "t")]
    pub timeframe: Timeframe,
    #[builder(default = DEFAULT_LIMIT)]
    pub limit: u32,
}

#[derive(Deserialize, Debug)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Deserialize, Debug)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Deserialize, Debug)]
pub struct Child {
    #[serde(default)]
    pub data: PostData,
}

#[derive(Deserialize, Debug, Default)]
pub struct PostData {
    pub ups: Option<i64>,
    pub num_comments: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementStat {
    pub estimated_views_thousands: u64,
    pub total_upvotes: u64,
    pub total_comments: u64,
    pub total_posts: u64,
}

impl Default for EngagementStat {
    fn default() -> Self {
        Self {
            estimated_views_thousands: DEFAULT_VIEWS_THOUSANDS,
            total_upvotes: 0,
            total_comments: 0,
            total_posts: 0,
        }
    }
}

impl EngagementStat {
    pub fn from_posts<'a>(posts: impl IntoIterator<Item = &'a PostData>) -> Self {
        let mut total_upvotes: u64 = 0;
        let mut total_comments: u64 = 0;
        let mut total_posts: u64 = 0;

        for post in posts {
            total_upvotes = total_upvotes.saturating_add(post.ups.unwrap_or(0).max(0) as u64);
            total_comments =
                total_comments.saturating_add(post.num_comments.unwrap_or(0).max(0) as u64);
            total_posts += 1;
        }

        let estimated_views = total_upvotes
            .saturating_mul(VIEWS_PER_UPVOTE)
            .saturating_add(total_comments.saturating_mul(VIEWS_PER_COMMENT))
            / 1000;

        Self {
            estimated_views_thousands: if estimated_views == 0 {
                DEFAULT_VIEWS_THOUSANDS
            } else {
                estimated_views
            },
            total_upvotes,
            total_comments,
            total_posts,
        }
    }

    /// Only the first `limit` posts of the listing are counted.
    pub fn from_listing(body: Value, limit: u32) -> Result<Self, NormalizeError> {
        let listing: Listing = serde_json::from_value(body)?;

        Ok(Self::from_posts(
            listing
                .data
                .children
                .iter()
                .take(limit as usize)
                .map(|child| &child.data),
        ))
    }
}

/// Total: any failure, envelope included, yields the defaults.
pub fn normalize_engagement(outcome: Result<Value, UpstreamFailure>, limit: u32) -> EngagementStat {
    match live_body(outcome).and_then(|body| EngagementStat::from_listing(body, limit)) {
        Ok(stat) => stat,
        Err(err) => {
            warn!(error = %err, "Failed to fetch Reddit views, using defaults");
            EngagementStat::default()
        }
    }
}

/// Reddit's own `top.json` listing, fetched by the proxy.
pub struct TopJson;

impl Route for TopJson {
    type Params = TopPostsParams;
    type Query = TopPostsParams;

    fn segments(params: &TopPostsParams) -> Vec<String> {
        vec!["r".to_string(), params.subreddit.clone(), "top.json".to_string()]
    }

    fn query(params: &TopPostsParams) -> TopPostsParams {
        params.clone()
    }
}

/// Query of the proxy's posts route.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostsQuery {
    pub timeframe: Timeframe,
    pub limit: u32,
}

/// The proxy's posts route, fetched by the stats aggregator.
pub struct TopPosts;

impl Route for TopPosts {
    type Params = TopPostsParams;
    type Query = PostsQuery;

    fn segments(params: &TopPostsParams) -> Vec<String> {
        ["api", "reddit", "posts", params.subreddit.as_str()]
            .map(String::from)
            .to_vec()
    }

    fn query(params: &TopPostsParams) -> PostsQuery {
        PostsQuery {
            timeframe: params.timeframe,
            limit: params.limit,
        }
    }
}
