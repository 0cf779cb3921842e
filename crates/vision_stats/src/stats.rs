use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vision_reddit::{EngagementStat, RedditStat};
use vision_steam::SteamStat;

/// The snapshot handed to the page and kept in the cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    pub reddit: RedditStat,
    pub steam: SteamStat,
    pub views: EngagementStat,
    pub last_updated: DateTime<Utc>,
}

impl AggregatedStats {
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            reddit: RedditStat::default(),
            steam: SteamStat::default(),
            views: EngagementStat::default(),
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_serialize_with_page_keys() {
        let now = DateTime::from_timestamp(1_760_000_000, 0).unwrap();

        let value = serde_json::to_value(AggregatedStats::defaults(now)).unwrap();

        assert_eq!(
            value,
            json!({
                "reddit": { "members": 50, "activeUsers": 0 },
                "steam": { "wishlists": 200, "followers": 0 },
                "views": {
                    "estimatedViewsThousands": 178,
                    "totalUpvotes": 0,
                    "totalComments": 0,
                    "totalPosts": 0
                },
                "lastUpdated": "2025-10-09T08:53:20Z"
            })
        );
    }
}
