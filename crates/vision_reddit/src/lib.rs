pub mod about;
pub mod posts;

pub use about::{AboutJson, RedditStat, SubredditAbout, normalize_subreddit};
pub use posts::{
    EngagementStat, PostsQuery, Timeframe, TopJson, TopPosts, TopPostsParams, normalize_engagement,
};

pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_SUBREDDIT: &str = "osengine";

/// Reddit's own naming rule: 1 to 21 of `[A-Za-z0-9_]`. Returns the
/// lowercased name, or `None` if `candidate` is not one.
pub fn valid_subreddit(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    let well_formed = (1..=21).contains(&candidate.len())
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');

    well_formed.then(|| candidate.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subreddit_names_follow_reddit_rules() {
        assert_eq!(valid_subreddit(" OSEngine "), Some("osengine".to_string()));
        assert_eq!(valid_subreddit("a_b_9"), Some("a_b_9".to_string()));
        assert_eq!(valid_subreddit("abcdefghijklmnopqrstu"), Some("abcdefghijklmnopqrstu".to_string()));

        for bad in ["", "abcdefghijklmnopqrstuv", "not-a-name", "osengine?limit=1#", "../r", "é"] {
            assert_eq!(valid_subreddit(bad), None, "{bad:?}");
        }
    }
}
