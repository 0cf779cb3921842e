use tokio::test;
use vision_reddit::{
    AboutJson, DEFAULT_SUBREDDIT, EngagementStat, REDDIT_BASE_URL, RedditStat, TopJson,
    TopPostsParams,
};
use vision_upstream::{FetchJson, UpstreamClient};

// Hits www.reddit.com; run with `--ignored`.

#[test]
#[ignore]
pub async fn fetch_subreddit_about() {
    let client = UpstreamClient::builder().build().expect("Failed to build client");

    let body = client
        .call::<AboutJson>(REDDIT_BASE_URL, &DEFAULT_SUBREDDIT.to_string())
        .await
        .expect("Failed to fetch subreddit about");

    let stat = RedditStat::from_about(body).expect("Unexpected about shape");
    println!("{stat:?}");
}

#[test]
#[ignore]
pub async fn fetch_top_posts() {
    let client = UpstreamClient::builder().build().expect("Failed to build client");
    let params = TopPostsParams::builder().subreddit(DEFAULT_SUBREDDIT).build();

    let body = client
        .call::<TopJson>(REDDIT_BASE_URL, &params)
        .await
        .expect("Failed to fetch top posts");

    let stat = EngagementStat::from_listing(body, params.limit).expect("Unexpected listing shape");
    println!("{stat:?}");
}
