use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use futures_util::FutureExt;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use vision_reddit::{
    EngagementStat, RedditStat, SubredditAbout, TopPosts, TopPostsParams, normalize_engagement,
    normalize_subreddit,
};
use vision_steam::{AppDetails, SteamSpyAppDetails, SteamStat, estimate_wishlists};
use vision_upstream::envelope::live_body;
use vision_upstream::{FetchJson, UpstreamClient, UpstreamFailure};

use crate::config::StatsConfig;
use crate::scheduler::{self, AutoUpdateHandle};
use crate::stats::AggregatedStats;

pub struct StatsAggregator<F> {
    upstream: F,
    config: StatsConfig,
    cache: RwLock<Option<AggregatedStats>>,
    // Held for a whole cycle so cycles never interleave.
    cycle: Mutex<()>,
}

impl StatsAggregator<UpstreamClient> {
    pub fn from_config(config: StatsConfig) -> Result<Self, UpstreamFailure> {
        let upstream = UpstreamClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::new(upstream, config))
    }
}

impl<F: FetchJson> StatsAggregator<F> {
    pub fn new(upstream: F, config: StatsConfig) -> Self {
        Self {
            upstream,
            config,
            cache: RwLock::new(None),
            cycle: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    pub fn upstream(&self) -> &F {
        &self.upstream
    }

    /// Last completed snapshot, if any cycle has finished.
    pub fn cached_stats(&self) -> Option<AggregatedStats> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn refresh(&self) -> AggregatedStats {
        self.fetch_all_stats().await
    }

    /// Run one aggregation cycle. Never fails: a broken branch degrades to a
    /// cached value or its defaults, and an aborted cycle returns the previous
    /// snapshot (or all defaults) without touching the cache.
    pub async fn fetch_all_stats(&self) -> AggregatedStats {
        let _cycle = self.cycle.lock().await;
        let cached = self.cached_stats();

        match AssertUnwindSafe(self.aggregate(cached.as_ref()))
            .catch_unwind()
            .await
        {
            Ok(stats) => {
                *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(stats.clone());
                info!(
                    members = stats.reddit.members,
                    wishlists = stats.steam.wishlists,
                    views_k = stats.views.estimated_views_thousands,
                    "Statistics updated"
                );
                stats
            }
            Err(_) => {
                error!("Failed to fetch statistics, serving cached or default values");
                cached.unwrap_or_else(|| AggregatedStats::defaults(Utc::now()))
            }
        }
    }

    async fn aggregate(&self, cached: Option<&AggregatedStats>) -> AggregatedStats {
        let (reddit, views, steam) = tokio::join!(
            self.fetch_reddit(cached.map(|c| &c.reddit)),
            self.fetch_views(),
            self.fetch_steam(cached.map(|c| &c.steam)),
        );

        AggregatedStats {
            reddit,
            steam,
            views,
            last_updated: Utc::now(),
        }
    }

    async fn fetch_reddit(&self, cached: Option<&RedditStat>) -> RedditStat {
        let outcome = self
            .upstream
            .call::<SubredditAbout>(&self.config.api_base, &self.config.subreddit)
            .await;

        normalize_subreddit(outcome, cached)
    }

    /// Never reuses a previous snapshot; failures always read as the defaults.
    async fn fetch_views(&self) -> EngagementStat {
        let params = TopPostsParams::builder()
            .subreddit(self.config.subreddit.clone())
            .timeframe(self.config.posts_timeframe)
            .limit(self.config.posts_limit)
            .build();

        let outcome = self
            .upstream
            .call::<TopPosts>(&self.config.api_base, &params)
            .await;

        normalize_engagement(outcome, params.limit)
    }

    /// App details first; the ownership estimate is only requested for a
    /// successful store entry.
    async fn fetch_steam(&self, fallback: Option<&SteamStat>) -> SteamStat {
        let app_id = &self.config.app_id;
        let details = self
            .upstream
            .call::<AppDetails>(&self.config.api_base, app_id)
            .await;

        match live_body(details).and_then(|body| SteamStat::from_app_details(body, app_id)) {
            Ok(stat) => {
                let ownership = self
                    .upstream
                    .call::<SteamSpyAppDetails>(&self.config.api_base, app_id)
                    .await;
                stat.with_wishlists(estimate_wishlists(ownership))
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch Steam stats, using fallback");
                fallback.cloned().unwrap_or_default()
            }
        }
    }
}

impl<F: FetchJson + 'static> StatsAggregator<F> {
    /// [`scheduler::start_auto_update`] with the configured refresh interval.
    pub fn start_auto_update<C>(self: &Arc<Self>, on_update: C) -> AutoUpdateHandle
    where
        C: FnMut(AggregatedStats) + Send + 'static,
    {
        scheduler::start_auto_update(Arc::clone(self), self.config.refresh_interval, on_update)
    }
}
