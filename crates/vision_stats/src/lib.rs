//! Live statistics for the Vision Algorithms site.
//!
//! One [`StatsAggregator`] owns the cache. Each aggregation cycle fetches the
//! subreddit info, the top posts and the Steam app details (followed by the
//! SteamSpy ownership estimate) concurrently, normalizes them and stores the
//! merged [`AggregatedStats`]. A failed branch falls back to its cached value,
//! then to constant defaults; nothing here surfaces an error to the page.

pub mod aggregator;
pub mod config;
pub mod scheduler;
pub mod stats;

pub use aggregator::StatsAggregator;
pub use config::{ConfigError, StatsConfig};
pub use scheduler::{AutoUpdateHandle, start_auto_update};
pub use stats::AggregatedStats;
