use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use vision_proxy::ProxyConfig;
use vision_stats::{AggregatedStats, StatsAggregator, StatsConfig};

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API proxy the stats page talks to
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Fetch one snapshot and print it as JSON
    Stats,
    /// Keep refreshing and print every snapshot until Ctrl+C
    Watch {
        /// Overrides VISION_REFRESH_SECS
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

fn print_snapshot(stats: &AggregatedStats) {
    println!(
        "\n===== Statistics at {} =====",
        stats.last_updated.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Reddit members: {}", stats.reddit.members);
    println!("  Reddit active users: {}", stats.reddit.active_users);
    println!("  Steam wishlists: {}", stats.steam.wishlists);
    println!("  Steam followers: {}", stats.steam.followers);
    println!(
        "  Estimated views: {}k ({} upvotes, {} comments over {} posts)",
        stats.views.estimated_views_thousands,
        stats.views.total_upvotes,
        stats.views.total_comments,
        stats.views.total_posts
    );
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ProxyConfig::from_env().context("Failed to read proxy configuration")?;
    if let Some(port) = port {
        config.port = port;
    }

    vision_proxy::serve(config).await.context("Proxy server failed")
}

async fn stats() -> anyhow::Result<()> {
    let config = StatsConfig::from_env().context("Failed to read stats configuration")?;
    let aggregator =
        StatsAggregator::from_config(config).context("Failed to build upstream client")?;

    let stats = aggregator.fetch_all_stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

async fn watch(interval_secs: Option<u64>) -> anyhow::Result<()> {
    let mut config = StatsConfig::from_env().context("Failed to read stats configuration")?;
    if let Some(secs) = interval_secs.filter(|secs| *secs > 0) {
        config.refresh_interval = Duration::from_secs(secs);
    }

    info!("Refreshing every {:?}", config.refresh_interval);
    let aggregator = Arc::new(
        StatsAggregator::from_config(config).context("Failed to build upstream client")?,
    );

    let handle = aggregator.start_auto_update(|stats| print_snapshot(&stats));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    handle.cancel().await;

    println!("\nStopped.");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to build log filter")?;
    fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    match args.command {
        Command::Serve { port } => rt.block_on(serve(port)),
        Command::Stats => rt.block_on(stats()),
        Command::Watch { interval_secs } => rt.block_on(watch(interval_secs)),
    }
}
