//! HTTP proxy in front of the Reddit, Steam store and SteamSpy APIs.
//!
//! Browsers cannot call those APIs directly (CORS, Reddit's user-agent rules),
//! so the stats page talks to these routes instead. Every route answers
//! `200 OK` with JSON: the upstream body verbatim, or
//! `{ "error": .., "fallback": .. }` when the upstream call failed.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use state::{ProxyState, UpstreamHosts};

use routes::{reddit_posts, reddit_subreddit, steam_appdetails, steamspy_appdetails};

pub fn router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/reddit/subreddit/{name}", get(reddit_subreddit))
        .route("/functions/reddit-subreddit", get(reddit_subreddit))
        .route("/api/reddit/posts/{name}", get(reddit_posts))
        .route("/functions/reddit-posts", get(reddit_posts))
        .route("/api/steam/appdetails/{appid}", get(steam_appdetails))
        .route("/functions/steam-appdetails", get(steam_appdetails))
        .route("/api/steamspy/appdetails/{appid}", get(steamspy_appdetails))
        .route("/functions/steamspy-appdetails", get(steamspy_appdetails))
        .layer(cors)
        .with_state(state)
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: ProxyConfig) -> Result<(), ProxyError> {
    let state = Arc::new(ProxyState::from_config(&config)?);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ProxyError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Proxy running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ProxyError::Serve)?;

    info!("Proxy shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
