use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::warn;
use vision_reddit::posts::DEFAULT_LIMIT;
use vision_reddit::{AboutJson, Timeframe, TopJson, TopPostsParams};
use vision_steam::{SteamSpyApi, StoreAppDetails};
use vision_upstream::envelope::FallbackEnvelope;
use vision_upstream::{FetchJson, Route};

use crate::extract::Param;
use crate::state::ProxyState;

type Params = Query<HashMap<String, String>>;

pub async fn reddit_subreddit(
    State(state): State<Arc<ProxyState>>,
    uri: Uri,
    Query(query): Params,
    headers: HeaderMap,
) -> Response {
    let subreddit = Param::Subreddit.resolve(&uri, &query, &headers, &state.default_subreddit);

    forward::<AboutJson>(
        &state.hosts.reddit,
        &state,
        &subreddit,
        "Failed to fetch Reddit data",
        json!({ "data": { "subscribers": 50, "active_user_count": 0 } }),
    )
    .await
}

pub async fn reddit_posts(
    State(state): State<Arc<ProxyState>>,
    uri: Uri,
    Query(query): Params,
    headers: HeaderMap,
) -> Response {
    let params = TopPostsParams::builder()
        .subreddit(Param::PostsSubreddit.resolve(&uri, &query, &headers, &state.default_subreddit))
        .timeframe(timeframe(&query))
        .limit(limit(&query))
        .build();

    forward::<TopJson>(
        &state.hosts.reddit,
        &state,
        &params,
        "Failed to fetch Reddit posts",
        json!({ "data": { "children": [] } }),
    )
    .await
}

pub async fn steam_appdetails(
    State(state): State<Arc<ProxyState>>,
    uri: Uri,
    Query(query): Params,
    headers: HeaderMap,
) -> Response {
    let app_id = Param::AppId.resolve(&uri, &query, &headers, &state.default_app_id);

    forward::<StoreAppDetails>(
        &state.hosts.store,
        &state,
        &app_id,
        "Failed to fetch Steam data",
        json!({ "success": false }),
    )
    .await
}

pub async fn steamspy_appdetails(
    State(state): State<Arc<ProxyState>>,
    uri: Uri,
    Query(query): Params,
    headers: HeaderMap,
) -> Response {
    let app_id = Param::AppId.resolve(&uri, &query, &headers, &state.default_app_id);

    forward::<SteamSpyApi>(
        &state.hosts.steamspy,
        &state,
        &app_id,
        "Failed to fetch SteamSpy data",
        json!({}),
    )
    .await
}

/// Upstream body verbatim, or a fallback envelope. Always answered with 200.
async fn forward<R: Route>(
    host: &str,
    state: &ProxyState,
    params: &R::Params,
    message: &'static str,
    fallback: Value,
) -> Response {
    match state.upstream.call::<R>(host, params).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => {
            warn!(host, error = %err, "{message}");
            Json(FallbackEnvelope::new(message, fallback)).into_response()
        }
    }
}

fn timeframe(query: &HashMap<String, String>) -> Timeframe {
    query
        .get("timeframe")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

/// Reddit caps listings at 100 items; zero or garbage means the default.
fn limit(query: &HashMap<String, String>) -> u32 {
    query
        .get("limit")
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .map_or(DEFAULT_LIMIT, |n| n.min(DEFAULT_LIMIT))
}
