use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use vision_upstream::envelope::live_body;
use vision_upstream::{NoQuery, Route, UpstreamFailure};

use crate::appdetails::DEFAULT_WISHLISTS;

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+").expect("valid owners pattern"));

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SteamSpyResponse {
    pub name: Option<String>,
    /// Textual range such as `"0 .. 20,000"`.
    pub owners: Option<String>,
}

/// Average of every number in an owners range, thousands separators ignored.
/// Returns 0 when no number is present.
pub fn parse_owners_range(owners: Option<&str>) -> u64 {
    let Some(owners) = owners else {
        return 0;
    };

    let numbers: Vec<u64> = NUMBER_TOKEN
        .find_iter(owners)
        .filter_map(|token| token.as_str().replace(',', "").parse::<u64>().ok())
        .collect();

    if numbers.is_empty() {
        return 0;
    }

    let sum: u128 = numbers.iter().map(|n| u128::from(*n)).sum();
    (sum / numbers.len() as u128) as u64
}

/// SteamSpy has no wishlist figure; the owners estimate stands in for it.
pub fn estimate_wishlists(outcome: Result<Value, UpstreamFailure>) -> u64 {
    let response = live_body(outcome).and_then(|body| Ok(serde_json::from_value::<SteamSpyResponse>(body)?));

    match response {
        Ok(SteamSpyResponse { owners: Some(owners), .. }) if !owners.is_empty() => {
            parse_owners_range(Some(&owners))
        }
        Ok(_) => DEFAULT_WISHLISTS,
        Err(err) => {
            warn!(error = %err, "SteamSpy estimation failed, using baseline");
            DEFAULT_WISHLISTS
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SteamSpyQuery {
    pub request: &'static str,
    pub appid: String,
}

/// SteamSpy's `api.php?request=appdetails`, fetched by the proxy.
pub struct SteamSpyApi;

impl Route for SteamSpyApi {
    type Params = String;
    type Query = SteamSpyQuery;

    fn segments(_: &String) -> Vec<String> {
        vec!["api.php".to_string()]
    }

    fn query(app_id: &String) -> SteamSpyQuery {
        SteamSpyQuery {
            request: "appdetails",
            appid: app_id.clone(),
        }
    }
}

/// The proxy's SteamSpy route, fetched by the stats aggregator.
pub struct SteamSpyAppDetails;

impl Route for SteamSpyAppDetails {
    type Params = String;
    type Query = NoQuery;

    fn segments(app_id: &String) -> Vec<String> {
        ["api", "steamspy", "appdetails", app_id.as_str()]
            .map(String::from)
            .to_vec()
    }

    fn query(_: &String) -> NoQuery {
        NoQuery {}
    }
}
