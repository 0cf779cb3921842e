use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use vision_upstream::{NoQuery, NormalizeError, Route};

pub const DEFAULT_WISHLISTS: u64 = 200;

/// Store responses are keyed by the requested app id.
pub type AppDetailsResponse = HashMap<String, AppDetailsEntry>;

#[derive(Serialize, Deserialize, Debug)]
pub struct AppDetailsEntry {
    #[serde(default)]
    pub success: bool,
    pub data: Option<AppData>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AppData {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price_overview: Option<PriceOverview>,
    pub platforms: Option<Platforms>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceOverview {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub initial: i64,
    #[serde(rename = "final", default)]
    pub final_price: i64,
    #[serde(default)]
    pub discount_percent: i64,
    #[serde(default)]
    pub initial_formatted: String,
    #[serde(default)]
    pub final_formatted: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platforms {
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub mac: bool,
    #[serde(default)]
    pub linux: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SteamStat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceOverview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Platforms>,
    /// Estimated; the store API does not expose wishlists.
    pub wishlists: u64,
    /// Not retrievable from any public API, always 0.
    pub followers: u64,
}

impl Default for SteamStat {
    fn default() -> Self {
        Self {
            name: None,
            kind: None,
            price: None,
            platforms: None,
            wishlists: DEFAULT_WISHLISTS,
            followers: 0,
        }
    }
}

impl SteamStat {
    /// Strict read of a store `appdetails` body. Wishlists stay at the default
    /// until [`SteamStat::with_wishlists`] supplies an ownership estimate.
    pub fn from_app_details(body: Value, app_id: &str) -> Result<Self, NormalizeError> {
        let mut response: AppDetailsResponse = serde_json::from_value(body)?;

        let entry = response
            .remove(app_id)
            .ok_or_else(|| NormalizeError::Unavailable(format!("no store entry for app {app_id}")))?;

        if !entry.success {
            return Err(NormalizeError::Unavailable(format!(
                "store reported no data for app {app_id}"
            )));
        }

        let data = entry.data.unwrap_or_default();

        Ok(Self {
            name: data.name,
            kind: data.kind,
            price: data.price_overview,
            platforms: data.platforms,
            wishlists: DEFAULT_WISHLISTS,
            followers: 0,
        })
    }

    pub fn with_wishlists(self, wishlists: u64) -> Self {
        Self { wishlists, ..self }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub appids: String,
}

/// The store's own `appdetails` endpoint, fetched by the proxy.
pub struct StoreAppDetails;

impl Route for StoreAppDetails {
    type Params = String;
    type Query = StoreQuery;

    fn segments(_: &String) -> Vec<String> {
        vec!["api".to_string(), "appdetails".to_string()]
    }

    fn query(app_id: &String) -> StoreQuery {
        StoreQuery {
            appids: app_id.clone(),
        }
    }
}

/// The proxy's store route, fetched by the stats aggregator.
pub struct AppDetails;

impl Route for AppDetails {
    type Params = String;
    type Query = NoQuery;

    fn segments(app_id: &String) -> Vec<String> {
        ["api", "steam", "appdetails", app_id.as_str()]
            .map(String::from)
            .to_vec()
    }

    fn query(_: &String) -> NoQuery {
        NoQuery {}
    }
}
