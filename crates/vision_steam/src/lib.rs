pub mod appdetails;
pub mod steamspy;

pub use appdetails::{AppDetails, Platforms, PriceOverview, SteamStat, StoreAppDetails};
pub use steamspy::{SteamSpyApi, SteamSpyAppDetails, estimate_wishlists, parse_owners_range};

pub const STORE_BASE_URL: &str = "https://store.steampowered.com";
pub const STEAMSPY_BASE_URL: &str = "https://steamspy.com";
pub const DEFAULT_APP_ID: &str = "3984710";

/// Steam app ids are plain decimal numbers.
pub fn valid_app_id(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();

    (!candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit()))
        .then(|| candidate.to_string())
}
