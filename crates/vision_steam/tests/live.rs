use tokio::test;
use vision_steam::{
    DEFAULT_APP_ID, STEAMSPY_BASE_URL, STORE_BASE_URL, SteamSpyApi, SteamStat, StoreAppDetails,
    estimate_wishlists,
};
use vision_upstream::{FetchJson, UpstreamClient};

// Hits the Steam store and SteamSpy; run with `--ignored`.

#[test]
#[ignore]
pub async fn fetch_app_details_and_ownership() {
    let client = UpstreamClient::builder().build().expect("Failed to build client");
    let app_id = DEFAULT_APP_ID.to_string();

    let body = client
        .call::<StoreAppDetails>(STORE_BASE_URL, &app_id)
        .await
        .expect("Failed to fetch app details");
    let stat = SteamStat::from_app_details(body, &app_id).expect("Unexpected app details shape");

    let ownership = client.call::<SteamSpyApi>(STEAMSPY_BASE_URL, &app_id).await;
    let stat = stat.with_wishlists(estimate_wishlists(ownership));

    println!("{stat:?}");
}
