//! `nearby`, `show` and `vote` command handlers.
//!
//! Each command drives the same controllers a page would, against the server
//! at `NEXTCOFFEE_API_URL`.

use std::time::Duration;

use nextcoffee_client::{
    ApiClient, DetailController, FixedLocation, IpLocation, ListingController, ListingView,
    LocationSource, StoreContext,
};
use nextcoffee_core::{ClientConfig, Coordinates};

fn api_client(config: &ClientConfig) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(&config.api_url, config.timeout_secs)?)
}

/// Render the listing page, locating the user first when a position source
/// was given.
///
/// # Errors
///
/// Returns an error only if the HTTP clients cannot be built; fetch failures
/// show up in the returned view.
pub(crate) async fn run_nearby(
    config: &ClientConfig,
    lat_long: Option<Coordinates>,
    ip: bool,
) -> anyhow::Result<ListingView> {
    let api = api_client(config)?;
    let ctx = StoreContext::new();

    let view = if ip {
        let source = IpLocation::new(&config.geolocation_url, config.timeout_secs)?;
        render_listing(api, ctx, source, config.nearby_limit, true).await
    } else if let Some(coordinates) = lat_long {
        let source = FixedLocation::Position(coordinates);
        render_listing(api, ctx, source, config.nearby_limit, true).await
    } else {
        render_listing(api, ctx, FixedLocation::Unsupported, config.nearby_limit, false).await
    };
    Ok(view)
}

async fn render_listing<S: LocationSource>(
    api: ApiClient,
    ctx: StoreContext,
    source: S,
    nearby_limit: u32,
    locate: bool,
) -> ListingView {
    let mut listing = ListingController::new(api, ctx, source, nearby_limit);
    listing.mount().await;
    if locate {
        listing.find_my_cafe().await;
    }
    listing.view()
}

/// Mount a detail page. With `lat_long` the session's nearby list is loaded
/// after mount, and the page re-resolves from it when the props had nothing.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub(crate) async fn open_detail(
    config: &ClientConfig,
    id: &str,
    lat_long: Option<Coordinates>,
) -> anyhow::Result<DetailController> {
    let api = api_client(config)?;
    let ctx = StoreContext::new();
    let mut changes = ctx.subscribe();

    let mut detail = DetailController::new(
        api.clone(),
        ctx.clone(),
        id,
        Duration::from_millis(config.poll_interval_ms),
    );
    detail.mount().await;

    if let Some(coordinates) = lat_long {
        let mut listing = ListingController::new(
            api,
            ctx,
            FixedLocation::Position(coordinates),
            config.nearby_limit,
        );
        listing.find_my_cafe().await;
        detail.sync_context(&mut changes).await;
    }
    Ok(detail)
}

/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub(crate) async fn run_show(
    config: &ClientConfig,
    id: &str,
    lat_long: Option<Coordinates>,
    watch_secs: u64,
    vote: bool,
) -> anyhow::Result<()> {
    let mut detail = open_detail(config, id, lat_long).await?;

    if vote && !detail.upvote().await {
        println!("vote not counted for {id}");
    }
    let mut last = detail.view();
    print!("{last}");

    if watch_secs > 0 {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(watch_secs);
        let mut ticker = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
        while tokio::time::Instant::now() < deadline {
            ticker.tick().await;
            let current = detail.view();
            if current != last {
                println!("---");
                print!("{current}");
                last = current;
            }
        }
    }

    detail.unmount();
    Ok(())
}

/// Vote once and describe the result.
///
/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_vote(config: &ClientConfig, id: &str) -> anyhow::Result<String> {
    let api = api_client(config)?;
    let message = match api.favourite_coffee_store(id).await? {
        Some(store) => format!("{} now has {} vote(s)", store.name, store.voting),
        None => format!("{id} has not been stored yet; open it with `nextcoffee show {id}` first"),
    };
    Ok(message)
}
