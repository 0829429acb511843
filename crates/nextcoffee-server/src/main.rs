mod api;
mod middleware;
mod pages;

use std::sync::Arc;

use nextcoffee_core::AppConfig;
use nextcoffee_db::{Datastore, MemoryStore};
use nextcoffee_places::PlacesClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    pages::StaticPages,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nextcoffee_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let datastore = open_datastore(&config).await?;
    let places = PlacesClient::with_base_url(
        &config.places_api_key,
        config.places_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )?;

    let pages = Arc::new(StaticPages::new(config.static_city.clone()));
    match pages.prerender(&places).await {
        Ok(rendered) => tracing::info!(
            city = %config.static_city.name,
            rendered,
            "pre-rendered coffee store pages"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            "pre-render failed; pages will render on first request"
        ),
    }

    let app = build_app(AppState {
        datastore,
        places,
        pages,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "nextcoffee server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn open_datastore(config: &AppConfig) -> anyhow::Result<Datastore> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory datastore, votes are lost on restart");
        return Ok(Datastore::Memory(MemoryStore::new()));
    };

    let pool_config = nextcoffee_db::PoolConfig::from_app_config(config);
    let pool = nextcoffee_db::connect_pool(database_url, pool_config).await?;
    let applied = nextcoffee_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");
    Ok(Datastore::Postgres(pool))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
