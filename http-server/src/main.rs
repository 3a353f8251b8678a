use anyhow::Context;
use core_library::db::{create_pool, DatabaseConfig};
use core_library::repositories::SqliteSongRepository;
use core_runtime::config::CoreConfig;
use core_runtime::logging::{init_logging, redact_if_sensitive, LoggingConfig};
use core_service::{HttpTrackInfoProvider, SongService};
use http_server::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CoreConfig::from_env().context("Failed to load configuration")?;

    let mut logging = LoggingConfig::for_environment(config.environment);
    if let Ok(filter) = std::env::var("RUST_LOG") {
        logging = logging.with_filter(filter);
    }
    init_logging(logging).context("Failed to initialize logging")?;

    info!(
        environment = %config.environment,
        database_url = %redact_if_sensitive("database_url", &config.database_url),
        "Starting songs server"
    );

    let db_config = DatabaseConfig::new(config.database_url.clone())
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout);
    let pool = create_pool(db_config)
        .await
        .context("Failed to open song database")?;

    let repository = Arc::new(SqliteSongRepository::new(pool.clone()));
    let mut service = SongService::new(repository);
    match &config.track_info_url {
        Some(url) => {
            let provider =
                HttpTrackInfoProvider::new(url.clone()).context("Failed to build track info client")?;
            info!(
                url = %redact_if_sensitive("track_info_url", url),
                "Track info enrichment enabled"
            );
            service = service.with_track_info(Arc::new(provider));
        }
        None => info!("Track info enrichment disabled"),
    }

    let app = router(AppState::new(service, pool.clone()));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
