//! Gateway server: reads configuration, opens the pool, serves the entity routes.
//!
//! Run from repo root: `cargo run -p gateway-server`

use entity_gateway::{connect_pool, gateway_router, AppState, GatewayConfig, PgExecutor};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("entity_gateway=info,gateway_server=info,tower_http=info")),
        )
        .init();

    let pool = connect_pool(&config).await?;
    let state = AppState::new(PgExecutor::new(pool.clone()));
    let app = gateway_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
