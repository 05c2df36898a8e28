//! HTTP server lifecycle.

use crate::domain::{GatewayConfig, GatewayError};
use crate::router::{build_router, AppState};
use std::future::Future;
use steel_telemetry::log_event;
use tokio::net::TcpListener;

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve<F>(config: &GatewayConfig, state: AppState, shutdown: F) -> Result<(), GatewayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind { addr, source })?;
    log_event!(info, "api-gateway", "HTTP API listening", addr = %addr);

    axum::serve(listener, build_router(state, config))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(GatewayError::Serve)?;

    log_event!(info, "api-gateway", "HTTP API stopped");
    Ok(())
}
