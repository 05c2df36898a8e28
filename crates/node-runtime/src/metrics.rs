//! Prometheus scrape endpoint.
//!
//! Served on its own port so the public gateway never exposes it.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use steel_telemetry::{encode_metrics, log_event};

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(scrape))
}

async fn scrape() -> Response {
    match encode_metrics() {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Serve `/metrics` on `port` until `shutdown` resolves.
pub async fn serve_metrics(
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {addr}"))?;
    log_event!(info, "node-runtime", "Metrics listener started", addr = %addr);
    axum::serve(listener, metrics_router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("metrics listener stopped")
}
