//! Route table and shared handler state.

use crate::domain::GatewayConfig;
use crate::handlers::{auth, mappings, products, rewards, stock, system, users};
use crate::middleware::create_cors_layer;
use axum::routing::{delete, get, post, put};
use axum::Router;
use sc_01_identity::IdentityApi;
use sc_02_otp_auth::OtpAuthApi;
use sc_03_stock_ledger::StockLedgerApi;
use sc_04_rewards::RewardApi;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Subsystem handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityApi>,
    pub auth: Arc<dyn OtpAuthApi>,
    pub ledger: Arc<dyn StockLedgerApi>,
    pub rewards: Arc<dyn RewardApi>,
}

/// Builds the full router with its middleware stack.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    api_routes()
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(create_cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(mapping_routes())
        .merge(stock_routes())
        .merge(product_routes())
        .merge(reward_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/send-code", post(auth::send_code))
        .route("/auth/verify-code", post(auth::verify_code))
        .route("/auth/verify-token", post(auth::verify_token))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/profile", get(auth::profile))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::provision))
        .route("/users/barbenders", get(users::barbenders))
        .route("/users/:id/status", put(users::set_status))
        .route("/users/:id/qr", get(users::qr))
}

fn mapping_routes() -> Router<AppState> {
    Router::new()
        .route("/mappings", post(mappings::map).get(mappings::list))
        .route("/mappings/unmapped-dealers", get(mappings::unmapped_dealers))
        .route("/mappings/asos", get(mappings::asos))
        .route("/mappings/reconcile", post(mappings::reconcile))
        .route("/mappings/:dealer_id", delete(mappings::unmap))
}

fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/stock/aso/dealers", get(stock::assigned_dealers))
        .route("/stock/dispatch", post(stock::dispatch))
        .route("/stock/dispatch/:id", get(stock::get_dispatch))
        .route("/stock/dispatch/:id/cancel", post(stock::cancel))
        .route("/stock/receive/:id", put(stock::receive))
        .route("/stock/dispatches", get(stock::dispatches))
        .route("/stock/summary", get(stock::summary))
        .route("/stock/daily", get(stock::daily))
        .route("/stock/sell", post(stock::sell))
        .route("/stock/sales", get(stock::sales))
        .route("/stock/purchases", post(stock::record_purchase).get(stock::purchases))
        .route("/stock/ledger", get(stock::ledger_history))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/seed-sample", post(products::seed_sample))
        .route(
            "/products/:id",
            get(products::get_one)
                .put(products::update)
                .delete(products::deactivate),
        )
}

fn reward_routes() -> Router<AppState> {
    Router::new()
        .route("/rewards/summary", get(rewards::summary))
        .route("/rewards/claim", post(rewards::claim))
        .route("/rewards/history", get(rewards::history))
}
