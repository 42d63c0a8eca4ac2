//! Kang-Mas Shop backend
//!
//! A small storefront combined with a manual double-entry bookkeeping
//! module: journal entries mutate account balances atomically, reports
//! derive from those balances, and the order flow posts sales journals on
//! completion.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod seed;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::DbPool;
use crate::services::AppServices;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: AppServices,
}

/// Builds the full application router.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1/accounts", handlers::accounts::routes())
        .nest("/api/v1/journals", handlers::journals::routes())
        .nest("/api/v1/templates", handlers::templates::routes())
        .nest("/api/v1/reports", handlers::reports::routes())
        .nest("/api/v1/products", handlers::products::routes())
        .nest("/api/v1/cart", handlers::cart::routes())
        .nest("/api/v1/checkout", handlers::checkout::routes())
        .nest("/api/v1/orders", handlers::orders::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .with_state(state)
}
