// src/lib.rs
pub mod routes;
pub mod handlers;
pub mod models;
pub mod database;
pub mod middleware;
pub mod state;
pub mod dtos;
pub mod error;
pub mod auth;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

/// Full application router with CORS applied; the dashboard runs on a
/// separate origin.
pub fn app(state: state::AppState) -> Router {
    routes::create_router()
        .route("/", get(|| async { "Isoko API" }))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
