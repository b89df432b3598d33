use axum::{
    routing::get,
    Router,
};
use crate::state::AppState;
use crate::handlers::admin;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::get_dashboard))
        .route("/customers", get(admin::get_customers))
        .route("/retailers", get(admin::get_retailers).post(admin::create_retailer))
        .route("/wholesalers", get(admin::get_wholesalers).post(admin::create_wholesaler))
        .route("/categories", get(admin::get_categories))
        .route_layer(axum::middleware::from_fn(require_auth))
}
