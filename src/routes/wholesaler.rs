use axum::{
    routing::{get, post, put},
    Router,
};
use crate::state::AppState;
use crate::handlers::{credit, supplier, wholesaler};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(wholesaler::get_dashboard_stats))
        .route("/inventory", get(wholesaler::get_inventory).post(wholesaler::create_product))
        .route("/inventory/stats", get(wholesaler::get_inventory_stats))
        .route("/inventory/categories", get(wholesaler::get_categories))
        .route("/retailer-orders", get(wholesaler::get_retailer_orders))
        .route("/retailer-orders/{id}/status", put(wholesaler::update_order_status))
        .route("/retailers", get(wholesaler::get_retailers))
        .route("/retailers/stats", get(wholesaler::get_retailer_stats))
        .route("/credit-requests", get(credit::get_credit_requests))
        .route("/credit-requests/{id}/approve", post(credit::approve_credit_request))
        .route("/credit-requests/{id}/reject", post(credit::reject_credit_request))
        .route("/suppliers", get(supplier::get_suppliers))
        .route("/supplier-orders", get(supplier::get_supplier_orders))
        .route_layer(axum::middleware::from_fn(require_auth))
}
