use axum::{
    routing::{get, post, put},
    Router,
};
use crate::state::AppState;
use crate::handlers::{pos, retailer};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(retailer::get_dashboard_stats))
        .route("/inventory", get(retailer::get_inventory).post(retailer::create_product))
        .route("/inventory/{id}", put(retailer::update_product))
        .route("/orders", get(retailer::get_orders).post(retailer::create_order))
        .route("/branches", get(retailer::get_branches).post(retailer::create_branch))
        .route("/wallet", get(retailer::get_wallet))
        .route("/credit-requests", post(retailer::create_credit_request))
        .route("/pos/products", get(pos::get_pos_products))
        .route("/pos/scan", post(pos::scan_barcode))
        .route("/pos/sale", post(pos::create_sale))
        .route("/pos/daily-sales", get(pos::get_daily_sales))
        .route("/wholesale/products", get(retailer::get_wholesale_products))
        .route_layer(axum::middleware::from_fn(require_auth))
}
