pub mod auth;
pub mod admin;
pub mod retailer;
pub mod wholesaler;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .nest("/admin", admin::routes())
        .nest("/retailer", retailer::routes())
        .nest("/wholesaler", wholesaler::routes())
}
