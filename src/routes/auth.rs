use axum::{Router, routing::{get, post}, middleware};
use crate::state::AppState;
use crate::handlers::auth::{login, me};
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    let open = Router::new()
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
