//! HTTP API
//!
//! Route registration and middleware assembly. Public routes (login,
//! refresh, logout, health) skip authentication; everything else goes
//! through the cookie-auth middleware, with per-group role checks.

pub mod auth;
pub mod health;
pub mod locations;
pub mod products;
pub mod sales;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Build a router with all routes registered
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(sales::router())
        .merge(products::router())
        .merge(locations::router())
        .merge(users::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(auth::router())
        .merge(health::router())
        .merge(protected)
}

/// Build a fully configured application with middleware and state
pub fn build_app(state: &ServerState) -> Router {
    build_router(state)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
}
