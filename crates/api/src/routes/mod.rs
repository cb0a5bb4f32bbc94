//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod health;
pub mod reports;
pub mod transactions;

/// Creates the API router with public and session-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything below the health and login surface requires a session.
    let protected_routes = Router::new()
        .merge(transactions::routes())
        .merge(reports::routes())
        .merge(auth::protected_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
