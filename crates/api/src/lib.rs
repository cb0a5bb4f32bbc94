//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Session-cookie authentication middleware
//! - Request/response types and error mapping

pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use zeitsaldo_core::ledger::ReportTargets;
use zeitsaldo_store::{CredentialStore, TransactionStore};

use crate::session::SessionService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Transaction document store.
    pub transactions: Arc<TransactionStore>,
    /// Credential document store.
    pub credentials: Arc<CredentialStore>,
    /// Current application password hash.
    pub password_hash: Arc<RwLock<String>>,
    /// Active login sessions.
    pub sessions: Arc<SessionService>,
    /// Working-time targets for reports.
    pub targets: ReportTargets,
}

/// Creates the main application router.
///
/// The browser client sends credentialed requests, so CORS is restricted to
/// the configured frontend origin.
///
/// # Errors
///
/// Returns an error if the frontend origin is not a valid header value.
pub fn create_router(
    state: AppState,
    frontend_origin: &str,
) -> Result<Router, axum::http::header::InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
