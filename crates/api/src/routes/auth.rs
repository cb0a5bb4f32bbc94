//! Authentication routes for login, logout, session status, and password
//! rotation.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use zeitsaldo_core::auth::AppPassword;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::SESSION_COOKIE;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/status", get(status))
}

/// Creates the session-protected auth router.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/password", post(change_password))
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// The application password.
    pub password: String,
}

/// Request body for password rotation.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password.
    pub old_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// POST /auth/login - Verify the password and issue a session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.password.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "MISSING_PASSWORD",
            "password is required",
        ));
    }

    let credential = AppPassword::from_hash(state.password_hash.read().await.clone())?;
    if !credential.verify(&payload.password)? {
        warn!("failed login attempt");
        return Err(ApiError::unauthorized("invalid password"));
    }

    let token = state.sessions.issue().await;
    info!("login successful");

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

/// POST /auth/logout - Revoke the session and clear the cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value()).await;
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(json!({ "success": true })))
}

/// GET /auth/status - Report whether the session is authenticated.
async fn status(State(state): State<AppState>, jar: CookieJar) -> Json<serde_json::Value> {
    let authenticated = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.validate(cookie.value()).await,
        None => false,
    };

    Json(json!({ "authenticated": authenticated }))
}

/// POST /auth/password - Rotate the application password.
async fn change_password(
    State(state): State<AppState>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let current = AppPassword::from_hash(state.password_hash.read().await.clone())?;
    if !current.verify(&payload.old_password)? {
        return Err(ApiError::unauthorized("current password is incorrect"));
    }

    let replacement = AppPassword::create(&payload.new_password)?;
    state.credentials.save(replacement.hash()).await?;
    *state.password_hash.write().await = replacement.hash().to_string();
    info!("application password rotated");

    Ok(Json(json!({ "success": true })))
}
