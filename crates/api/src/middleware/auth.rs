//! Authentication middleware for protected routes.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "zeitsaldo_session";

/// Session middleware that gates protected routes.
///
/// Looks up the session cookie and rejects missing, unknown, or expired
/// sessions with a JSON 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return unauthorized();
    };

    if state.sessions.validate(cookie.value()).await {
        next.run(request).await
    } else {
        unauthorized()
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "UNAUTHORIZED",
            "message": "A valid login session is required"
        })),
    )
        .into_response()
}
