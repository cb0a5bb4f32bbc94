//! Monthly report routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use zeitsaldo_core::ledger;

use crate::AppState;
use crate::error::ApiError;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/{year}/{month}", get(month_report))
}

/// GET /reports/{year}/{month} - Aggregated month view against targets.
async fn month_report(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.transactions.list().await?;
    let report = ledger::month_report(&transactions, year, month, &state.targets)?;

    Ok(Json(report))
}
