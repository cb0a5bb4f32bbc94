//! Transaction management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use zeitsaldo_core::ledger::{
    self, RowError, Transaction, TransactionInput, TransactionKind, TransactionPatch,
};
use zeitsaldo_shared::types::{Minutes, TransactionId};

use crate::AppState;
use crate::error::ApiError;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/balance", get(balance))
        .route("/transactions/import", post(import_csv))
        .route("/transactions/export", get(export_csv))
        .route("/transactions/{transaction_id}", put(update_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a single transaction.
///
/// Always carries the consistent derived pair: canonical minutes plus the
/// hours view computed from them.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: TransactionId,
    /// Calendar date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Booking direction.
    pub kind: TransactionKind,
    /// Canonical duration in minutes.
    pub minutes: Minutes,
    /// Derived decimal-hours view.
    pub hours: Decimal,
    /// Description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        let hours = transaction.hours();
        Self {
            id: transaction.id,
            date: transaction.date,
            kind: transaction.kind,
            minutes: transaction.minutes,
            hours,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}

/// Response row for the history listing.
#[derive(Debug, Serialize)]
pub struct LedgerRowResponse {
    /// The transaction fields.
    #[serde(flatten)]
    pub transaction: TransactionResponse,
    /// Running balance in minutes at this row's chronological position.
    pub running_minutes: Minutes,
}

/// Query parameters for the CSV export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Inclusive start date.
    pub from: Option<NaiveDate>,
    /// Inclusive end date.
    pub to: Option<NaiveDate>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /transactions - Chronological rows with running balances attached.
async fn list_transactions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.transactions.list().await?;
    let rows: Vec<LedgerRowResponse> = ledger::chronological_rows(&transactions)
        .into_iter()
        .map(|row| LedgerRowResponse {
            running_minutes: row.running,
            transaction: row.transaction.into(),
        })
        .collect();

    Ok(Json(json!({ "transactions": rows })))
}

/// GET /transactions/balance - Current total balance.
async fn balance(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.transactions.list().await?;
    let summary = ledger::total_balance(&transactions);

    Ok(Json(json!({
        "balance_minutes": summary.minutes,
        "balance_hours": summary.hours(),
    })))
}

/// POST /transactions - Validate and persist a new transaction.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<TransactionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let record = ledger::normalize(&payload)?;
    let created = state.transactions.create(record).await?;
    info!(transaction_id = %created.id, "transaction created");

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(created))))
}

/// PUT /transactions/{transaction_id} - Partial update with re-validation.
async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
    Json(payload): Json<TransactionPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(existing) = state.transactions.find(transaction_id).await? else {
        return Err(ApiError::entry_not_found());
    };

    let updated = ledger::apply_patch(&existing, &payload)?;
    let Some(stored) = state.transactions.update(transaction_id, updated).await? else {
        return Err(ApiError::entry_not_found());
    };
    info!(transaction_id = %transaction_id, "transaction updated");

    Ok(Json(TransactionResponse::from(stored)))
}

/// DELETE /transactions/{transaction_id} - Remove a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, ApiError> {
    if state.transactions.delete(transaction_id).await? {
        info!(transaction_id = %transaction_id, "transaction deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::entry_not_found())
    }
}

/// POST /transactions/import - Bulk CSV import with per-row isolation.
///
/// Rows that fail validation or persistence are reported alongside the
/// successes; one bad row never aborts the batch.
async fn import_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let parsed = ledger::parse_import(&body)?;
    let mut errors = parsed.errors;
    let mut imported = 0_usize;

    for candidate in parsed.candidates {
        match state.transactions.create(candidate.record).await {
            Ok(_) => imported += 1,
            Err(e) => errors.push(RowError {
                row: candidate.row,
                reason: format!("could not be saved: {e}"),
            }),
        }
    }

    errors.sort_by_key(|error| error.row);
    info!(imported, rejected = errors.len(), "csv import finished");

    Ok(Json(ledger::ImportReport { imported, errors }))
}

/// GET /transactions/export - Localized CSV statement.
async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.transactions.list().await?;
    let filtered = ledger::filter_date_range(&transactions, query.from, query.to);
    let body = ledger::render_export(&ledger::chronological_rows(&filtered));

    let filename = match (query.from, query.to) {
        (None, None) => "zeitsaldo.csv".to_string(),
        (from, to) => format!(
            "zeitsaldo-{}-{}.csv",
            from.map_or_else(|| "anfang".to_string(), |d| d.to_string()),
            to.map_or_else(|| "ende".to_string(), |d| d.to_string()),
        ),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
