//! Overtime ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Canonical transaction types and the minute unit
//! - Input validation and unit normalization
//! - Total and running balance computation
//! - CSV import with per-row error isolation, and CSV export
//! - Monthly reports against working-time targets

pub mod balance;
pub mod csv;
pub mod normalize;
pub mod report;
pub mod types;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod normalize_props;

pub use balance::{
    BalanceSummary, LedgerRow, chronological_rows, total_balance, with_running_balance,
};
pub use csv::{
    CsvImportError, ImportCandidate, ImportReport, ParsedImport, RowError, filter_date_range,
    parse_import, render_export,
};
pub use normalize::{DurationInput, ValidationError, apply_patch, normalize, resolve_duration};
pub use report::{MonthReport, ReportError, ReportTargets, month_report};
pub use types::{NewTransaction, Transaction, TransactionInput, TransactionKind, TransactionPatch};
