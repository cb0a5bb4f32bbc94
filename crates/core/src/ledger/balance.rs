//! Balance and running-balance computation over ledger snapshots.
//!
//! All functions here are pure over the snapshot they are handed; callers
//! refresh the snapshot after mutations before relying on derived values.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use zeitsaldo_shared::types::Minutes;

use super::types::Transaction;

/// Aggregate balance over a snapshot of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// Signed balance in minutes; the source of truth.
    pub minutes: Minutes,
}

impl BalanceSummary {
    /// Decimal-hours view of the balance, for display only.
    #[must_use]
    pub fn hours(&self) -> Decimal {
        self.minutes.as_hours()
    }
}

/// A transaction together with the running balance at its chronological
/// position.
///
/// The running balance is a property of the transaction, not of the display
/// order: re-sorting rows moves them but never changes their value.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Cumulative signed balance up to and including this transaction.
    pub running: Minutes,
}

/// Sums the signed contributions of all transactions.
///
/// The result is independent of list order.
#[must_use]
pub fn total_balance(transactions: &[Transaction]) -> BalanceSummary {
    BalanceSummary {
        minutes: transactions.iter().map(Transaction::signed_minutes).sum(),
    }
}

/// Attaches running balances while preserving the input order.
///
/// Chronological order is ascending `(date, created_at)`; remaining ties
/// keep the input (insertion) order via the stable sort.
#[must_use]
pub fn with_running_balance(transactions: &[Transaction]) -> Vec<LedgerRow> {
    let mut order: Vec<usize> = (0..transactions.len()).collect();
    order.sort_by_key(|&index| chronological_key(&transactions[index]));

    let mut attached = vec![Minutes::ZERO; transactions.len()];
    let mut running = Minutes::ZERO;
    for index in order {
        running += transactions[index].signed_minutes();
        attached[index] = running;
    }

    transactions
        .iter()
        .cloned()
        .zip(attached)
        .map(|(transaction, running)| LedgerRow {
            transaction,
            running,
        })
        .collect()
}

/// Rows in chronological order with running balances attached.
#[must_use]
pub fn chronological_rows(transactions: &[Transaction]) -> Vec<LedgerRow> {
    let mut rows = with_running_balance(transactions);
    rows.sort_by_key(|row| chronological_key(&row.transaction));
    rows
}

fn chronological_key(transaction: &Transaction) -> (NaiveDate, DateTime<Utc>) {
    (transaction.date, transaction.created_at)
}
