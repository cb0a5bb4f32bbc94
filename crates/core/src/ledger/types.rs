//! Ledger domain types.
//!
//! This module defines the canonical transaction record and the raw input
//! shapes accepted at the normalization boundary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zeitsaldo_shared::types::{Minutes, TransactionId};

/// Direction of a booking on the time ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Extra time worked; adds to the balance.
    Earned,
    /// Time taken off; subtracts from the balance.
    Spent,
}

impl TransactionKind {
    /// Signed multiplier for balance contributions.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Earned => 1,
            Self::Spent => -1,
        }
    }

    /// Localized label used in exports.
    #[must_use]
    pub const fn label_de(self) -> &'static str {
        match self {
            Self::Earned => "Hinzugefügt",
            Self::Spent => "Abgezogen",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Earned => write!(f, "EARNED"),
            Self::Spent => write!(f, "SPENT"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EARNED" => Ok(Self::Earned),
            "SPENT" => Ok(Self::Spent),
            _ => Err(format!("Unknown transaction kind: {s}")),
        }
    }
}

/// A persisted ledger transaction in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned identifier.
    pub id: TransactionId,
    /// Calendar date of the booking; no time of day is tracked.
    pub date: NaiveDate,
    /// Booking direction.
    pub kind: TransactionKind,
    /// Canonical duration in whole minutes (always positive).
    pub minutes: Minutes,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp; breaks chronological ties between equal dates.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed contribution to any balance.
    #[must_use]
    pub fn signed_minutes(&self) -> Minutes {
        Minutes::new(self.kind.sign() * self.minutes.get())
    }

    /// Decimal-hours view of the duration, derived from the minutes.
    #[must_use]
    pub fn hours(&self) -> Decimal {
        self.minutes.as_hours()
    }
}

/// A validated transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Calendar date of the booking.
    pub date: NaiveDate,
    /// Booking direction.
    pub kind: TransactionKind,
    /// Canonical duration in whole minutes (always positive).
    pub minutes: Minutes,
    /// Free-text description (trimmed, non-empty).
    pub description: String,
}

/// Raw transaction input as it arrives at the normalization boundary.
///
/// The duration may be supplied as integer `minutes` or decimal `hours`;
/// normalization resolves it to canonical minutes exactly once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInput {
    /// Date input, `YYYY-MM-DD` (longer inputs are truncated).
    pub date: String,
    /// Kind input, `EARNED` or `SPENT`.
    pub kind: String,
    /// Duration in whole minutes; authoritative when present.
    #[serde(default)]
    pub minutes: Option<i64>,
    /// Duration in decimal hours; consulted only when `minutes` is absent.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Description input.
    pub description: String,
}

/// Partial update of an existing transaction.
///
/// Only supplied fields are re-validated and replaced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    /// Replacement date input.
    #[serde(default)]
    pub date: Option<String>,
    /// Replacement kind input.
    #[serde(default)]
    pub kind: Option<String>,
    /// Replacement duration in whole minutes.
    #[serde(default)]
    pub minutes: Option<i64>,
    /// Replacement duration in decimal hours.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Replacement description input.
    #[serde(default)]
    pub description: Option<String>,
}
