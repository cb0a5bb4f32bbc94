//! JSON document store adapter for Zeitsaldo.
//!
//! A thin persistence façade: whole-file JSON collections with atomic
//! writes, plus the legacy-schema migration at the read boundary. Business
//! invariants are enforced by the ledger engine before anything reaches
//! this crate.

pub mod credentials;
mod file;
pub mod transactions;

pub use credentials::CredentialStore;
pub use transactions::TransactionStore;

use thiserror::Error;
use zeitsaldo_shared::types::TransactionId;

/// Errors raised by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted document no longer satisfies the ledger invariants.
    #[error("corrupt document {id}: {reason}")]
    InvalidDocument {
        /// Identifier of the offending document.
        id: TransactionId,
        /// What failed while migrating it to canonical form.
        reason: String,
    },
}
