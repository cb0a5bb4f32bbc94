//! Transaction collection backed by a JSON document file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use zeitsaldo_core::ledger::normalize;
use zeitsaldo_core::ledger::{NewTransaction, Transaction, TransactionKind};
use zeitsaldo_shared::types::TransactionId;

use crate::{StoreError, file};

/// A transaction document as persisted on disk.
///
/// Legacy documents carry a decimal `hours` field instead of integer
/// `minutes`; the read path derives canonical minutes through the same
/// conversion the rest of the system uses. Newly written documents always
/// carry `minutes` only, so the two fields can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionDocument {
    id: TransactionId,
    date: String,
    kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours: Option<Decimal>,
    description: String,
    created_at: DateTime<Utc>,
}

impl TransactionDocument {
    fn from_canonical(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            date: transaction.date.to_string(),
            kind: transaction.kind,
            minutes: Some(transaction.minutes.get()),
            hours: None,
            description: transaction.description.clone(),
            created_at: transaction.created_at,
        }
    }

    /// Migrates the document to canonical form at the read boundary.
    fn into_canonical(self) -> Result<Transaction, StoreError> {
        let invalid = |reason: String| StoreError::InvalidDocument {
            id: self.id,
            reason,
        };

        let date =
            normalize::validate_date(&self.date).map_err(|e| invalid(e.to_string()))?;
        let minutes = normalize::resolve_duration(self.minutes, self.hours)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Transaction {
            id: self.id,
            date,
            kind: self.kind,
            minutes,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

/// Document store for ledger transactions.
///
/// The whole collection lives in one JSON file; mutations update the
/// in-memory copy and persist the file before returning. Readers get
/// snapshots in insertion order.
#[derive(Debug)]
pub struct TransactionStore {
    path: PathBuf,
    documents: RwLock<Vec<TransactionDocument>>,
}

impl TransactionStore {
    /// Opens (or initializes) the collection at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let documents: Vec<TransactionDocument> = file::read_collection(&path).await?;
        debug!(
            count = documents.len(),
            path = %path.display(),
            "transaction collection loaded"
        );

        Ok(Self {
            path,
            documents: RwLock::new(documents),
        })
    }

    /// All transactions in insertion order, migrated to canonical form.
    pub async fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .cloned()
            .map(TransactionDocument::into_canonical)
            .collect()
    }

    /// Looks up a single transaction.
    pub async fn find(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .find(|document| document.id == id)
            .cloned()
            .map(TransactionDocument::into_canonical)
            .transpose()
    }

    /// Persists a validated record, assigning its identity and creation
    /// timestamp.
    pub async fn create(&self, record: NewTransaction) -> Result<Transaction, StoreError> {
        let transaction = Transaction {
            id: TransactionId::new(),
            date: record.date,
            kind: record.kind,
            minutes: record.minutes,
            description: record.description,
            created_at: Utc::now(),
        };

        let mut documents = self.documents.write().await;
        documents.push(TransactionDocument::from_canonical(&transaction));
        self.persist(&documents).await?;

        Ok(transaction)
    }

    /// Replaces an existing transaction; `None` when the id is unknown.
    pub async fn update(
        &self,
        id: TransactionId,
        updated: Transaction,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut documents = self.documents.write().await;
        let Some(position) = documents.iter().position(|document| document.id == id) else {
            return Ok(None);
        };

        documents[position] = TransactionDocument::from_canonical(&updated);
        self.persist(&documents).await?;

        Ok(Some(updated))
    }

    /// Deletes a transaction; `false` when the id is unknown.
    pub async fn delete(&self, id: TransactionId) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|document| document.id != id);
        if documents.len() == before {
            return Ok(false);
        }

        self.persist(&documents).await?;
        Ok(true)
    }

    async fn persist(&self, documents: &[TransactionDocument]) -> Result<(), StoreError> {
        file::write_collection(&self.path, documents).await
    }
}
