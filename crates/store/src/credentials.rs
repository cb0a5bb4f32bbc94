//! Credential document holding the application password hash.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{StoreError, file};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,
}

/// Document store for the single application credential.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a handle for the credential document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the persisted password hash, if any.
    pub async fn load(&self) -> Result<Option<String>, StoreError> {
        let document: CredentialDocument = file::read_collection(&self.path).await?;
        Ok(document.password_hash)
    }

    /// Persists a new password hash.
    pub async fn save(&self, password_hash: &str) -> Result<(), StoreError> {
        let document = CredentialDocument {
            password_hash: Some(password_hash.to_string()),
        };
        file::write_collection(&self.path, &document).await
    }
}
