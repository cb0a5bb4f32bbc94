//! Atomic JSON collection IO.
//!
//! Collections are whole JSON files; writes go to a temp file in the same
//! directory and are renamed into place so a crash never leaves a
//! half-written collection behind.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::StoreError;

/// Reads a JSON collection, returning the default value when the file does
/// not exist yet.
pub(crate) async fn read_collection<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// Writes a JSON collection atomically (temp file + rename).
pub(crate) async fn write_collection<T>(path: &Path, data: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(data)?;
    tokio::fs::write(&temp, &bytes).await?;

    if let Err(e) = tokio::fs::rename(&temp, path).await {
        // Best effort: do not leave the temp file around on failure.
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(StoreError::Io(e));
    }

    Ok(())
}
