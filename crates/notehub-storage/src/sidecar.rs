//! JSON sidecar IO.
//!
//! Reads are lenient: a missing, unreadable or malformed sidecar yields
//! `None` so that callers skip the entry instead of failing a whole listing.
//! Writes are strict.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use notehub_core::result::AppResult;
use notehub_core::traits::storage::StorageProvider;

/// Read and decode a JSON sidecar, or `None` if absent or invalid.
pub async fn read_json<T: DeserializeOwned>(provider: &dyn StorageProvider, path: &str) -> Option<T> {
    let bytes = match provider.read_bytes(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => return None,
        Err(e) => {
            warn!(path, error = %e, "Unreadable sidecar skipped");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path, error = %e, "Malformed sidecar skipped");
            None
        }
    }
}

/// Read a UTF-8 artifact, or `None` if absent or unreadable.
pub async fn read_text(provider: &dyn StorageProvider, path: &str) -> Option<String> {
    match provider.read_to_string(path).await {
        Ok(text) => Some(text),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            warn!(path, error = %e, "Unreadable artifact skipped");
            None
        }
    }
}

/// Encode and write a JSON sidecar.
pub async fn write_json<T: Serialize + ?Sized>(
    provider: &dyn StorageProvider,
    path: &str,
    value: &T,
) -> AppResult<()> {
    let data = serde_json::to_vec_pretty(value)?;
    provider.write(path, Bytes::from(data)).await
}
