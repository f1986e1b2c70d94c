use std::path::Path;

use anyhow::Result;
use tracing::warn;

use hayah_core::cookie_store::StoredCookie;

/// Persisted cookies; a missing or unreadable file means no session
pub async fn read(path: &Path) -> Result<Vec<StoredCookie>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(cookies) => Ok(cookies),
            Err(e) => {
                warn!(path = %path.display(), "discarding corrupt session file: {}", e);
                Ok(Vec::new())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub async fn write(path: &Path, cookies: &[StoredCookie]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(cookies)?;
    crate::write_atomic(path, &bytes).await
}
