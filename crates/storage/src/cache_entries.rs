use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub stored_at: chrono::DateTime<chrono::Utc>,
    pub value: serde_json::Value,
}

impl CacheEntry {
    /// Fresh while strictly younger than `max_age`
    pub fn is_fresh(&self, max_age: chrono::Duration, now: chrono::DateTime<chrono::Utc>) -> bool {
        now - self.stored_at < max_age
    }
}

/// Read all cache entries; a missing or unreadable file is an empty cache
pub async fn read(path: &Path) -> Result<HashMap<String, CacheEntry>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %path.display(), "discarding corrupt cache file: {}", e);
                Ok(HashMap::new())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

pub async fn write(path: &Path, entries: &HashMap<String, CacheEntry>) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(entries)?;
    crate::write_atomic(path, &bytes).await
}
