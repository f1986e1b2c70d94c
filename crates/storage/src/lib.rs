use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use hayah_core::CookieJar;

mod cache_entries;
mod session_file;

pub use cache_entries::CacheEntry;

const COOKIES_FILE: &str = "cookies.json";
const CACHE_FILE: &str = "cache.json";

/// Client-side persisted state: the session cookie file and the
/// freshness-stamped cache that stands in for browser local storage.
#[derive(Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "opened local storage");
        Ok(Self { dir })
    }

    fn cookies_path(&self) -> PathBuf {
        self.dir.join(COOKIES_FILE)
    }

    fn cache_path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE)
    }

    /// Fill `jar` with the persisted cookies that have not expired yet
    pub async fn load_cookies(&self, jar: &CookieJar) -> Result<()> {
        let cookies = session_file::read(&self.cookies_path()).await?;
        debug!(count = cookies.len(), "loaded cookies");
        jar.restore(cookies);
        Ok(())
    }

    pub async fn save_cookies(&self, jar: &CookieJar) -> Result<()> {
        session_file::write(&self.cookies_path(), &jar.snapshot()).await
    }

    /// Cached value for `key` if it was stored less than `max_age` ago
    pub async fn cache_get<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<T>> {
        let entries = cache_entries::read(&self.cache_path()).await?;
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };

        if !entry.is_fresh(max_age, chrono::Utc::now()) {
            debug!(key, stored_at = %entry.stored_at, "cache entry is stale");
            return Ok(None);
        }

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, "cache entry does not decode, treating as a miss: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn cache_put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.cache_path();
        let mut entries = cache_entries::read(&path).await?;
        entries.insert(
            key.to_string(),
            CacheEntry {
                stored_at: chrono::Utc::now(),
                value: serde_json::to_value(value)?,
            },
        );
        cache_entries::write(&path, &entries).await
    }

    pub async fn cache_remove(&self, key: &str) -> Result<()> {
        let path = self.cache_path();
        let mut entries = cache_entries::read(&path).await?;
        if entries.remove(key).is_some() {
            cache_entries::write(&path, &entries).await?;
        }
        Ok(())
    }

    /// Drop every cached entry (used on logout)
    pub async fn cache_clear(&self) -> Result<()> {
        cache_entries::write(&self.cache_path(), &Default::default()).await
    }
}

/// Write to a sibling temp file, then rename over `path`
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
