//! On-disk response-snapshot stores
//!
//! Each named store is a directory under the cache root. Entries are keyed
//! by the SHA-256 of the request URL: `<key>.bin` holds the body and
//! `<key>.json` a metadata sidecar. Stores are safe for concurrent
//! readers/writers at the entry level; the two files for an entry are
//! written body-first so a reader never sees metadata without its body.

use crate::error::{VibesError, VibesResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Store name for the immutable application shell
pub const STATIC_STORE: &str = "study-vibes-static-v1";

/// Store name for opportunistically cached runtime requests
pub const DYNAMIC_STORE: &str = "study-vibes-dynamic-v1";

/// Stores belonging to the current worker version; anything else found at
/// the cache root is purged on activation
pub const CURRENT_STORES: [&str; 2] = [STATIC_STORE, DYNAMIC_STORE];

/// A stored response snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Sidecar metadata persisted next to the body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    content_type: Option<String>,
    stored_at: DateTime<Utc>,
}

/// Summary of one cached entry, for display
#[derive(Debug, Clone)]
pub struct EntryInfo {
    pub url: String,
    pub stored_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// One named cache store
#[derive(Debug, Clone)]
pub struct CacheStore {
    name: String,
    dir: PathBuf,
}

/// Hex SHA-256 of a request URL, used as the entry key
fn entry_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

impl CacheStore {
    /// Open a store under `root`, creating its directory lazily on first
    /// write.
    pub fn open(root: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: root.join(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.bin"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Look up a snapshot by URL
    pub async fn get(&self, url: &str) -> VibesResult<Option<ResponseSnapshot>> {
        let key = entry_key(url);
        let meta_path = self.meta_path(key.as_str());

        let meta_content = match fs::read_to_string(&meta_path).await {
            Ok(c) => c,
            Err(_) => return Ok(None),
        };
        let meta: EntryMeta = match serde_json::from_str(&meta_content) {
            Ok(m) => m,
            Err(e) => {
                // Corrupt sidecar counts as a miss
                debug!("Corrupt cache metadata for {url}: {e}");
                return Ok(None);
            }
        };

        let body = fs::read(self.body_path(key.as_str()))
            .await
            .map_err(|e| VibesError::io(format!("reading cache body for {url}"), e))?;

        Ok(Some(ResponseSnapshot {
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            body,
        }))
    }

    /// Store a snapshot, overwriting any previous entry for the URL
    pub async fn put(&self, snapshot: &ResponseSnapshot) -> VibesResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            VibesError::CacheStoreCreate {
                name: self.name.clone(),
                reason: e.to_string(),
            }
        })?;

        let key = entry_key(&snapshot.url);
        fs::write(self.body_path(key.as_str()), &snapshot.body)
            .await
            .map_err(|e| VibesError::io(format!("writing cache body for {}", snapshot.url), e))?;

        let meta = EntryMeta {
            url: snapshot.url.clone(),
            status: snapshot.status,
            content_type: snapshot.content_type.clone(),
            stored_at: Utc::now(),
        };
        fs::write(
            self.meta_path(key.as_str()),
            serde_json::to_string_pretty(&meta)?,
        )
        .await
        .map_err(|e| VibesError::io(format!("writing cache metadata for {}", snapshot.url), e))?;

        debug!("Cached {} in {}", snapshot.url, self.name);
        Ok(())
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.meta_path(entry_key(url).as_str()).exists()
    }

    /// List all entries in the store
    pub async fn entries(&self) -> VibesResult<Vec<EntryInfo>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }

        let mut infos = vec![];
        let mut dir = fs::read_dir(&self.dir)
            .await
            .map_err(|e| VibesError::io(format!("reading store {}", self.name), e))?;

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| VibesError::io("reading store entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let Ok(content) = fs::read_to_string(&path).await else {
                    continue;
                };
                let Ok(meta) = serde_json::from_str::<EntryMeta>(&content) else {
                    continue;
                };
                let key = entry_key(&meta.url);
                let size_bytes = fs::metadata(self.body_path(key.as_str()))
                    .await
                    .map(|m| m.len())
                    .unwrap_or(0);
                infos.push(EntryInfo {
                    url: meta.url,
                    stored_at: meta.stored_at,
                    size_bytes,
                });
            }
        }

        infos.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(infos)
    }

    /// Remove entries stored more than `days` days ago. Returns how many
    /// were removed.
    pub async fn remove_older_than(&self, days: u32) -> VibesResult<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let mut removed = 0;

        for info in self.entries().await? {
            if info.stored_at < cutoff {
                let key = entry_key(&info.url);
                let _ = fs::remove_file(self.body_path(key.as_str())).await;
                let _ = fs::remove_file(self.meta_path(key.as_str())).await;
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Delete the whole store directory
    pub async fn clear(&self) -> VibesResult<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)
                .await
                .map_err(|e| VibesError::io(format!("clearing store {}", self.name), e))?;
        }
        Ok(())
    }
}

/// List the store directory names present under the cache root
pub async fn list_store_dirs(root: &Path) -> VibesResult<Vec<String>> {
    if !root.exists() {
        return Ok(vec![]);
    }

    let mut names = vec![];
    let mut dir = fs::read_dir(root)
        .await
        .map_err(|e| VibesError::io("reading cache root", e))?;

    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| VibesError::io("reading cache root entry", e))?
    {
        if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot(url: &str, body: &[u8]) -> ResponseSnapshot {
        ResponseSnapshot {
            url: url.to_string(),
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: body.to_vec(),
        }
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::open(temp.path(), STATIC_STORE);
        assert!(store.get("https://example.com/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::open(temp.path(), STATIC_STORE);

        let snap = snapshot("https://example.com/a", b"hello");
        store.put(&snap).await.unwrap();

        let loaded = store.get("https://example.com/a").await.unwrap().unwrap();
        assert_eq!(loaded, snap);
        assert!(store.contains("https://example.com/a").await);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::open(temp.path(), DYNAMIC_STORE);

        store.put(&snapshot("https://example.com/a", b"v1")).await.unwrap();
        store.put(&snapshot("https://example.com/a", b"v2")).await.unwrap();

        let loaded = store.get("https://example.com/a").await.unwrap().unwrap();
        assert_eq!(loaded.body, b"v2");
        assert_eq!(store.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_meta_counts_as_miss() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::open(temp.path(), DYNAMIC_STORE);
        store.put(&snapshot("https://example.com/a", b"x")).await.unwrap();

        let key = entry_key("https://example.com/a");
        tokio::fs::write(store.dir().join(format!("{key}.json")), "{oops")
            .await
            .unwrap();

        assert!(store.get("https://example.com/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn entries_report_size() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::open(temp.path(), DYNAMIC_STORE);
        store
            .put(&snapshot("https://example.com/b", b"12345"))
            .await
            .unwrap();

        let entries = store.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size_bytes, 5);
    }

    #[tokio::test]
    async fn list_store_dirs_sorted() {
        let temp = TempDir::new().unwrap();
        CacheStore::open(temp.path(), DYNAMIC_STORE)
            .put(&snapshot("https://example.com/a", b"x"))
            .await
            .unwrap();
        CacheStore::open(temp.path(), "study-vibes-static-v0")
            .put(&snapshot("https://example.com/a", b"x"))
            .await
            .unwrap();

        let names = list_store_dirs(temp.path()).await.unwrap();
        assert_eq!(names, vec!["study-vibes-dynamic-v1", "study-vibes-static-v0"]);
    }
}
