// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk entry store.
//!
//! Entries live at `<dir>/<key[0..2]>/<key>.json`. Publishing writes a
//! uniquely named temporary file in the same directory and hard-links it to
//! the final name, so readers never observe a partial entry and the first
//! writer of a key wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use chatscribe_core::ScribeError;

use crate::fingerprint::CacheKey;

/// A persisted transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub text: String,
    /// Language reported by the transcriber, if any.
    pub language: Option<String>,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: &CacheKey, text: String, language: Option<String>, model: &str) -> Self {
        Self {
            key: key.as_str().to_string(),
            text,
            language,
            model: model.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Result of [`EntryStore::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publish {
    /// Our entry is now the stored value.
    Stored,
    /// Another writer published first; this is its entry.
    Existing(CacheEntry),
}

/// Aggregate size of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct EntryStore {
    dir: PathBuf,
}

impl EntryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(key.shard())
            .join(format!("{}.json", key.as_str()))
    }

    /// Reads an entry. `Ok(None)` when absent; an error when the file exists
    /// but cannot be read or decoded, or belongs to another key.
    pub async fn read(&self, key: &CacheKey) -> Result<Option<CacheEntry>, ScribeError> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_error(format!("cannot read {}", path.display()), e)),
        };
        let entry: CacheEntry = serde_json::from_slice(&bytes)
            .map_err(|e| cache_error(format!("corrupt entry {}", path.display()), e))?;
        if entry.key != key.as_str() {
            return Err(ScribeError::Cache {
                message: format!("entry {} is stored under the wrong key", path.display()),
                source: None,
            });
        }
        Ok(Some(entry))
    }

    /// Atomically publishes an entry under its key.
    pub async fn publish(&self, key: &CacheKey, entry: &CacheEntry) -> Result<Publish, ScribeError> {
        let final_path = self.entry_path(key);
        let shard_dir = self.dir.join(key.shard());
        tokio::fs::create_dir_all(&shard_dir)
            .await
            .map_err(|e| cache_error(format!("cannot create {}", shard_dir.display()), e))?;

        let temp_path = shard_dir.join(format!(".{}.{}.tmp", key.as_str(), uuid::Uuid::new_v4()));
        let bytes = serde_json::to_vec_pretty(entry)
            .map_err(|e| cache_error("cannot encode entry".to_string(), e))?;
        if let Err(e) = write_synced(&temp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(cache_error(format!("cannot write {}", temp_path.display()), e));
        }

        let outcome = self.link_into_place(key, &temp_path, &final_path).await;
        let _ = tokio::fs::remove_file(&temp_path).await;
        outcome
    }

    async fn link_into_place(
        &self,
        key: &CacheKey,
        temp_path: &Path,
        final_path: &Path,
    ) -> Result<Publish, ScribeError> {
        match tokio::fs::hard_link(temp_path, final_path).await {
            Ok(()) => Ok(Publish::Stored),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => match self.read(key).await {
                Ok(Some(existing)) => {
                    debug!(key = %key, "entry already published by another writer");
                    Ok(Publish::Existing(existing))
                }
                // The final name holds a broken entry; replace it.
                Ok(None) | Err(_) => self.rename_into_place(temp_path, final_path).await,
            },
            Err(e) => {
                debug!(error = %e, "hard link unavailable, falling back to rename");
                if let Ok(Some(existing)) = self.read(key).await {
                    return Ok(Publish::Existing(existing));
                }
                self.rename_into_place(temp_path, final_path).await
            }
        }
    }

    async fn rename_into_place(
        &self,
        temp_path: &Path,
        final_path: &Path,
    ) -> Result<Publish, ScribeError> {
        tokio::fs::rename(temp_path, final_path)
            .await
            .map_err(|e| cache_error(format!("cannot publish {}", final_path.display()), e))?;
        Ok(Publish::Stored)
    }

    /// Counts entries and their on-disk size. A missing directory is empty.
    pub async fn stats(&self) -> Result<CacheStats, ScribeError> {
        let mut stats = CacheStats::default();
        let mut shards = match tokio::fs::read_dir(&self.dir).await {
            Ok(shards) => shards,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(ScribeError::io(&self.dir, e)),
        };

        while let Some(shard) = shards
            .next_entry()
            .await
            .map_err(|e| ScribeError::io(&self.dir, e))?
        {
            let shard_path = shard.path();
            if !shard_path.is_dir() {
                continue;
            }
            let mut files = tokio::fs::read_dir(&shard_path)
                .await
                .map_err(|e| ScribeError::io(&shard_path, e))?;
            while let Some(file) = files
                .next_entry()
                .await
                .map_err(|e| ScribeError::io(&shard_path, e))?
            {
                let name = file.file_name();
                let is_entry = name
                    .to_str()
                    .and_then(|n| n.strip_suffix(".json"))
                    .is_some_and(|stem| CacheKey::parse(stem).is_some());
                if !is_entry {
                    continue;
                }
                match file.metadata().await {
                    Ok(meta) => {
                        stats.entries += 1;
                        stats.total_bytes += meta.len();
                    }
                    Err(e) => warn!(path = %file.path().display(), error = %e, "cannot stat cache entry"),
                }
            }
        }
        Ok(stats)
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

fn cache_error(
    message: String,
    source: impl std::error::Error + Send + Sync + 'static,
) -> ScribeError {
    ScribeError::Cache {
        message,
        source: Some(Box::new(source)),
    }
}
