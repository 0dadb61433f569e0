// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content-addressed transcription cache.
//!
//! Transcripts are keyed by a fingerprint of the audio bytes plus the model
//! and language, so the same recording is transcribed once no matter how
//! many exports contain it. Entries are published atomically and shared
//! safely between concurrent processes; failures are never cached.

pub mod fingerprint;
pub mod recording;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use chatscribe_core::{ScribeError, Transcriber, TranscriptionRequest};

pub use fingerprint::CacheKey;
pub use store::{CacheEntry, CacheStats, EntryStore, Publish};

/// Transcription cache in front of a [`Transcriber`].
pub struct TranscriptionCache {
    store: EntryStore,
    transcriber: Arc<dyn Transcriber>,
}

impl TranscriptionCache {
    /// The directory is created on first publish.
    pub fn new(dir: impl Into<PathBuf>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            store: EntryStore::new(dir),
            transcriber,
        }
    }

    pub fn dir(&self) -> &Path {
        self.store.dir()
    }

    /// Returns the transcript of `audio_path`, computing and persisting it
    /// on a miss.
    ///
    /// Fails only when the audio cannot be read or the transcriber fails.
    /// A failed persist is logged and the fresh transcript still returned.
    pub async fn get_or_compute(
        &self,
        audio_path: &Path,
        model: &str,
        language: Option<&str>,
    ) -> Result<String, ScribeError> {
        let audio = tokio::fs::read(audio_path)
            .await
            .map_err(|e| ScribeError::Transcription {
                message: format!("cannot read audio {}", audio_path.display()),
                source: Some(Box::new(e)),
            })?;
        let key = CacheKey::compute(&audio, model, language);

        match self.store.read(&key).await {
            Ok(Some(entry)) => {
                debug!(key = %key, file = %audio_path.display(), "cache hit");
                recording::record_hit(model);
                return Ok(entry.text);
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "unusable cache entry, recomputing"),
        }
        recording::record_miss(model);

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio");
        let request = TranscriptionRequest {
            audio: &audio,
            file_name,
            model,
            language,
        };
        let transcript = self.transcriber.transcribe(request).await.map_err(|e| {
            recording::record_failure(model);
            as_transcription_error(e)
        })?;
        info!(
            file = file_name,
            transcriber = self.transcriber.name(),
            chars = transcript.text.len(),
            "transcribed audio"
        );

        let entry = CacheEntry::new(&key, transcript.text, transcript.language, model);
        match self.store.publish(&key, &entry).await {
            Ok(Publish::Stored) => Ok(entry.text),
            Ok(Publish::Existing(winner)) => Ok(winner.text),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to persist transcript");
                Ok(entry.text)
            }
        }
    }

    /// Read-only lookup by key.
    pub async fn lookup(&self, key: &CacheKey) -> Result<Option<CacheEntry>, ScribeError> {
        self.store.read(key).await
    }

    pub async fn stats(&self) -> Result<CacheStats, ScribeError> {
        self.store.stats().await
    }
}

fn as_transcription_error(err: ScribeError) -> ScribeError {
    match err {
        ScribeError::Transcription { .. } => err,
        other => ScribeError::Transcription {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}
