// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text adapter trait.

use async_trait::async_trait;

use crate::error::ScribeError;
use crate::types::{Transcript, TranscriptionRequest};

/// Adapter for speech-to-text backends.
///
/// Implementations are invoked only on a cache miss. They must not cache
/// results themselves and should report every failure as
/// [`ScribeError::Transcription`] so the caller can retry on a later run.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Transcribes one audio clip.
    async fn transcribe(
        &self,
        request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, ScribeError>;
}
