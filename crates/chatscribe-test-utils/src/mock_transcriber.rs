// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transcriber for deterministic testing.
//!
//! `MockTranscriber` implements `Transcriber` with pre-configured outcomes,
//! so cache and assembler tests run without a speech model.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use chatscribe_core::{ScribeError, Transcriber, Transcript, TranscriptionRequest};

/// A request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub file_name: String,
    pub model: String,
    pub language: Option<String>,
    pub audio_len: usize,
}

/// A transcriber that replays scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the mock
/// answers `transcript of <file_name>`.
pub struct MockTranscriber {
    outcomes: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Pre-loads successful transcripts.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let outcomes = responses.into_iter().map(Ok).collect();
        Self {
            outcomes: Arc::new(Mutex::new(outcomes)),
            ..Self::new()
        }
    }

    /// Pre-loads a mix of transcripts (`Ok`) and failure messages (`Err`).
    pub fn with_outcomes(outcomes: Vec<Result<String, String>>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            ..Self::new()
        }
    }

    /// Sleeps before answering, to widen race windows in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_success(&self, text: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(text.into()));
    }

    pub async fn push_failure(&self, message: impl Into<String>) {
        self.outcomes.lock().await.push_back(Err(message.into()));
    }

    /// Number of `transcribe` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    fn name(&self) -> &str {
        "mock-transcriber"
    }

    async fn transcribe(
        &self,
        request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, ScribeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(RecordedRequest {
            file_name: request.file_name.to_string(),
            model: request.model.to_string(),
            language: request.language.map(str::to_string),
            audio_len: request.audio.len(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.outcomes.lock().await.pop_front();
        match outcome {
            Some(Ok(text)) => Ok(Transcript {
                text,
                language: request.language.map(str::to_string),
            }),
            Some(Err(message)) => Err(ScribeError::transcription(message)),
            None => Ok(Transcript {
                text: format!("transcript of {}", request.file_name),
                language: request.language.map(str::to_string),
            }),
        }
    }
}
