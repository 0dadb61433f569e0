// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible `audio/transcriptions` client.
//!
//! Works against the hosted API as well as local servers exposing the same
//! multipart endpoint. Transient failures (429, 500, 503) are retried once.

use std::time::Duration;

use async_trait::async_trait;
use chatscribe_core::{ScribeError, Transcriber, Transcript, TranscriptionRequest};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// Transcriber posting audio to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl HttpTranscriber {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ScribeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScribeError::Transcription {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            max_retries: 1,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(&self, request: &TranscriptionRequest<'_>) -> Result<reqwest::multipart::Form, ScribeError> {
        let part = reqwest::multipart::Part::bytes(request.audio.to_vec())
            .file_name(request.file_name.to_string())
            .mime_str(audio_mime(request.file_name))
            .map_err(|e| ScribeError::Transcription {
                message: format!("invalid audio part: {e}"),
                source: Some(Box::new(e)),
            })?;
        let mut form = reqwest::multipart::Form::new()
            .text("model", request.model.to_string())
            .text("response_format", "json")
            .part("file", part);
        if let Some(language) = request.language {
            form = form.text("language", language.to_string());
        }
        Ok(form)
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    fn name(&self) -> &str {
        "http"
    }

    async fn transcribe(
        &self,
        request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, ScribeError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying transcription after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut builder = self.client.post(&self.endpoint).multipart(self.form(&request)?);
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }
            let response = builder.send().await.map_err(|e| ScribeError::Transcription {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, file = request.file_name, "transcription response");

            if status.is_success() {
                let payload: TranscriptionResponse =
                    response.json().await.map_err(|e| ScribeError::Transcription {
                        message: format!("invalid transcription response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(Transcript {
                    text: payload.text.trim().to_string(),
                    language: payload.language,
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = ScribeError::transcription(format!("endpoint returned {status}: {body}"));
            if is_transient(status) && attempt < self.max_retries {
                warn!(status = %status, "transient transcription error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| ScribeError::transcription("retries exhausted")))
    }
}

fn is_transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}

/// MIME type sent with the audio part.
pub(crate) fn audio_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "opus" | "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TranscriptionRequest<'static> {
        TranscriptionRequest {
            audio: b"OggS",
            file_name: "PTT-1.opus",
            model: "whisper-1",
            language: Some("it"),
        }
    }

    fn transcriber(server: &MockServer) -> HttpTranscriber {
        HttpTranscriber::new(
            format!("{}/v1/audio/transcriptions", server.uri()),
            Some("sk-test".into()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_multipart_and_reads_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "text": "  ciao  ", "language": "italian" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transcript = transcriber(&server).transcribe(request()).await.unwrap();
        assert_eq!(transcript.text, "ciao");
        assert_eq!(transcript.language.as_deref(), Some("italian"));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad audio"))
            .expect(1)
            .mount(&server)
            .await;

        let err = transcriber(&server).transcribe(request()).await.unwrap_err();
        assert!(err.to_string().contains("bad audio"));
    }

    #[tokio::test]
    async fn transient_errors_are_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let err = transcriber(&server).transcribe(request()).await.unwrap_err();
        assert!(matches!(err, ScribeError::Transcription { .. }));
    }

    #[test]
    fn mime_types() {
        assert_eq!(audio_mime("a.OPUS"), "audio/ogg");
        assert_eq!(audio_mime("a.m4a"), "audio/mp4");
        assert_eq!(audio_mime("noext"), "application/octet-stream");
    }
}
