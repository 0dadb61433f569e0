// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcription through a local command-line tool.
//!
//! The audio is written to a temporary file and the program is run with
//! `{input}`, `{model}` and `{language}` substituted in its arguments. The
//! transcript is whatever the program prints on stdout.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chatscribe_core::{ScribeError, Transcriber, Transcript, TranscriptionRequest};
use tracing::debug;

/// Placeholder value for `{language}` when none was requested.
const AUTO_LANGUAGE: &str = "auto";

/// Bytes of stderr kept in error messages.
const STDERR_TAIL: usize = 512;

#[derive(Debug, Clone)]
pub struct CommandTranscriber {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandTranscriber {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    fn expand_args(&self, input: &str, request: &TranscriptionRequest<'_>) -> Vec<String> {
        let language = request.language.unwrap_or(AUTO_LANGUAGE);
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", input)
                    .replace("{model}", request.model)
                    .replace("{language}", language)
            })
            .collect()
    }
}

#[async_trait]
impl Transcriber for CommandTranscriber {
    fn name(&self) -> &str {
        "command"
    }

    async fn transcribe(
        &self,
        request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, ScribeError> {
        let suffix = request
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{ext}"))
            .unwrap_or_default();
        let mut input = tempfile::Builder::new()
            .prefix("chatscribe-audio-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| ScribeError::io(std::env::temp_dir(), e))?;
        input
            .write_all(request.audio)
            .and_then(|()| input.flush())
            .map_err(|e| ScribeError::io(input.path(), e))?;

        let input_path = input.path().to_string_lossy().into_owned();
        let args = self.expand_args(&input_path, &request);
        debug!(program = %self.program, ?args, "running transcription command");

        let child = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScribeError::Transcription {
                message: format!("cannot run `{}`: {e}", self.program),
                source: Some(Box::new(e)),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ScribeError::transcription(format!(
                    "`{}` timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ScribeError::Transcription {
                message: format!("`{}` failed: {e}", self.program),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = {
                let trimmed = stderr.trim();
                let start = trimmed
                    .char_indices()
                    .rev()
                    .nth(STDERR_TAIL)
                    .map_or(0, |(i, _)| i);
                trimmed[start..].to_string()
            };
            return Err(ScribeError::transcription(format!(
                "`{}` exited with {}: {tail}",
                self.program, output.status
            )));
        }

        Ok(Transcript {
            text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            language: request.language.map(str::to_string),
        })
    }
}
