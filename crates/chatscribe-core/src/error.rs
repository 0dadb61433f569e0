// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every chatscribe crate.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across chatscribe components.
///
/// Data-quality problems in an export never surface as a `ScribeError`; the
/// parser and assembler degrade instead. These variants cover the conditions
/// that genuinely stop an operation.
#[derive(Debug, Error)]
pub enum ScribeError {
    /// Configuration errors (invalid TOML, unknown locale, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem access failed for a specific path.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A locale header format or attachment marker could not be compiled.
    #[error("invalid pattern `{name}`: {message}")]
    Pattern { name: String, message: String },

    /// The external transcriber failed. Never cached.
    #[error("transcription failed: {message}")]
    Transcription {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The transcription cache could not read or publish an entry.
    #[error("cache error: {message}")]
    Cache {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Template compilation or rendering failed.
    #[error("template error: {0}")]
    Template(String),

    /// The export directory is unusable (no chat text file, unreadable text).
    #[error("export error: {0}")]
    Export(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScribeError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds a transcription error without an underlying cause.
    pub fn transcription(message: impl Into<String>) -> Self {
        Self::Transcription {
            message: message.into(),
            source: None,
        }
    }
}
